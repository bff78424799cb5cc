use crate::trial::{Evaluate, TrialRunner};
use dashmap::DashMap;
use life_common::{Aggregate, ConfigError, ConfigKey};
use log::trace;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Hit/miss counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Write-once store of sweep aggregates with single-flight computation per key.
///
/// Each key maps to a shared `OnceLock`. The first requester initialises it; concurrent
/// requesters for the same key block on that lock and reuse its value, so every key is
/// evaluated at most once. The map shard lock is never held while evaluating.
pub struct ParameterSweepCache<E = TrialRunner> {
    evaluator: E,
    entries: DashMap<ConfigKey, Arc<OnceLock<Aggregate>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<E: Evaluate> ParameterSweepCache<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the aggregate for `key`, evaluating it on first request only.
    pub fn get(&self, key: ConfigKey) -> Aggregate {
        // Read guard must drop before `entry` takes the shard's write lock.
        let existing = self.entries.get(&key).map(|slot| Arc::clone(slot.value()));
        let slot =
            existing.unwrap_or_else(|| Arc::clone(self.entries.entry(key).or_default().value()));

        let mut evaluated = false;
        let aggregate = *slot.get_or_init(|| {
            evaluated = true;
            self.evaluator.evaluate(&key)
        });

        if evaluated {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!("Cache hit for {}", key);
        }
        aggregate
    }

    /// Validating form of [`get`](Self::get) for raw `(rows, columns, density)` requests.
    pub fn get_with(
        &self,
        rows: usize,
        columns: usize,
        density: f64,
    ) -> Result<Aggregate, ConfigError> {
        Ok(self.get(ConfigKey::new(rows, columns, density)?))
    }

    /// The stored aggregate, without evaluating or waiting on an in-flight key.
    pub fn peek(&self, key: &ConfigKey) -> Option<Aggregate> {
        self.entries.get(key).and_then(|slot| slot.get().copied())
    }

    /// Number of completed entries.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|slot| slot.value().get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry. In-flight evaluations still finish for their waiting callers.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}
