use crate::cache::ParameterSweepCache;
use crate::results::{DensityProfile, SweepResults};
use crate::trial::{Evaluate, TrialRunner};
use life_common::{Aggregate, ConfigKey, SweepPlan};
use log::{info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Receives each configuration's aggregate as soon as it is available.
/// Delivery order across configurations is unspecified.
pub trait SweepObserver: Send + Sync {
    fn on_result(&self, key: ConfigKey, aggregate: Aggregate);
}

impl<F> SweepObserver for F
where
    F: Fn(ConfigKey, Aggregate) + Send + Sync,
{
    fn on_result(&self, key: ConfigKey, aggregate: Aggregate) {
        self(key, aggregate)
    }
}

/// Observer that ignores every result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SweepObserver for NoopObserver {
    fn on_result(&self, _key: ConfigKey, _aggregate: Aggregate) {}
}

/// Dispatches every configuration of a [`SweepPlan`] onto a Rayon pool, publishing
/// results through the shared cache and an observer.
pub struct SweepScheduler<E = TrialRunner> {
    cache: Arc<ParameterSweepCache<E>>,
    pool: Option<rayon::ThreadPool>,
}

impl<E: Evaluate> SweepScheduler<E> {
    /// Runs on the global Rayon pool.
    pub fn new(cache: Arc<ParameterSweepCache<E>>) -> Self {
        Self { cache, pool: None }
    }

    /// Runs on a dedicated pool of `threads` workers; `0` falls back to the global pool.
    pub fn with_threads(
        cache: Arc<ParameterSweepCache<E>>,
        threads: usize,
    ) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = if threads == 0 {
            None
        } else {
            Some(rayon::ThreadPoolBuilder::new().num_threads(threads).build()?)
        };
        Ok(Self { cache, pool })
    }

    pub fn cache(&self) -> &Arc<ParameterSweepCache<E>> {
        &self.cache
    }

    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, rayon::ThreadPool::current_num_threads)
    }

    /// Computes every configuration in `plan` and blocks until all are done.
    /// `observer` is called once per configuration of this run.
    pub fn run<O>(&self, plan: &SweepPlan, observer: &O) -> SweepResults
    where
        O: SweepObserver + ?Sized,
    {
        match &self.pool {
            Some(pool) => pool.install(|| self.dispatch(plan, observer)),
            None => self.dispatch(plan, observer),
        }
    }

    fn dispatch<O>(&self, plan: &SweepPlan, observer: &O) -> SweepResults
    where
        O: SweepObserver + ?Sized,
    {
        let sizes = plan.grid_sizes();
        let densities = plan.densities();
        if !plan.divides_evenly() {
            warn!(
                "Density step {} does not divide 1 evenly; highest density swept is {}.",
                plan.density_step(),
                densities.last().copied().unwrap_or_default()
            );
        }
        info!(
            "Sweeping {} grid sizes ({}..={}) x {} densities on {} threads...",
            sizes.len(),
            plan.min_size(),
            plan.max_size(),
            densities.len(),
            rayon::current_num_threads()
        );
        let start_time = Instant::now();

        // Grid sizes and densities are independent units of work.
        let profiles: BTreeMap<_, _> = sizes
            .par_iter()
            .map(|&size| {
                let profile: DensityProfile = densities
                    .par_iter()
                    .map(|&density| {
                        let key = ConfigKey::from_parts(size, density);
                        let aggregate = self.cache.get(key);
                        observer.on_result(key, aggregate);
                        (density, aggregate)
                    })
                    .collect();
                (size, profile)
            })
            .collect();

        let results = SweepResults::from(profiles);
        let stats = self.cache.stats();
        info!(
            "Sweep of {} configurations finished in {:.3} s (cache: {} computed, {} reused).",
            results.len(),
            start_time.elapsed().as_secs_f64(),
            stats.misses,
            stats.hits
        );
        results
    }
}
