//! Statistical parameter sweep over a clipped-edge Game of Life.
//!
//! A [`Grid`] advances one generation at a time under the B3/S23 rule with
//! double-buffered, simultaneous updates. A [`TrialRunner`] averages living-cell
//! counts over many independent trials, a [`ParameterSweepCache`] memoises those
//! aggregates per `(rows, columns, density)`, and a [`SweepScheduler`] fans the whole
//! parameter space out over a Rayon pool.

pub mod cache;
pub mod grid;
pub mod results;
pub mod step_engine;
pub mod sweep;
pub mod trial;

pub use cache::{CacheStats, ParameterSweepCache};
pub use grid::{moore_neighborhood, Cell, Grid, DEFAULT_DENSITY};
pub use life_common::{
    Aggregate, ConfigError, ConfigKey, Density, GridSize, SweepConfig, SweepPlan, SweepRecord,
    TrialParams, TrialScaling,
};
pub use results::{DensityProfile, SweepResults};
pub use step_engine::StepEngine;
pub use sweep::{NoopObserver, SweepObserver, SweepScheduler};
pub use trial::{Evaluate, RunningStats, TrialRunner};

use std::sync::Arc;

/// Sweeps every `(m, n)` with `min_size <= n <= m <= max_size` over densities
/// `0, density_step, ..., <= 1`, running `steps_per_trial` generations per trial with the
/// default trial-count scaling, on the global Rayon pool.
pub fn sweep(
    min_size: usize,
    max_size: usize,
    density_step: f64,
    steps_per_trial: u32,
) -> Result<SweepResults, ConfigError> {
    let plan = SweepPlan::new(min_size, max_size, density_step)?;
    let params = TrialParams::new(steps_per_trial, TrialScaling::default(), None)?;
    let cache = Arc::new(ParameterSweepCache::new(TrialRunner::new(params)));
    Ok(SweepScheduler::new(cache).run(&plan, &NoopObserver))
}
