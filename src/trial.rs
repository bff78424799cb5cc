use crate::grid::Grid;
use crate::step_engine::StepEngine;
use life_common::{Aggregate, ConfigError, ConfigKey, TrialParams};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Computes the aggregate for one configuration. The seam between the cache and the work.
pub trait Evaluate: Send + Sync {
    fn evaluate(&self, key: &ConfigKey) -> Aggregate;
}

/// Running sum and sum of squares of sampled living-cell counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningStats {
    sum: u64,
    sum_sq: u128,
    samples: u64,
}

impl RunningStats {
    #[inline(always)]
    pub fn record(&mut self, living: usize) {
        let living = living as u64;
        self.sum += living;
        self.sum_sq += u128::from(living) * u128::from(living);
        self.samples += 1;
    }

    pub fn merge(&mut self, other: &RunningStats) {
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.samples += other.samples;
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn finish(&self) -> Aggregate {
        Aggregate::from_moments(self.sum as f64, self.sum_sq as f64, self.samples)
    }
}

/// Runs independent trials of a configuration and aggregates living counts over
/// every step of every trial.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    params: TrialParams,
}

impl TrialRunner {
    pub fn new(params: TrialParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrialParams {
        &self.params
    }

    /// Aggregate for `key` using the configured trial-count scaling.
    pub fn run(&self, key: &ConfigKey) -> Aggregate {
        // `trials_for` never returns 0.
        self.aggregate(key, self.params.trials_for(key.size()))
    }

    /// Aggregate for `key` over exactly `trials` trials.
    /// Trials run one after another on the calling thread.
    pub fn run_trials(&self, key: &ConfigKey, trials: u64) -> Result<Aggregate, ConfigError> {
        if trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        Ok(self.aggregate(key, trials))
    }

    /// Living counts of one trial, sampled after each of its steps.
    fn run_single(&self, key: &ConfigKey, trial: u64) -> RunningStats {
        let density = key.density().as_f64();
        let grid = match self.params.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(trial_seed(seed, key, trial));
                Grid::sample(key.size(), density, &mut rng)
            }
            None => Grid::sample(key.size(), density, &mut rand::rng()),
        };
        let steps = u64::from(self.params.steps_per_trial);
        let mut stats = RunningStats::default();
        StepEngine::new(grid).run_with(steps, |_, living| stats.record(living));
        stats
    }

    fn aggregate(&self, key: &ConfigKey, trials: u64) -> Aggregate {
        let start_time = Instant::now();
        let steps = u64::from(self.params.steps_per_trial);
        let mut stats = RunningStats::default();
        for trial in 0..trials {
            stats.merge(&self.run_single(key, trial));
        }

        let aggregate = stats.finish();
        debug!(
            "{}: {} trials x {} steps ({} samples) -> mean {:.4}, std {:.4} in {:.2} ms",
            key,
            trials,
            steps,
            stats.samples(),
            aggregate.mean,
            aggregate.std_dev,
            start_time.elapsed().as_secs_f64() * 1000.0
        );
        aggregate
    }
}

impl Evaluate for TrialRunner {
    fn evaluate(&self, key: &ConfigKey) -> Aggregate {
        self.run(key)
    }
}

/// Derives a per-trial seed from the base seed, the configuration and the trial index.
fn trial_seed(seed: u64, key: &ConfigKey, trial: u64) -> u64 {
    const MIX: u64 = 0x9E37_79B9_7F4A_7C15;
    seed
        .wrapping_add((key.rows() as u64).wrapping_mul(MIX))
        .wrapping_add((key.columns() as u64).wrapping_mul(MIX.rotate_left(17)))
        .wrapping_add(u64::from(key.density().basis_points()).wrapping_mul(MIX.rotate_left(31)))
        .wrapping_add(trial.wrapping_mul(MIX.rotate_left(47)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_common::TrialScaling;

    fn runner(steps: u32, trials: u32, seed: Option<u64>) -> TrialRunner {
        TrialRunner::new(TrialParams::new(steps, TrialScaling::Fixed { trials }, seed).unwrap())
    }

    #[test]
    fn empty_grids_aggregate_to_zero() {
        let key = ConfigKey::new(4, 4, 0.0).unwrap();
        let aggregate = runner(16, 3, None).run(&key);
        assert_eq!(aggregate, Aggregate { mean: 0.0, std_dev: 0.0 });
    }

    #[test]
    fn full_two_by_two_is_a_block() {
        // Every cell has 3 live neighbours: the block never changes.
        let key = ConfigKey::new(2, 2, 1.0).unwrap();
        let aggregate = runner(10, 4, None).run(&key);
        assert_eq!(aggregate.mean, 4.0);
        assert_eq!(aggregate.std_dev, 0.0);
    }

    #[test]
    fn full_three_by_three_collapses_to_corners() {
        // Step 1 leaves the four corners (3 neighbours each); step 2 kills them.
        let key = ConfigKey::new(3, 3, 1.0).unwrap();
        let aggregate = runner(2, 1, None).run(&key);
        assert_eq!(aggregate.mean, 2.0);
        assert_eq!(aggregate.std_dev, 2.0);
    }

    #[test]
    fn samples_every_step_of_every_trial() {
        let mut stats = RunningStats::default();
        let key = ConfigKey::new(3, 3, 0.5).unwrap();
        let runner = runner(7, 5, Some(1));
        for trial in 0..5 {
            let mut rng = StdRng::seed_from_u64(trial_seed(1, &key, trial));
            let grid = Grid::sample(key.size(), key.density().as_f64(), &mut rng);
            let mut engine = StepEngine::new(grid);
            engine.run_with(7, |_, living| stats.record(living));
        }
        assert_eq!(stats.samples(), 35);
        assert_eq!(runner.run(&key), stats.finish());
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let key = ConfigKey::new(5, 4, 0.35).unwrap();
        let a = runner(32, 6, Some(99)).run(&key);
        let b = runner(32, 6, Some(99)).run(&key);
        assert_eq!(a, b);
    }

    #[test]
    fn merge_matches_sequential_recording() {
        let mut left = RunningStats::default();
        let mut right = RunningStats::default();
        let mut all = RunningStats::default();
        for (i, living) in [3usize, 0, 7, 2, 2, 9].into_iter().enumerate() {
            if i % 2 == 0 {
                left.record(living);
            } else {
                right.record(living);
            }
            all.record(living);
        }
        left.merge(&right);
        assert_eq!(left, all);
    }

    #[test]
    fn zero_trials_rejected() {
        let key = ConfigKey::new(2, 2, 1.0).unwrap();
        let runner = runner(4, 1, None);
        assert_eq!(runner.run_trials(&key, 0), Err(ConfigError::ZeroTrials));
        assert_eq!(
            runner.run_trials(&key, 3),
            Ok(Aggregate { mean: 4.0, std_dev: 0.0 })
        );
    }

    #[test]
    fn aggregate_within_bounds() {
        let key = ConfigKey::new(6, 5, 0.5).unwrap();
        let aggregate = runner(64, 8, None).run(&key);
        assert!(aggregate.mean >= 0.0 && aggregate.mean <= 30.0);
        assert!(aggregate.std_dev >= 0.0 && aggregate.std_dev <= 30.0);
        assert!(!aggregate.std_dev.is_nan());
    }
}
