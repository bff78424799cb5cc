use crate::error::ConfigError;
use crate::key::{Density, GridSize, DENSITY_QUANTUM};
use serde::{Deserialize, Serialize};

/// How many independent trials a configuration gets, as a function of its grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrialScaling {
    /// Same trial count for every grid size.
    Fixed { trials: u32 },
    /// `factor * rows * columns` trials.
    PerCell { factor: u32 },
    /// `factor * rows * rows` trials.
    PerSquaredRows { factor: u32 },
}

impl Default for TrialScaling {
    fn default() -> Self {
        TrialScaling::PerCell { factor: 1 }
    }
}

impl TrialScaling {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factor = match *self {
            TrialScaling::Fixed { trials } => trials,
            TrialScaling::PerCell { factor } | TrialScaling::PerSquaredRows { factor } => factor,
        };
        if factor == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        Ok(())
    }

    /// Trial count for `size`, never below 1. Saturates at `u64::MAX` for huge grids.
    pub fn trials_for(&self, size: GridSize) -> u64 {
        let rows = size.rows() as u64;
        let columns = size.columns() as u64;
        let trials = match *self {
            TrialScaling::Fixed { trials } => u64::from(trials),
            TrialScaling::PerCell { factor } => {
                u64::from(factor).saturating_mul(rows.saturating_mul(columns))
            }
            TrialScaling::PerSquaredRows { factor } => {
                u64::from(factor).saturating_mul(rows.saturating_mul(rows))
            }
        };
        trials.max(1)
    }
}

/// Per-configuration run parameters, derived from the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialParams {
    pub steps_per_trial: u32,
    pub scaling: TrialScaling,
    /// Base seed for reproducible trials; `None` draws from the thread-local generator.
    pub seed: Option<u64>,
}

impl TrialParams {
    pub fn new(
        steps_per_trial: u32,
        scaling: TrialScaling,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if steps_per_trial == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        scaling.validate()?;
        Ok(Self {
            steps_per_trial,
            scaling,
            seed,
        })
    }

    pub fn trials_for(&self, size: GridSize) -> u64 {
        self.scaling.trials_for(size)
    }
}

/// The enumerated parameter space of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPlan {
    min_size: usize,
    max_size: usize,
    density_step: Density,
}

impl SweepPlan {
    pub fn new(min_size: usize, max_size: usize, density_step: f64) -> Result<Self, ConfigError> {
        if min_size == 0 {
            return Err(ConfigError::InvalidDimensions {
                rows: min_size,
                columns: min_size,
            });
        }
        if min_size > max_size {
            return Err(ConfigError::InvalidSizeRange {
                min: min_size,
                max: max_size,
            });
        }
        if !(density_step > 0.0 && density_step <= 1.0) {
            return Err(ConfigError::InvalidDensityStep(density_step));
        }
        let step = Density::new(density_step)?;
        if step == Density::ZERO {
            return Err(ConfigError::InvalidDensityStep(density_step));
        }
        Ok(Self {
            min_size,
            max_size,
            density_step: step,
        })
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn density_step(&self) -> Density {
        self.density_step
    }

    /// Whether the density ladder lands exactly on 1.0.
    pub fn divides_evenly(&self) -> bool {
        DENSITY_QUANTUM % self.density_step.basis_points() == 0
    }

    /// Every `(m, n)` with `min_size <= n <= m <= max_size`, as `m` rows by `n` columns.
    pub fn grid_sizes(&self) -> Vec<GridSize> {
        (self.min_size..=self.max_size)
            .flat_map(|m| (self.min_size..=m).map(move |n| (m, n)))
            .filter_map(|(m, n)| GridSize::new(m, n).ok())
            .collect()
    }

    /// `0, step, 2*step, ...` up to and including 1.0 when reachable.
    pub fn densities(&self) -> Vec<Density> {
        let step = self.density_step.basis_points();
        (0..=DENSITY_QUANTUM)
            .step_by(usize::from(step))
            .filter_map(|basis_points| Density::from_basis_points(basis_points).ok())
            .collect()
    }

    pub fn configuration_count(&self) -> usize {
        self.grid_sizes().len() * self.densities().len()
    }
}
