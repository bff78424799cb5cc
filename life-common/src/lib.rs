pub mod config;
pub mod error;
pub mod key;
pub mod sim_params;
pub mod snapshot;

// Re-export key types for easier use by dependent crates
pub use config::{
    OutputConfig, OutputFormat, RuntimeConfig, SweepConfig, SweepRangeConfig, TrialConfig,
};
pub use error::ConfigError;
pub use key::{check_probability, Aggregate, ConfigKey, Density, GridSize, DENSITY_QUANTUM};
pub use sim_params::{SweepPlan, TrialParams, TrialScaling};
pub use snapshot::SweepRecord;
