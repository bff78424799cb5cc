use crate::key::{Aggregate, ConfigKey};
use serde::{Deserialize, Serialize};

/// One sweep result flattened into a serialisable row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    pub rows: usize,
    pub columns: usize,
    /// Initial-living probability (quantised).
    pub density: f64,
    /// Mean living-cell count over all steps of all trials.
    pub mean: f64,
    pub std_dev: f64,
}

impl SweepRecord {
    pub fn new(key: ConfigKey, aggregate: Aggregate) -> Self {
        Self {
            rows: key.rows(),
            columns: key.columns(),
            density: key.density().as_f64(),
            mean: aggregate.mean,
            std_dev: aggregate.std_dev,
        }
    }
}
