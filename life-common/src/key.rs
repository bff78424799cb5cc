use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of density quanta in the unit interval (basis points).
pub const DENSITY_QUANTUM: u16 = 10_000;

/// Initial-living probability, quantised to basis points so it can be hashed and ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Density(u16);

impl Density {
    pub const ZERO: Density = Density(0);
    pub const ONE: Density = Density(DENSITY_QUANTUM);

    /// Quantises `probability` to the nearest basis point.
    /// NaN and values outside `[0, 1]` are rejected, never clamped.
    pub fn new(probability: f64) -> Result<Self, ConfigError> {
        let probability = check_probability(probability)?;
        Ok(Self((probability * f64::from(DENSITY_QUANTUM)).round() as u16))
    }

    pub fn from_basis_points(basis_points: u16) -> Result<Self, ConfigError> {
        if basis_points > DENSITY_QUANTUM {
            return Err(ConfigError::DensityOutOfRange(
                f64::from(basis_points) / f64::from(DENSITY_QUANTUM),
            ));
        }
        Ok(Self(basis_points))
    }

    pub fn basis_points(self) -> u16 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / f64::from(DENSITY_QUANTUM)
    }
}

/// Accepts `probability` unchanged when it lies in `[0, 1]`; NaN and anything outside are rejected.
pub fn check_probability(probability: f64) -> Result<f64, ConfigError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(ConfigError::DensityOutOfRange(probability));
    }
    Ok(probability)
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

/// Grid dimensions; both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridSize {
    rows: usize,
    columns: usize,
}

impl GridSize {
    pub fn new(rows: usize, columns: usize) -> Result<Self, ConfigError> {
        if rows == 0 || columns == 0 {
            return Err(ConfigError::InvalidDimensions { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    pub fn rows(self) -> usize {
        self.rows
    }

    pub fn columns(self) -> usize {
        self.columns
    }

    pub fn area(self) -> usize {
        self.rows * self.columns
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Cache key for one sweep point: (rows, columns, quantised density).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigKey {
    size: GridSize,
    density: Density,
}

impl ConfigKey {
    pub fn new(rows: usize, columns: usize, density: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            size: GridSize::new(rows, columns)?,
            density: Density::new(density)?,
        })
    }

    pub fn from_parts(size: GridSize, density: Density) -> Self {
        Self { size, density }
    }

    pub fn size(self) -> GridSize {
        self.size
    }

    pub fn rows(self) -> usize {
        self.size.rows
    }

    pub fn columns(self) -> usize {
        self.size.columns
    }

    pub fn density(self) -> Density {
        self.density
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.size, self.density)
    }
}

/// Mean and standard deviation of the living-cell count over every sampled step of every trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub mean: f64,
    pub std_dev: f64,
}

impl Aggregate {
    /// Builds the aggregate from raw moments. The variance radicand is clamped at zero
    /// because `sum_sq / n - mean^2` can round slightly negative.
    pub fn from_moments(sum: f64, sum_sq: f64, samples: u64) -> Self {
        if samples == 0 {
            return Self::default();
        }
        let n = samples as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }
}
