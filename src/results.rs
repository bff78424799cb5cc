use life_common::{Aggregate, ConfigKey, Density, GridSize, SweepRecord};
use std::collections::BTreeMap;

/// Density profile of one grid size.
pub type DensityProfile = BTreeMap<Density, Aggregate>;

/// The full result of a sweep: grid size -> density -> aggregate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepResults {
    profiles: BTreeMap<GridSize, DensityProfile>,
}

impl SweepResults {
    pub fn get(&self, size: GridSize, density: Density) -> Option<Aggregate> {
        self.profiles.get(&size)?.get(&density).copied()
    }

    pub fn profile(&self, size: GridSize) -> Option<&DensityProfile> {
        self.profiles.get(&size)
    }

    pub fn sizes(&self) -> impl Iterator<Item = GridSize> + '_ {
        self.profiles.keys().copied()
    }

    /// Total number of configurations.
    pub fn len(&self) -> usize {
        self.profiles.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mean living count of `size` averaged across its densities (the surface height
    /// plotted per grid size).
    pub fn mean_over_densities(&self, size: GridSize) -> Option<f64> {
        let profile = self.profile(size)?;
        if profile.is_empty() {
            return None;
        }
        Some(profile.values().map(|a| a.mean).sum::<f64>() / profile.len() as f64)
    }

    /// Largest mean across the whole sweep, for scaling charts.
    pub fn peak_mean(&self) -> Option<f64> {
        self.profiles
            .values()
            .flat_map(BTreeMap::values)
            .map(|a| a.mean)
            .reduce(f64::max)
    }

    /// Flattened rows ordered by size, then density.
    pub fn records(&self) -> Vec<SweepRecord> {
        self.profiles
            .iter()
            .flat_map(|(&size, profile)| {
                profile.iter().map(move |(&density, &aggregate)| {
                    SweepRecord::new(ConfigKey::from_parts(size, density), aggregate)
                })
            })
            .collect()
    }

}

impl From<BTreeMap<GridSize, DensityProfile>> for SweepResults {
    fn from(profiles: BTreeMap<GridSize, DensityProfile>) -> Self {
        Self { profiles }
    }
}

impl FromIterator<(ConfigKey, Aggregate)> for SweepResults {
    fn from_iter<I: IntoIterator<Item = (ConfigKey, Aggregate)>>(iter: I) -> Self {
        let mut profiles: BTreeMap<GridSize, DensityProfile> = BTreeMap::new();
        for (key, aggregate) in iter {
            profiles.entry(key.size()).or_default().insert(key.density(), aggregate);
        }
        Self { profiles }
    }
}
