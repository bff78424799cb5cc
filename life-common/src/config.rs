use crate::error::ConfigError;
use crate::sim_params::{SweepPlan, TrialParams, TrialScaling};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Range of grid sizes and densities to sweep
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SweepRangeConfig {
    #[serde(default = "default_min_size")]
    pub min_size: usize,
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    #[serde(default = "default_density_step")]
    pub density_step: f64,
}

// Per-configuration trial settings
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TrialConfig {
    #[serde(default = "default_steps_per_trial")]
    pub steps_per_trial: u32,
    #[serde(default)]
    pub scaling: TrialScaling,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RuntimeConfig {
    /// Worker threads for the sweep pool; 0 uses the global Rayon pool.
    #[serde(default)]
    pub threads: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

// Main sweep configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SweepConfig {
    #[serde(default)]
    pub sweep: SweepRangeConfig,
    #[serde(default)]
    pub trial: TrialConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for SweepRangeConfig {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            max_size: default_max_size(),
            density_step: default_density_step(),
        }
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            steps_per_trial: default_steps_per_trial(),
            scaling: TrialScaling::default(),
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_progress: default_show_progress(),
        }
    }
}

impl SweepConfig {
    /// Loads the sweep configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file '{}'", path_ref.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("Invalid configuration in '{}'", path_ref.display()))
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SweepConfig =
            toml::from_str(config_str).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every boundary precondition without scheduling any work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sweep_plan()?;
        self.trial_params()?;
        Ok(())
    }

    pub fn sweep_plan(&self) -> Result<SweepPlan, ConfigError> {
        SweepPlan::new(
            self.sweep.min_size,
            self.sweep.max_size,
            self.sweep.density_step,
        )
    }

    /// Converts the configuration into the parameters used by each trial batch.
    pub fn trial_params(&self) -> Result<TrialParams, ConfigError> {
        TrialParams::new(self.trial.steps_per_trial, self.trial.scaling, self.trial.seed)
    }
}

fn default_min_size() -> usize {
    1
}

fn default_max_size() -> usize {
    5
}

fn default_density_step() -> f64 {
    0.05
}

fn default_steps_per_trial() -> u32 {
    1024
}

fn default_show_progress() -> bool {
    true
}
