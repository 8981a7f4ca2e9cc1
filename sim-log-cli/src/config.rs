//! Configuration loading and parsing
//!
//! An optional `report.toml` supplies defaults; command-line flags override
//! whatever it sets.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sim_log_decoder::{AggregateOptions, DiscoveryConfig};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub aggregate: AggregateOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Histogram bin count
    #[serde(default = "default_bins")]
    pub bins: usize,
    /// Title for single-run charts
    #[serde(default)]
    pub title: Option<String>,
}

fn default_bins() -> usize {
    50
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            title: None,
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .discovery
        .validate()
        .with_context(|| format!("Invalid discovery settings in {:?}", path))?;

    Ok(config)
}
