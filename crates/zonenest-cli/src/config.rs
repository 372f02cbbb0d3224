//! # Run Configuration
//!
//! Optional YAML file passed with the global `--config` flag. Every field
//! has a default, so an absent file and an empty file behave the same.
//! Unknown keys are rejected to catch typos early.
//!
//! ```yaml
//! input:
//!   taz_column: TAZ_10
//!   block_group_column: BLKGRP10
//!   population_column: POP10
//! discovery:
//!   strategy: matrix-sort
//!   max_sort_passes: 10
//!   require_sort_convergence: false
//!   max_expansion_rounds: 1000
//! output:
//!   directory: output
//!   timestamped: true
//!   formats: [csv, json]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use zonenest_partition::{DiscoveryOptions, Strategy};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NestingConfig {
    pub input: InputConfig,
    pub discovery: DiscoveryConfig,
    pub output: OutputConfig,
}

/// Where to find each field in a CSV input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Header of the TAZ id column.
    pub taz_column: String,
    /// Header of the Block Group id column.
    pub block_group_column: String,
    /// Header of the population column.
    pub population_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            taz_column: "TAZ_10".to_string(),
            block_group_column: "BLKGRP10".to_string(),
            population_column: "POP10".to_string(),
        }
    }
}

/// Discovery tuning; see [`DiscoveryOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub strategy: Strategy,
    pub max_sort_passes: usize,
    pub require_sort_convergence: bool,
    pub max_expansion_rounds: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        let options = DiscoveryOptions::default();
        Self {
            strategy: options.strategy,
            max_sort_passes: options.max_sort_passes,
            require_sort_convergence: options.require_sort_convergence,
            max_expansion_rounds: options.max_expansion_rounds,
        }
    }
}

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `taz_nesting.csv`, `bg_nesting.csv`, `nestings.csv`.
    Csv,
    /// `summary.json`.
    Json,
}

/// Where and how results are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Base output directory.
    pub directory: PathBuf,
    /// Write into a fresh `nesting_YYYYMMDD_HHMMSS` folder under `directory`.
    pub timestamped: bool,
    /// Formats to write.
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            timestamped: true,
            formats: vec![OutputFormat::Csv, OutputFormat::Json],
        }
    }
}

impl OutputConfig {
    /// Whether `format` is enabled.
    pub fn wants(&self, format: OutputFormat) -> bool {
        self.formats.contains(&format)
    }
}

impl NestingConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file; using defaults");
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("parsing config: {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse YAML text. Empty text yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Library options for one discovery run.
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            strategy: self.discovery.strategy,
            max_sort_passes: self.discovery.max_sort_passes,
            require_sort_convergence: self.discovery.require_sort_convergence,
            max_expansion_rounds: self.discovery.max_expansion_rounds,
        }
    }
}
