//! Configuration management for Halo.
//!
//! Provides the exchange policy and runtime settings used by the buffering
//! pipeline. Every section and field has a default, so partial documents load.

use std::path::Path;

use common_error::{HaloError, HaloResult};
use serde::{Deserialize, Serialize};

/// Global Halo configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaloConfig {
    /// Exchange (scatter/gather) configuration.
    pub exchange: ExchangeConfig,
    /// Runtime configuration.
    pub runtime: RuntimeConfig,
}

/// What to do when two slices target the same key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateContribution`.
    #[default]
    Reject,
    /// Keep whichever slice arrived first, silently.
    FirstWins,
}

/// Exchange configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Conflict policy for duplicate contributions.
    pub duplicate_policy: DuplicatePolicy,
    /// Partition count used when the input carries no known partitioning.
    pub default_partitions: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            default_partitions: 8,
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Worker threads for partition tasks. `None` uses the global pool.
    pub parallelism: Option<usize>,
    /// Log per-exchange statistics at debug level.
    pub collect_stats: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            parallelism: None,
            collect_stats: true,
        }
    }
}

impl HaloConfig {
    /// Set the duplicate-contribution policy.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.exchange.duplicate_policy = policy;
        self
    }

    /// Set the default partition count.
    #[must_use]
    pub fn with_default_partitions(mut self, partitions: usize) -> Self {
        self.exchange.default_partitions = partitions;
        self
    }

    /// Set the worker thread count.
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.runtime.parallelism = Some(parallelism);
        self
    }

    /// Check values serde cannot reject on its own.
    pub fn validate(&self) -> HaloResult<()> {
        if self.exchange.default_partitions == 0 {
            return Err(HaloError::invalid_argument(
                "exchange.default_partitions must be at least 1",
            ));
        }
        if self.runtime.parallelism == Some(0) {
            return Err(HaloError::invalid_argument(
                "runtime.parallelism must be at least 1 when set",
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> HaloResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| HaloError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> HaloResult<Self> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| HaloError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(text: &str) -> HaloResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, choosing the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> HaloResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(HaloError::config(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }
}
