//! Configuration system for infopt models.
//!
//! Load model configuration from TOML or YAML to control the deletion policy
//! and support generation without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use infopt_config::{DeletionPolicy, ModelConfig};
//!
//! let config = ModelConfig::from_toml_str(r#"
//!     deletion_policy = "cascade"
//!
//!     [supports]
//!     significant_digits = 8
//!     default_num_supports = 5
//!     random_seed = 42
//! "#).unwrap();
//!
//! assert_eq!(config.deletion_policy, DeletionPolicy::Cascade);
//! assert_eq!(config.supports.significant_digits, 8);
//! assert_eq!(config.supports.random_seed, Some(42));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use infopt_config::ModelConfig;
//!
//! let config = ModelConfig::load("model.toml").unwrap_or_default();
//! assert_eq!(config.supports.significant_digits, 12);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of significant digits an `f64` can faithfully carry.
pub const MAX_SIGNIFICANT_DIGITS: u32 = 17;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main model configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelConfig {
    /// What happens when an object with live dependents is deleted.
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,

    /// Support storage and generation settings.
    #[serde(default)]
    pub supports: SupportConfig,
}

impl ModelConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or
    /// describes invalid settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the deletion policy.
    pub fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = policy;
        self
    }

    /// Sets the number of significant digits supports are rounded to.
    pub fn with_significant_digits(mut self, digits: u32) -> Self {
        self.supports.significant_digits = digits;
        self
    }

    /// Sets the random seed used when sampling supports.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.supports.random_seed = Some(seed);
        self
    }

    /// Sets the support count used by `fill_in_supports` when none is given.
    pub fn with_default_num_supports(mut self, num: usize) -> Self {
        self.supports.default_num_supports = num;
        self
    }

    /// Checks the settings for values the model cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.supports.validate()
    }
}

/// Policy applied when deleting an object that other objects still reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPolicy {
    /// Refuse the deletion and report the blocking dependents.
    #[default]
    Restrict,

    /// Delete every dependent transitively before the object itself.
    Cascade,
}

/// Support storage and generation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SupportConfig {
    /// Significant digits supports are rounded to before insertion.
    pub significant_digits: u32,

    /// Support count used when generating supports without an explicit count.
    pub default_num_supports: usize,

    /// Seed for sampling supports from distributions.
    pub random_seed: Option<u64>,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            significant_digits: 12,
            default_num_supports: 10,
            random_seed: None,
        }
    }
}

impl SupportConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.significant_digits == 0 || self.significant_digits > MAX_SIGNIFICANT_DIGITS {
            return Err(ConfigError::Invalid(format!(
                "significant_digits must be in 1..={}, got {}",
                MAX_SIGNIFICANT_DIGITS, self.significant_digits
            )));
        }
        if self.default_num_supports == 0 {
            return Err(ConfigError::Invalid(
                "default_num_supports must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
