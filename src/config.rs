//! # Synchronizer Configuration
//!
//! Typed configuration with explicit validation. Values come from an
//! optional TOML file (`DAYFLOW_CONFIG_PATH`) merged with
//! `DAYFLOW_`-prefixed environment variables; every load is validated
//! before use — no silent fallbacks past this point.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::constants::source_modules;
use crate::scheduling::cron::parse_hhmm;

/// Configuration faults, surfaced at load time
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration load failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Fallback values applied while deriving cron triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationConfig {
    /// Time of day assumed when a template carries no times, `HH:MM`
    pub default_time: String,
    /// Reminder offset assumed when a template carries none
    pub default_minutes_before: u32,
    /// Weekdays assumed for weekly recurrence without any
    pub default_weekdays: Vec<u8>,
    /// Month days assumed for monthly recurrence without any
    pub default_month_days: Vec<u8>,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            default_time: "09:00".to_string(),
            default_minutes_before: 30,
            default_weekdays: vec![1],
            default_month_days: vec![1],
        }
    }
}

/// In-process lifecycle event channel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Broadcast channel capacity for the lifecycle publisher
    pub channel_capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1000,
        }
    }
}

/// Top-level synchronizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Source module stamped on derived schedule tasks
    pub source_module: String,
    pub derivation: DerivationConfig,
    pub events: EventConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source_module: source_modules::TASK.to_string(),
            derivation: DerivationConfig::default(),
            events: EventConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from the optional `DAYFLOW_CONFIG_PATH` file
    /// merged with `DAYFLOW_`-prefixed environment variables
    /// (`DAYFLOW_DERIVATION__DEFAULT_MINUTES_BEFORE=15`), then validate.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Ok(path) = std::env::var("DAYFLOW_CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&path));
        }
        let loaded: Self = builder
            .add_source(
                Environment::with_prefix("DAYFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        debug!(
            "Configuration loaded: {}",
            serde_json::to_string(&loaded).unwrap_or_else(|_| "[serialization error]".to_string())
        );
        Ok(loaded)
    }

    /// Reject configurations the synchronizer cannot run on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_module.is_empty() {
            return Err(ConfigError::Invalid {
                field: "source_module",
                message: "must not be empty".to_string(),
            });
        }
        if parse_hhmm(&self.derivation.default_time).is_none() {
            return Err(ConfigError::Invalid {
                field: "derivation.default_time",
                message: format!("'{}' is not a valid HH:MM time", self.derivation.default_time),
            });
        }
        if self.derivation.default_weekdays.iter().any(|day| *day > 6) {
            return Err(ConfigError::Invalid {
                field: "derivation.default_weekdays",
                message: "weekdays must be in 0..=6".to_string(),
            });
        }
        if self
            .derivation
            .default_month_days
            .iter()
            .any(|day| *day < 1 || *day > 31)
        {
            return Err(ConfigError::Invalid {
                field: "derivation.default_month_days",
                message: "month days must be in 1..=31".to_string(),
            });
        }
        if self.events.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "events.channel_capacity",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
