//! Service configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! [engine]
//! ticks = 10
//! tick_interval_ms = 1000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
}

/// Shape of the simulated job: `ticks` steps of `tick_interval_ms` each.
///
/// Cancellation is observed once per tick, so `tick_interval_ms` bounds the
/// cancellation latency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ticks: u32,
    pub tick_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ticks: 10,
            tick_interval_ms: 1000,
        }
    }
}

impl EngineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Total wall time of an uncancelled run. Saturates instead of
    /// overflowing for configs that skipped `validate`.
    pub fn run_duration(&self) -> Duration {
        self.tick_interval().saturating_mul(self.ticks)
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let engine = &self.engine;
        if engine.ticks == 0 {
            return Err(ConfigError::Invalid(
                "engine.ticks must be greater than zero".to_string(),
            ));
        }
        if engine.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "engine.tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if engine
            .tick_interval_ms
            .checked_mul(u64::from(engine.ticks))
            .is_none()
        {
            return Err(ConfigError::Invalid(format!(
                "engine.ticks * engine.tick_interval_ms overflows ({} * {})",
                engine.ticks, engine.tick_interval_ms
            )));
        }
        Ok(())
    }
}
