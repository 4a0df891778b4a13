//! Settings management

use arbor_core::time::{SimulationTime, TICK_RATE_HZ};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tick rate must be greater than zero")]
    InvalidTickRate,

    #[error("metrics window must hold at least one sample")]
    InvalidWindow,

    #[error("unknown log level `{0}` (expected trace, debug, info, warn or error)")]
    InvalidLogLevel(String),
}

/// Loop driver settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub tick_rate_hz: u32,
    /// Stop after this many ticks; run until shutdown when unset.
    pub max_ticks: Option<u64>,
    /// Sleep off the remainder of each step instead of ticking flat out.
    pub pace_to_wall_clock: bool,
    pub log_level: String,
    pub metrics_window: usize,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,
            max_ticks: None,
            pace_to_wall_clock: false,
            log_level: "info".to_string(),
            metrics_window: 120,
        }
    }
}

impl RuntimeSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "loaded runtime settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::InvalidTickRate);
        }
        if self.metrics_window == 0 {
            return Err(SettingsError::InvalidWindow);
        }
        self.level()?;
        Ok(())
    }

    /// Parsed `log_level`.
    pub fn level(&self) -> Result<tracing::Level, SettingsError> {
        self.log_level
            .parse()
            .map_err(|_| SettingsError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Duration of one fixed step at `tick_rate_hz`.
    pub fn tick_duration(&self) -> Duration {
        SimulationTime::with_rate(self.tick_rate_hz).step()
    }
}
