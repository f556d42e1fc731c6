//! Ringing configuration.
//!
//! Holds the preferences a ringing session reads at start-up: the ring
//! duration cap, the mimic games enabled for new alarms, and the simulated
//! bind latency of the local playback service. Values are loaded from a JSON
//! file; missing fields and a missing file fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RingingError;
use crate::types::{MimicKind, RingDuration, DEFAULT_RING_DURATION_MS};

/// Upper bound for the ring duration (24 hours).
pub const MAX_RING_DURATION_MS: i64 = 24 * 60 * 60 * 1000;

/// Directory name under the platform config directory.
const CONFIG_DIR_NAME: &str = "alarm-ringing";

/// File name of the configuration file.
const CONFIG_FILE_NAME: &str = "config.json";

fn default_ring_duration_ms() -> i64 {
    DEFAULT_RING_DURATION_MS
}

fn default_mimics() -> Vec<MimicKind> {
    MimicKind::ALL.to_vec()
}

fn default_playback_bind_delay_ms() -> u64 {
    0
}

/// Ringing session configuration.
///
/// # Example
///
/// ```
/// use alarm_ringing::config::RingingConfig;
///
/// let config = RingingConfig::default();
/// assert_eq!(config.ring_duration_ms, 2 * 60 * 60 * 1000);
/// assert_eq!(config.default_mimics.len(), 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RingingConfig {
    /// Maximum ringing time in milliseconds. Zero or negative disables the cap.
    #[serde(default = "default_ring_duration_ms")]
    pub ring_duration_ms: i64,

    /// Mimic games enabled for alarms that do not specify their own.
    #[serde(default = "default_mimics")]
    pub default_mimics: Vec<MimicKind>,

    /// Delay before the local playback service reports itself bound.
    #[serde(default = "default_playback_bind_delay_ms")]
    pub playback_bind_delay_ms: u64,
}

impl Default for RingingConfig {
    fn default() -> Self {
        Self {
            ring_duration_ms: default_ring_duration_ms(),
            default_mimics: default_mimics(),
            playback_bind_delay_ms: default_playback_bind_delay_ms(),
        }
    }
}

impl RingingConfig {
    /// Returns the default configuration file path, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds out-of-range values.
    pub fn load_from(path: &Path) -> Result<Self, RingingError> {
        let text = std::fs::read_to_string(path).map_err(|source| RingingError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        let config: RingingConfig =
            serde_json::from_str(&text).map_err(|source| RingingError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads the configuration from `path`, or from the default location.
    ///
    /// A missing file yields the defaults; any other failure is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, RingingError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), RingingError> {
        if self.ring_duration_ms > MAX_RING_DURATION_MS {
            return Err(RingingError::InvalidConfig(format!(
                "鳴動時間が長すぎます: {}ms",
                self.ring_duration_ms
            )));
        }
        Ok(())
    }

    /// Returns the configured ring duration.
    pub fn ring_duration(&self) -> RingDuration {
        RingDuration::from_millis(self.ring_duration_ms)
    }

    /// Overrides the ring duration.
    #[must_use]
    pub fn with_ring_duration_ms(mut self, millis: i64) -> Self {
        self.ring_duration_ms = millis;
        self
    }

    /// Overrides the default mimic games.
    #[must_use]
    pub fn with_default_mimics(mut self, mimics: Vec<MimicKind>) -> Self {
        self.default_mimics = mimics;
        self
    }
}
