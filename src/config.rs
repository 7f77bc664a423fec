/// Runtime configuration
///
/// Persisted as JSON in the platform config directory; created with
/// defaults on first run so operators have a file to edit.
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sequencer::JobTiming;

const APP_DIR: &str = "TvQueueCaller";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upper bound in milliseconds on waiting for a speech outcome
    pub speech_timeout_ms: u64,

    /// Pause in milliseconds after clearing a pop-up, so consecutive calls
    /// stay visually distinct
    pub settle_ms: u64,

    /// Display time in milliseconds when no speech engine is available
    pub silent_display_ms: u64,

    /// Optional chime audio file played as the call sound
    #[serde(default)]
    pub chime_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speech_timeout_ms: 1600,
            settle_ms: 200,
            silent_display_ms: 1200,
            chime_path: None,
        }
    }
}

impl Config {
    /// Load configuration from the platform-specific config directory.
    /// Creates default config if file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::LoadFailed {
                path: config_path.display().to_string(),
                source: Box::new(e),
            })?;
            let config: Config =
                serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: config_path.display().to_string(),
                    source: Box::new(e),
                })?;
            config.validate()?;

            tracing::info!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            tracing::info!(path = %config_path.display(), "Created default config");
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: config_path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(&config_path, json).map_err(|e| ConfigError::SaveFailed {
            path: config_path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(())
    }

    /// Validate timing ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(200..=10_000).contains(&self.speech_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "speech_timeout_ms must be 200-10000, got {}",
                self.speech_timeout_ms
            )));
        }
        if self.settle_ms > 2_000 {
            return Err(ConfigError::Invalid(format!(
                "settle_ms must be 0-2000, got {}",
                self.settle_ms
            )));
        }
        if !(200..=10_000).contains(&self.silent_display_ms) {
            return Err(ConfigError::Invalid(format!(
                "silent_display_ms must be 200-10000, got {}",
                self.silent_display_ms
            )));
        }
        Ok(())
    }

    /// Per-job timing derived from this config
    pub fn timing(&self) -> JobTiming {
        JobTiming {
            speech_timeout: Duration::from_millis(self.speech_timeout_ms),
            settle: Duration::from_millis(self.settle_ms),
            silent_display: Duration::from_millis(self.silent_display_ms),
        }
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir().ok_or_else(|| {
            ConfigError::Invalid("No config directory available on this platform".to_string())
        })?;
        Ok(base.join(APP_DIR).join(CONFIG_FILE))
    }
}
