//! Runpad configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[derive(Serialize, Deserialize)]` generates the TOML mapping for
//! these structs. `#[serde(default)]` fills missing fields from
//! `Default::default()`, so a config file only needs the keys it changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session start-up settings
    pub editor: EditorConfig,

    /// Remote execution settings
    pub execution: ExecutionConfig,

    /// Durable store settings
    pub store: StoreConfig,

    /// Per-language overrides and additions to the built-in catalog
    pub languages: BTreeMap<String, LanguageConfig>,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from_default_path().unwrap_or_else(|err| {
            tracing::warn!("Ignoring unreadable config: {}", err);
            Self::default()
        })
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("runpad").join("config.toml"))
    }
}

/// Session start-up configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Language selected when a session starts
    pub default_language: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_language: "javascript".to_string(),
        }
    }
}

/// Remote execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// `POST` endpoint of the execution service
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// How overlapping runs are reconciled
    pub run_policy: RunPolicy,
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            endpoint: runpad_piston::DEFAULT_ENDPOINT.to_string(),
            timeout_secs: runpad_piston::DEFAULT_TIMEOUT.as_secs(),
            run_policy: RunPolicy::default(),
        }
    }
}

/// What happens when a run resolves while another one is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunPolicy {
    /// Every response is applied as it arrives; the last to resolve wins
    #[default]
    LastResolved,
    /// Only the most recently issued run may update the session
    LatestIssued,
}

/// Durable store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store file; defaults to the platform data directory
    pub path: Option<PathBuf>,
}

/// Language catalog entry override.
///
/// Fields left out keep the built-in value. A language that is not built in
/// must name its `runtime` and `version`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub label: Option<String>,

    /// Syntax mode name for the editing surface
    pub mode: Option<String>,

    /// Runtime name understood by the execution service
    pub runtime: Option<String>,

    /// Runtime version understood by the execution service
    pub version: Option<String>,

    /// Starter source text
    pub default_code: Option<String>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
