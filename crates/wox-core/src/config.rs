//! Configuration types.
//!
//! The query box reads `launcher.toml` from the Wox config directory. Every
//! field has a default, so a missing file (or a file that only sets a few
//! keys) is fine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// File name of the launcher configuration.
pub const CONFIG_FILE_NAME: &str = "launcher.toml";

/// Runtime configuration loaded from `launcher.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Query and result list settings
    #[serde(default)]
    pub query: QueryConfig,

    /// Extra keybindings, keystroke -> command name
    #[serde(default)]
    pub keymap: HashMap<String, String>,
}

/// Query and result list settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryConfig {
    /// How long to keep showing the previous result list after a new query
    /// before clearing it, in milliseconds.
    pub stale_timeout_ms: u64,

    /// Number of rows visible at once.
    pub shown_item_count: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_timeout_ms: 50,
            shown_item_count: 10,
        }
    }
}

impl QueryConfig {
    /// The staleness timeout as a `Duration`.
    pub fn stale_timeout(&self) -> Duration {
        Duration::from_millis(self.stale_timeout_ms)
    }
}

impl LauncherConfig {
    /// Load from the default location, falling back to defaults if the file
    /// does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        if !path.exists() {
            tracing::info!("No {} found at {:?}, using defaults", CONFIG_FILE_NAME, path);
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {:?}", path);

        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the query box cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.shown_item_count == 0 {
            return Err(ConfigError::Invalid(
                "query.shown_item_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wox"))
}

/// Get the path to launcher.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE_NAME))
}
