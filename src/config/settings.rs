//! TOML-based configuration for snql.
//!
//! Example configuration:
//! ```toml
//! [legacy]
//! time_column = "started"
//! default_dataset = "sessions"
//!
//! [[legacy.scope]]
//! field = "project"
//! column = "project_id"
//!
//! [[legacy.scope]]
//! field = "organization"
//! column = "org_id"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Legacy body translation.
    pub legacy: LegacySettings,
}

/// Legacy adapter configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LegacySettings {
    /// Column compared against `from_date` and `to_date`.
    pub time_column: String,

    /// Dataset used when the body does not name one.
    pub default_dataset: String,

    /// Top-level body fields turned into scope conditions, in order.
    pub scope: Vec<ScopeField>,
}

/// Maps a body field such as `project` to the column it filters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScopeField {
    pub field: String,
    pub column: String,
}

impl ScopeField {
    pub fn new(field: &str, column: &str) -> Self {
        Self {
            field: field.into(),
            column: column.into(),
        }
    }
}

impl Default for LegacySettings {
    fn default() -> Self {
        Self {
            time_column: "started".to_string(),
            default_dataset: String::new(),
            scope: vec![
                ScopeField::new("project", "project_id"),
                ScopeField::new("organization", "org_id"),
            ],
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SNQL_CONFIG`
    /// 2. `./snql.toml`
    /// 3. `~/.config/snql/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SNQL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("snql.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("snql").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }
}
