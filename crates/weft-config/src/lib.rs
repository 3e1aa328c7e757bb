//! Tool-level configuration for the weft CLI
//!
//! Project documents (project.json, page ASTs) live in the project directory
//! and are handled by weft-ast; this crate only covers the CLI's own settings:
//! where generated artifacts go and where component manifests are looked up,
//! relative to a project directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default output directory, relative to the project directory
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Default manifests directory, relative to the project directory
pub const DEFAULT_MANIFESTS_DIR: &str = "manifests";

/// Error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Serialize(e) => write!(f, "Failed to serialize config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifests_dir: Option<String>,
}

impl Config {
    /// Resolve the config file path
    pub fn path() -> PathBuf {
        // Honor explicit override via WEFT_CONFIG for tests / isolated runs.
        if let Ok(env_path) = std::env::var("WEFT_CONFIG") {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        #[cfg(not(target_os = "windows"))]
        let default = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("weft")
            .join("weft.toml");

        #[cfg(target_os = "windows")]
        let default = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weft")
            .join("weft.toml");

        default
    }

    /// Load config from the default location, returning defaults if absent
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "output-dir" => self.output_dir.clone(),
            "manifests-dir" => self.manifests_dir.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> bool {
        match key {
            "output-dir" => {
                self.output_dir = Some(value);
                true
            }
            "manifests-dir" => {
                self.manifests_dir = Some(value);
                true
            }
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.output_dir.is_none() && self.manifests_dir.is_none()
    }

    pub fn values_iter(&self) -> Vec<(&str, String)> {
        let mut values = Vec::new();
        if let Some(ref val) = self.output_dir {
            values.push(("output-dir", val.clone()));
        }
        if let Some(ref val) = self.manifests_dir {
            values.push(("manifests-dir", val.clone()));
        }
        values
    }

    /// Resolve the artifact output directory for a project
    pub fn output_dir_for(&self, project_dir: &Path) -> PathBuf {
        let dir = self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);
        project_dir.join(dir)
    }

    /// Resolve the component manifests directory for a project
    pub fn manifests_dir_for(&self, project_dir: &Path) -> PathBuf {
        let dir = self
            .manifests_dir
            .as_deref()
            .unwrap_or(DEFAULT_MANIFESTS_DIR);
        project_dir.join(dir)
    }
}
