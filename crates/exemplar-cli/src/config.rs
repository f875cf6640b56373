//! Configuration management for the CLI
//!
//! Configuration comes from, in order of precedence:
//! - The file named by `--config` or `EXEMPLAR_CONFIG`
//! - The first default location that exists
//! - Built-in defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputSettings,

    /// Logging settings
    pub logging: LoggingSettings,

    /// Validation settings
    pub validate: ValidateSettings,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,

    /// Longest value rendered in human summaries
    pub summary_length: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error), used without `-v`
    pub level: String,

    /// Log format (compact, full, json)
    pub format: String,
}

/// Validation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateSettings {
    /// Report validation errors without failing
    pub collect: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
            summary_length: 77,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// File formats a configuration can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Toml,
    Json,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("toml") => FileFormat::Toml,
            _ => FileFormat::Json,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Default configuration file paths, checked in order
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("exemplar.yaml"),
            PathBuf::from("exemplar.json"),
            PathBuf::from("exemplar.toml"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("exemplar").join("config.yaml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join("exemplar").join("config.yaml");
            if !paths.contains(&user) {
                paths.push(user);
            }
        }

        paths
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))
    }
}
