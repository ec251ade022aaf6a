//! Configuration management for the SQL sandbox.
//!
//! Handles loading configuration from a TOML file. Command-line flags are
//! layered on top in `main`.

use crate::db::sample;
use crate::error::{Result, SandboxError};
use crate::render::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Store set-up.
    #[serde(default)]
    pub store: StoreConfig,

    /// Presentation settings.
    #[serde(default)]
    pub view: ViewConfig,
}

/// Store set-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Load the employees/departments/projects sample tables.
    #[serde(default = "default_sample_data")]
    pub sample_data: bool,

    /// Extra SQL script run after the sample data.
    pub seed_file: Option<PathBuf>,
}

fn default_sample_data() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sample_data: default_sample_data(),
            seed_file: None,
        }
    }
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewConfig {
    /// Table in front at start-up.
    #[serde(default = "default_table")]
    pub default_table: String,

    /// Rows printed per result set before truncating the display.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_table() -> String {
    sample::DEFAULT_TABLE.to_string()
}

fn default_max_rows() -> usize {
    200
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_table: default_table(),
            max_rows: default_max_rows(),
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sql-sandbox")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file; a missing file means defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SandboxError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            SandboxError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would leave the sandbox unusable.
    pub fn validate(&self) -> Result<()> {
        if self.view.default_table.trim().is_empty() {
            return Err(SandboxError::config("view.default_table must not be empty"));
        }
        if self.view.max_rows == 0 {
            return Err(SandboxError::config("view.max_rows must be at least 1"));
        }
        Ok(())
    }

    /// Reads the seed script, if one is configured.
    pub fn seed_sql(&self) -> Result<Option<String>> {
        let Some(path) = &self.store.seed_file else {
            return Ok(None);
        };
        std::fs::read_to_string(path).map(Some).map_err(|e| {
            SandboxError::config(format!(
                "Failed to read seed file {}: {e}",
                path.display()
            ))
        })
    }
}
