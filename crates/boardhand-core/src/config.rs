//! Configuration management for boardhand.
//!
//! Settings come from two places: a TOML file stored in a platform-specific
//! location, and the raw string inputs of a workflow step (JSON label
//! mapping, comma-separated column lists). Both end up in [`Settings`].
//!
//! - **macOS/Linux**: `~/.config/boardhand/config.toml`
//! - **Windows**: `%APPDATA%\boardhand\config.toml`
//!
//! # Example
//!
//! ```ignore
//! use boardhand_core::config::Settings;
//!
//! let mut settings = Settings::load()?;
//! settings.set("column_by_label.bug", "In Progress")?;
//! settings.validate()?;
//! settings.save()?;
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "boardhand";

// =============================================================================
// Configuration structures
// =============================================================================

/// Which mapped label decides the column when an issue carries several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPrecedence {
    /// The first mapped label in the issue's label order wins
    #[default]
    First,
    /// The last mapped label in the issue's label order wins
    Last,
}

impl std::str::FromStr for LabelPrecedence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "first" => Ok(LabelPrecedence::First),
            "last" => Ok(LabelPrecedence::Last),
            other => Err(Error::Config(format!(
                "Unknown label precedence '{}'. Expected 'first' or 'last'",
                other
            ))),
        }
    }
}

/// Board automation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Repository owner (user or organization)
    #[serde(default)]
    pub owner: String,

    /// Repository name
    #[serde(default)]
    pub repo: String,

    /// Project number as shown in the board URL (not the internal id)
    #[serde(default)]
    pub project: u64,

    /// API base URL (for GitHub Enterprise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Column names never vacated by a labeled-event move
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_column_names: Vec<String>,

    /// Label added to an issue when it is closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_on_close: Option<String>,

    /// Column whose card is archived when its issue is closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_on_close: Option<String>,

    #[serde(default)]
    pub label_precedence: LabelPrecedence,

    /// Label name -> column name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub column_by_label: BTreeMap<String, String>,
}

// =============================================================================
// Raw input parsing
// =============================================================================

/// Parse a label -> column mapping given as a JSON object.
///
/// An empty (or whitespace-only) input yields an empty mapping.
pub fn parse_column_mapping(raw: &str) -> Result<BTreeMap<String, String>> {
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(raw).map_err(|e| {
        Error::Config(format!(
            "Label to column mapping is not a JSON object of strings: {}",
            e
        ))
    })
}

/// Parse a comma-separated list of column names.
pub fn parse_column_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a project number input.
pub fn parse_project_number(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(Error::Config(format!(
            "Invalid project number '{}'",
            raw.trim()
        ))),
        Ok(number) => Ok(number),
    }
}

/// Treat empty workflow inputs as unset.
pub fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

// =============================================================================
// Settings implementation
// =============================================================================

impl Settings {
    /// Get the configuration directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load settings from the default location.
    ///
    /// Returns default (empty) settings if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load settings from a specific path.
    ///
    /// Returns default (empty) settings if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let settings: Settings = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        info!(path = ?path, "Config loaded successfully");
        Ok(settings)
    }

    /// Save settings to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        debug!(path = ?path, "Saving config");

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        info!(path = ?path, "Config saved successfully");
        Ok(())
    }

    /// Check the fields every invocation needs before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() {
            return Err(Error::Config("invalid owner".to_string()));
        }
        if self.repo.trim().is_empty() {
            return Err(Error::Config("invalid repo".to_string()));
        }
        if self.project == 0 {
            return Err(Error::Config("invalid project number".to_string()));
        }
        Ok(())
    }

    /// Whether a column is excluded from labeled-event moves.
    pub fn is_ignored_column(&self, name: &str) -> bool {
        self.ignore_column_names.iter().any(|ignored| ignored == name)
    }

    /// Set a configuration value by key.
    ///
    /// Mapping entries use `column_by_label.<label>`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(label) = key.strip_prefix("column_by_label.") {
            if label.is_empty() {
                return Err(Error::Config("Missing label in mapping key".to_string()));
            }
            self.column_by_label
                .insert(label.to_string(), value.to_string());
            return Ok(());
        }

        match key {
            "owner" => self.owner = value.to_string(),
            "repo" => self.repo = value.to_string(),
            "project" => self.project = parse_project_number(value)?,
            "base_url" | "url" => self.base_url = non_empty(Some(value.to_string())),
            "column_by_label" => self.column_by_label = parse_column_mapping(value)?,
            "ignore_column_names" => self.ignore_column_names = parse_column_list(value),
            "label_on_close" => self.label_on_close = non_empty(Some(value.to_string())),
            "remove_on_close" => self.remove_on_close = non_empty(Some(value.to_string())),
            "label_precedence" => self.label_precedence = value.parse()?,
            _ => return Err(Error::Config(format!("Unknown config key: {}", key))),
        }

        Ok(())
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(label) = key.strip_prefix("column_by_label.") {
            return Ok(self.column_by_label.get(label).cloned());
        }

        let value = match key {
            "owner" => Some(self.owner.clone()).filter(|s| !s.is_empty()),
            "repo" => Some(self.repo.clone()).filter(|s| !s.is_empty()),
            "project" => Some(self.project).filter(|n| *n > 0).map(|n| n.to_string()),
            "base_url" | "url" => self.base_url.clone(),
            "column_by_label" => Some(serde_json::to_string(&self.column_by_label)?),
            "ignore_column_names" => Some(self.ignore_column_names.join(",")),
            "label_on_close" => self.label_on_close.clone(),
            "remove_on_close" => self.remove_on_close.clone(),
            "label_precedence" => Some(
                match self.label_precedence {
                    LabelPrecedence::First => "first",
                    LabelPrecedence::Last => "last",
                }
                .to_string(),
            ),
            _ => return Err(Error::Config(format!("Unknown config key: {}", key))),
        };

        Ok(value)
    }
}

// =============================================================================
// Tests
// =============================================================================
