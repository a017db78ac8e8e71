//! Configuration schema (db-drift.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::category::ObjectCategory;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "db-drift.toml";

/// Default DBMS when neither the CLI nor the config file names one
pub const DEFAULT_DBMS: &str = "sqlite";

/// Default report path
pub const DEFAULT_OUTPUT: &str = "drift_report.html";

/// Rules removing categories and objects from both snapshots before diffing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRules {
    /// Categories left out of the comparison entirely
    #[serde(default)]
    pub skip_categories: Vec<ObjectCategory>,

    /// Qualified-name patterns (`*` wildcard) of objects to leave out
    #[serde(default)]
    pub skip_objects: Vec<String>,
}

impl FilterRules {
    /// Check if a whole category is skipped
    pub fn is_category_skipped(&self, category: ObjectCategory) -> bool {
        self.skip_categories.contains(&category)
    }

    /// Check if an object matches any skip pattern
    pub fn is_object_skipped(&self, name: &str) -> bool {
        self.skip_objects.iter().any(|pattern| glob_match(pattern, name))
    }

    /// Whether the rules skip anything at all
    pub fn is_empty(&self) -> bool {
        self.skip_categories.is_empty() && self.skip_objects.is_empty()
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// DBMS of both databases
    #[serde(default = "default_dbms")]
    pub dbms: String,

    /// Report output path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Comparison filters
    #[serde(default)]
    pub filter: FilterRules,
}

fn default_dbms() -> String {
    DEFAULT_DBMS.to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dbms: default_dbms(),
            output: default_output(),
            filter: FilterRules::default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize config to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }
}

/// Simple glob matching, `*` matches any run of characters
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == text;
    }

    let (first, last) = (parts[0], parts[parts.len() - 1]);
    if !text.starts_with(first) || text.len() < first.len() + last.len() || !text.ends_with(last) {
        return false;
    }

    let mut rest = &text[first.len()..text.len() - last.len()];
    for middle in &parts[1..parts.len() - 1] {
        match rest.find(middle) {
            Some(pos) => rest = &rest[pos + middle.len()..],
            None => return false,
        }
    }
    true
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
