//! Runtime configuration.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - A validated config has a usable collection name and a normalized log level.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use crate::repo::note_repo::LookupPolicy;
use crate::store::validate_collection_name;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_COLLECTION: &str = "note";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings shared by every front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoteSyncConfig {
    /// Document collection holding the notes.
    pub collection: String,
    /// SQLite store file; `None` means an in-memory store.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<String>,
    /// Report failed lookups as errors instead of "not found".
    pub strict_lookups: bool,
}

impl Default for NoteSyncConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            strict_lookups: false,
        }
    }
}

impl NoteSyncConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Normalizes fields in place and rejects unusable values.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.collection = self.collection.trim().to_string();
        validate_collection_name(&self.collection)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        self.log_level = normalize_level(&self.log_level)
            .map_err(ConfigError::Invalid)?
            .to_string();

        if let Some(dir) = &self.log_dir {
            normalize_log_dir(dir).map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        if self.strict_lookups {
            LookupPolicy::Strict
        } else {
            LookupPolicy::Lenient
        }
    }
}
