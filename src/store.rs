//! Persistent configuration store.
//!
//! A single TOML file holding platform facts (`root_dir`, `envs_dirs`,
//! `subdir`, ...) next to free-form build keys that the resolver reads
//! through nested lookups with defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use toml::{Table, Value};

use crate::constants;

/// Errors raised by the store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config key `{key}` must be {expected}")]
    InvalidType { key: String, expected: &'static str },
}

/// Platform facts recorded in the store. Unknown keys are ignored here and
/// stay reachable through the raw lookups.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PlatformFacts {
    root_dir: Option<PathBuf>,
    root_writable: Option<bool>,
    envs_dirs: Vec<PathBuf>,
    subdir: Option<String>,
    default_python: Option<String>,
}

/// Parsed store contents.
#[derive(Debug, Clone, Default)]
pub struct Store {
    path: Option<PathBuf>,
    table: Table,
    facts: PlatformFacts,
}

impl Store {
    /// An empty store; every lookup falls through to defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Select and load the store file.
    ///
    /// An explicit path must exist. Otherwise the global file is used when
    /// present, and an empty store when it is not.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, StoreError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::global_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::empty()),
        }
    }

    /// Load a store from a specific file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut store = Self::from_toml_str(&content).map_err(|e| StoreError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), keys = store.table.len(), "store loaded");
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    /// Parse a store from TOML text (no backing file).
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let table: Table = toml::from_str(content)?;
        let facts: PlatformFacts = toml::from_str(content)?;
        Ok(Self {
            path: None,
            table,
            facts,
        })
    }

    /// Get the global store file path.
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join(constants::CONFIG_FILENAME))
    }

    /// File this store was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Top-level lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.table.get(key)
    }

    /// Walk nested tables. Missing intermediate tables read as absent.
    pub fn get_nested(&self, keys: &[&str]) -> Option<&Value> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.table.get(*first)?;
        for key in rest {
            current = current.as_table()?.get(*key)?;
        }
        Some(current)
    }

    /// String value at a nested key; present-but-not-a-string is an error.
    pub fn get_str(&self, keys: &[&str]) -> Result<Option<&str>, StoreError> {
        match self.get_nested(keys) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(StoreError::InvalidType {
                key: keys.join("."),
                expected: "a string",
            }),
        }
    }

    /// Truthiness of a top-level key, `None` when absent.
    pub fn get_flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(truthy)
    }

    // ── Platform facts ──────────────────────────────────────────────

    /// Configured root directory.
    pub fn root_dir(&self) -> Option<&Path> {
        self.facts
            .root_dir
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Whether the store declares the root directory writable.
    pub fn root_writable(&self) -> Option<bool> {
        self.facts.root_writable
    }

    /// Configured environment directories, in priority order.
    pub fn envs_dirs(&self) -> Option<&[PathBuf]> {
        if self.facts.envs_dirs.is_empty() {
            None
        } else {
            Some(&self.facts.envs_dirs)
        }
    }

    /// Configured package subdirectory identifier.
    pub fn subdir(&self) -> Option<&str> {
        self.facts.subdir.as_deref().filter(|s| !s.is_empty())
    }

    /// Default interpreter version declared by the platform installation.
    pub fn default_python(&self) -> Option<&str> {
        self.facts.default_python.as_deref().filter(|s| !s.is_empty())
    }
}

/// Truthiness coercion for store values.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Boolean(b) => *b,
        Value::Integer(n) => *n != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Table(t) => !t.is_empty(),
        Value::Datetime(_) => true,
    }
}
