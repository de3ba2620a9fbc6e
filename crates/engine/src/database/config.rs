//! Database configuration via `arbor.toml`
//!
//! A data directory holds the SQLite file and a small config file. On first
//! open, a default `arbor.toml` is created. To change settings, edit the file
//! and reopen.

use arbor_core::{ArborError, ArborResult, MAX_NESTING_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name placed in the database data directory.
pub const CONFIG_FILE_NAME: &str = "arbor.toml";

/// SQLite file name placed in the database data directory.
pub const DATABASE_FILE_NAME: &str = "arbor.db";

/// Database configuration loaded from `arbor.toml`.
///
/// # Example
///
/// ```toml
/// busy_timeout_ms = 30000
/// journal_mode = "wal"
/// synchronous = "normal"
/// max_nesting_depth = 100
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArborConfig {
    /// How long a writer waits for a competing lock before failing with
    /// `Busy`, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// SQLite journal mode: `"wal"` or `"delete"`.
    #[serde(default = "default_journal_mode")]
    pub journal_mode: String,
    /// SQLite synchronous level: `"normal"` or `"full"`.
    #[serde(default = "default_synchronous")]
    pub synchronous: String,
    /// Deepest value accepted by a single add or update.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

fn default_busy_timeout_ms() -> u64 {
    30_000
}

fn default_journal_mode() -> String {
    "wal".to_string()
}

fn default_synchronous() -> String {
    "normal".to_string()
}

fn default_max_nesting_depth() -> usize {
    MAX_NESTING_DEPTH
}

impl Default for ArborConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: default_journal_mode(),
            synchronous: default_synchronous(),
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

impl ArborConfig {
    /// Check every field, returning the first invalid one.
    pub fn validate(&self) -> ArborResult<()> {
        match self.journal_mode.as_str() {
            "wal" | "delete" => {}
            other => {
                return Err(ArborError::config(format!(
                    "Invalid journal_mode '{}' in arbor.toml. Expected \"wal\" or \"delete\".",
                    other
                )));
            }
        }
        match self.synchronous.as_str() {
            "normal" | "full" => {}
            other => {
                return Err(ArborError::config(format!(
                    "Invalid synchronous '{}' in arbor.toml. Expected \"normal\" or \"full\".",
                    other
                )));
            }
        }
        if self.max_nesting_depth == 0 {
            return Err(ArborError::config("max_nesting_depth must be at least 1"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Arbor database configuration
#
# How long a writer waits for a competing lock before giving up (ms).
busy_timeout_ms = 30000

# SQLite journal mode: "wal" (default) or "delete"
journal_mode = "wal"

# SQLite synchronous level: "normal" (default) or "full"
#   "normal" = fsync at checkpoints, may lose the last commits on power loss
#   "full"   = fsync every commit
synchronous = "normal"

# Deepest JSON value accepted by a single add or update.
max_nesting_depth = 100
"#
    }

    /// Read and parse config from a file path.
    pub fn from_file(path: &Path) -> ArborResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ArborError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: ArborConfig = toml::from_str(&content).map_err(|e| {
            ArborError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> ArborResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                ArborError::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> ArborResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ArborError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            ArborError::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
