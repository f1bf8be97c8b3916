//! Runtime configuration for relief front ends.
//!
//! # Responsibility
//! - Collect database and logging settings into one value built at startup.
//! - Resolve defaults, then environment overrides, then caller overrides.
//!
//! # Invariants
//! - Blank environment values are ignored rather than treated as paths.
//! - Nothing here is global; callers pass the config where it is needed.

use crate::db::{open_db, DbResult};
use crate::logging::{default_log_level, init_logging};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Database file used when nothing else is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "disaster_relief.sqlite3";
pub const DB_PATH_ENV: &str = "RELIEF_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "RELIEF_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "RELIEF_LOG_DIR";

/// Process-level settings for opening storage and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReliefConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging stays off while this is `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for ReliefConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ReliefConfig {
    /// Builds config from defaults overlaid with `RELIEF_*` variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = non_blank(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        if let Some(dir) = non_blank(LOG_DIR_ENV) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        config
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    /// Opens and migrates the configured database.
    pub fn open_database(&self) -> DbResult<Connection> {
        open_db(&self.db_path)
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging is left disabled.
    pub fn start_logging(&self) -> Result<bool, String> {
        match self.log_dir.as_deref() {
            Some(dir) => init_logging(&self.log_level, dir).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::{ReliefConfig, DB_PATH_ENV, DEFAULT_DB_FILE_NAME, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| values.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = ReliefConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = ReliefConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, " /var/lib/relief/camps.db "),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/var/log/relief"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/var/lib/relief/camps.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/relief")));
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let config = ReliefConfig::from_lookup(lookup_from(&[(DB_PATH_ENV, "   ")]));
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
    }

    #[test]
    fn start_logging_is_noop_without_directory() {
        let config = ReliefConfig::default();
        assert_eq!(config.start_logging(), Ok(false));
    }

    #[test]
    fn builder_overrides_win() {
        let config = ReliefConfig::default()
            .with_db_path("/tmp/override.db")
            .with_log_level("trace");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/override.db").as_path());
        assert_eq!(config.log_level, "trace");
    }
}
