//! Environment-driven configuration.
//!
//! # Responsibility
//! - Read database location, access-log flag, bootstrap callback and logging
//!   options from the process environment (after an optional `.env` file).
//!
//! # Invariants
//! - Parsing never fails; unknown or empty values fall back to defaults.

use crate::logging::default_log_level;
use log::debug;
use std::path::PathBuf;

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_ENABLE_ACCESS_LOG: &str = "ENABLE_ACCESS_LOG";
pub const ENV_BOOTSTRAP_BASE_URL: &str = "BOOTSTRAP_BASE_URL";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "LOG_DIR";

const DEFAULT_DATABASE_URL: &str = "sharehub.sqlite3";
const MEMORY_DATABASE_URL: &str = ":memory:";

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

/// Process configuration for sharehub core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `sqlite://path`, `sqlite:path`, a bare path, or `:memory:`.
    pub database_url: String,
    /// Gates every access-log write.
    pub enable_access_log: bool,
    /// Base URL of the HTTP schema-init collaborator; unset skips it.
    pub bootstrap_base_url: Option<String>,
    pub log_level: String,
    /// Absolute directory for rolling log files; unset disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            enable_access_log: false,
            bootstrap_base_url: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env` (when present) and reads the process environment.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!(
                "event=config_load module=config status=ok env_file={}",
                path.display()
            ),
            Err(_) => debug!("event=config_load module=config status=ok env_file=none"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            database_url: non_empty(ENV_DATABASE_URL).unwrap_or(defaults.database_url),
            enable_access_log: non_empty(ENV_ENABLE_ACCESS_LOG)
                .map(|value| parse_flag(&value))
                .unwrap_or(defaults.enable_access_log),
            bootstrap_base_url: non_empty(ENV_BOOTSTRAP_BASE_URL),
            log_level: non_empty(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: non_empty(ENV_LOG_DIR).map(PathBuf::from),
        }
    }

    /// Config for an isolated in-memory database.
    pub fn in_memory() -> Self {
        Self {
            database_url: MEMORY_DATABASE_URL.to_string(),
            ..Self::default()
        }
    }

    /// Resolves `database_url` into a concrete SQLite target.
    pub fn database_target(&self) -> DatabaseTarget {
        let url = self.database_url.trim();
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        if path.is_empty() || path == MEMORY_DATABASE_URL {
            DatabaseTarget::Memory
        } else {
            DatabaseTarget::File(PathBuf::from(path))
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DatabaseTarget};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert!(!config.enable_access_log);
        assert_eq!(
            config.database_target(),
            DatabaseTarget::File(PathBuf::from("sharehub.sqlite3"))
        );
    }

    #[test]
    fn access_log_flag_accepts_common_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(config_from(&[("ENABLE_ACCESS_LOG", value)]).enable_access_log);
        }
        for value in ["0", "false", "off", "nope"] {
            assert!(!config_from(&[("ENABLE_ACCESS_LOG", value)]).enable_access_log);
        }
    }

    #[test]
    fn database_url_schemes_resolve_to_targets() {
        let file = config_from(&[("DATABASE_URL", "sqlite:///var/lib/share.db")]);
        assert_eq!(
            file.database_target(),
            DatabaseTarget::File(PathBuf::from("/var/lib/share.db"))
        );

        let memory = config_from(&[("DATABASE_URL", "sqlite::memory:")]);
        assert_eq!(memory.database_target(), DatabaseTarget::Memory);
        assert_eq!(AppConfig::in_memory().database_target(), DatabaseTarget::Memory);
    }

    #[test]
    fn blank_bootstrap_url_is_treated_as_unset() {
        let config = config_from(&[("BOOTSTRAP_BASE_URL", "   "), ("LOG_DIR", "/tmp/logs")]);
        assert_eq!(config.bootstrap_base_url, None);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
    }
}
