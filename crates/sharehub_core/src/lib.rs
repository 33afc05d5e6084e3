//! Data-access core for the content sharing application.
//! Owns schema bootstrap, content storage, access logging and site settings.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, DatabaseTarget};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::access_log::AccessLog;
pub use model::content::{Content, ContentId, ContentPatch, ContentType, NewContent};
pub use model::site_settings::{SiteSettings, SiteSettingsPatch};
pub use repo::access_logger::AccessLogger;
pub use repo::content_repo::{ContentRepository, RepoError, RepoResult, SqliteContentRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use service::content_service::ContentService;
pub use service::settings_service::SettingsService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
