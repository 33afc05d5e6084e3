//! CLI probe for sharehub core.
//!
//! # Responsibility
//! - Bootstrap the shared database the same way a server process would.
//! - Print a short, deterministic status summary.

use log::warn;
use sharehub_core::db::{bootstrap_shared, with_shared_connection};
use sharehub_core::{
    init_logging_from_config, AppConfig, ContentService, RepoError, SettingsService,
    SqliteContentRepository, SqliteSettingsRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("sharehub_core ping={}", sharehub_core::ping());
    println!("sharehub_core version={}", sharehub_core::core_version());

    let config = AppConfig::from_env();
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    if !bootstrap_shared(&config) {
        warn!("event=cli_bootstrap module=cli status=error");
    }

    let summary = with_shared_connection(|conn| -> Result<(String, usize), RepoError> {
        let site_name = SettingsService::new(SqliteSettingsRepository::try_new(conn)?)
            .get()?
            .map(|settings| settings.site_name)
            .unwrap_or_default();
        let content_count = ContentService::new(SqliteContentRepository::try_new(conn)?)
            .list(None)?
            .len();
        Ok((site_name, content_count))
    });

    match summary {
        Ok((site_name, content_count)) => {
            println!("site_name={site_name}");
            println!("content_count={content_count}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error={err}");
            ExitCode::FAILURE
        }
    }
}
