//! Process-wide database handle.
//!
//! # Responsibility
//! - Establish the shared connection once, at process start.
//! - Hand out exclusive access to that connection for data operations.
//!
//! # Invariants
//! - The handle is set at most once and lives until process exit.
//! - A failed bootstrap leaves the handle unset; callers then get
//!   `DbError::ConnectionNotInitialized`.
//! - A later `bootstrap_shared` call retries a failed bootstrap.

use super::open::{open_db, open_db_in_memory, open_db_with_initializer};
use super::remote::HttpSchemaInitializer;
use super::{DbError, DbResult};
use crate::config::{AppConfig, DatabaseTarget};
use log::{error, info};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

static SHARED_DB: OnceCell<SharedDb> = OnceCell::new();

/// Shared, mutex-guarded SQLite connection.
pub struct SharedDb {
    conn: Mutex<Connection>,
}

impl SharedDb {
    /// Runs `f` with exclusive access to the shared connection.
    pub fn with_connection<T, E>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

/// Returns the shared handle, or `ConnectionNotInitialized` before bootstrap.
pub fn shared() -> DbResult<&'static SharedDb> {
    SHARED_DB.get().ok_or(DbError::ConnectionNotInitialized)
}

/// Runs `f` against the shared connection.
///
/// # Errors
/// - `DbError::ConnectionNotInitialized` (converted into `E`) when bootstrap
///   has not succeeded.
pub fn with_shared_connection<T, E>(
    f: impl FnOnce(&mut Connection) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<DbError>,
{
    shared()?.with_connection(f)
}

/// Opens the configured database and installs it as the shared handle.
///
/// Returns whether the handle is ready. Failures are logged, never raised,
/// so process startup continues.
pub fn bootstrap_shared(config: &AppConfig) -> bool {
    if SHARED_DB.get().is_some() {
        return true;
    }

    let started_at = Instant::now();
    let result = SHARED_DB.get_or_try_init(|| {
        open_configured(config).map(|conn| SharedDb {
            conn: Mutex::new(conn),
        })
    });

    match result {
        Ok(_) => {
            info!(
                "event=db_bootstrap module=db status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            true
        }
        Err(err) => {
            error!(
                "event=db_bootstrap module=db status=error duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            false
        }
    }
}

fn open_configured(config: &AppConfig) -> DbResult<Connection> {
    match config.database_target() {
        DatabaseTarget::Memory => open_db_in_memory(),
        DatabaseTarget::File(path) => match config.bootstrap_base_url.as_deref() {
            Some(base_url) => {
                let initializer = HttpSchemaInitializer::new(base_url);
                open_db_with_initializer(path, &initializer)
            }
            None => open_db(path),
        },
    }
}
