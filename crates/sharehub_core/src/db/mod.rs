//! SQLite storage bootstrap and process-wide handle.
//!
//! # Responsibility
//! - Open and configure SQLite connections for sharehub core.
//! - Ensure the schema exists exactly once per database (remote first, local DDL fallback).
//! - Own the shared handle that data operations run against.
//!
//! # Invariants
//! - Connections returned by `open_*` have `foreign_keys=ON` and a ready schema.
//! - Data operations through the shared handle fail with
//!   `ConnectionNotInitialized` until bootstrap has succeeded.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod remote;
pub mod schema;
pub mod shared;

pub use open::{open_db, open_db_in_memory, open_db_with_initializer};
pub use remote::{HttpSchemaInitializer, SchemaInitializer};
pub use schema::{ensure_schema, SchemaOutcome};
pub use shared::{bootstrap_shared, shared, with_shared_connection, SharedDb};

/// SQL expression for "now" in Unix epoch milliseconds.
pub(crate) const NOW_MS_SQL: &str =
    "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The shared handle was never established (or bootstrap failed).
    ConnectionNotInitialized,
    /// Remote initialization and local DDL both failed.
    Bootstrap {
        remote: Option<String>,
        local: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::ConnectionNotInitialized => write!(f, "database connection not initialized"),
            Self::Bootstrap { remote, local } => match remote {
                Some(remote) => write!(
                    f,
                    "schema bootstrap failed: remote init: {remote}; local ddl: {local}"
                ),
                None => write!(f, "schema bootstrap failed: local ddl: {local}"),
            },
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::ConnectionNotInitialized => None,
            Self::Bootstrap { local, .. } => Some(local),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
