//! First-run schema creation.
//!
//! # Responsibility
//! - Detect whether the schema already exists (catalog lookup on `contents`).
//! - Ask the remote initializer first, then fall back to local DDL.
//! - Seed the canonical site settings row.
//!
//! # Invariants
//! - Every DDL statement is `IF NOT EXISTS`; running it twice is a no-op.
//! - Local DDL runs in one transaction.
//! - At most one settings row is seeded, and only into an empty table.

use crate::db::remote::SchemaInitializer;
use crate::db::{DbError, DbResult, NOW_MS_SQL};
use crate::model::site_settings::{
    DEFAULT_META_DESCRIPTION, DEFAULT_PAGE_TITLE, DEFAULT_SITE_NAME,
};
use log::{info, warn};
use rusqlite::{params, Connection};

const SCHEMA_TEMPLATE: &str = "
CREATE TABLE IF NOT EXISTS content_types (
    name TEXT PRIMARY KEY NOT NULL
);

INSERT OR IGNORE INTO content_types (name) VALUES
    ('character_card'),
    ('knowledge_base'),
    ('event_book'),
    ('prompt_injection'),
    ('story_book'),
    ('other');

CREATE TABLE IF NOT EXISTS contents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL CHECK (length(name) > 0),
    description TEXT NOT NULL DEFAULT '',
    content_type TEXT NOT NULL REFERENCES content_types(name)
        CHECK (content_type IN (
            'character_card',
            'knowledge_base',
            'event_book',
            'prompt_injection',
            'story_book',
            'other'
        )),
    blob_url TEXT NOT NULL CHECK (length(blob_url) > 0),
    thumbnail_url TEXT,
    metadata TEXT CHECK (metadata IS NULL OR json_valid(metadata)),
    tags TEXT NOT NULL DEFAULT '[]'
        CHECK (json_valid(tags) AND json_type(tags) = 'array'),
    sort_order INTEGER,
    created_at INTEGER NOT NULL
        DEFAULT ({now_ms}),
    updated_at INTEGER NOT NULL
        DEFAULT ({now_ms})
);

CREATE TABLE IF NOT EXISTS access_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content_id INTEGER NOT NULL REFERENCES contents(id),
    access_type TEXT NOT NULL,
    ip_address TEXT,
    user_agent TEXT,
    created_at INTEGER NOT NULL
        DEFAULT ({now_ms})
);

CREATE TABLE IF NOT EXISTS site_settings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_name TEXT NOT NULL,
    show_download_link INTEGER NOT NULL DEFAULT 1
        CHECK (show_download_link IN (0, 1)),
    page_title TEXT NOT NULL,
    meta_description TEXT NOT NULL,
    created_at INTEGER NOT NULL
        DEFAULT ({now_ms}),
    updated_at INTEGER NOT NULL
        DEFAULT ({now_ms})
);
";

fn schema_sql() -> String {
    SCHEMA_TEMPLATE.replace("{now_ms}", NOW_MS_SQL)
}

const SEED_SETTINGS_SQL: &str = "
INSERT INTO site_settings (site_name, show_download_link, page_title, meta_description)
SELECT ?1, 1, ?2, ?3
WHERE NOT EXISTS (SELECT 1 FROM site_settings);
";

const INDEX_SQL: &str = "
CREATE INDEX IF NOT EXISTS idx_contents_content_type ON contents(content_type);
CREATE INDEX IF NOT EXISTS idx_contents_created_at ON contents(created_at);
CREATE INDEX IF NOT EXISTS idx_contents_updated_at ON contents(updated_at);
CREATE INDEX IF NOT EXISTS idx_access_logs_content_id ON access_logs(content_id);
CREATE INDEX IF NOT EXISTS idx_access_logs_created_at ON access_logs(created_at);
";

/// How `ensure_schema` satisfied its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// `contents` already existed; nothing was executed.
    AlreadyPresent,
    /// The remote initializer created the schema.
    Remote,
    /// Local DDL created the schema.
    Local,
}

/// Makes sure the schema exists on `conn`.
///
/// # Errors
/// - Returns `DbError::Bootstrap` when local DDL fails; the message carries
///   the remote failure too when a remote attempt was made.
/// - Returns `DbError::Sqlite` when the catalog lookup itself fails.
pub fn ensure_schema(
    conn: &mut Connection,
    initializer: Option<&dyn SchemaInitializer>,
) -> DbResult<SchemaOutcome> {
    if table_exists(conn, "contents")? {
        return Ok(SchemaOutcome::AlreadyPresent);
    }

    let mut remote_failure = None;
    if let Some(initializer) = initializer {
        match initializer.initialize() {
            Ok(()) if table_exists(conn, "contents")? => {
                info!("event=schema_bootstrap module=db status=ok path=remote");
                return Ok(SchemaOutcome::Remote);
            }
            Ok(()) => {
                warn!(
                    "event=schema_bootstrap module=db status=fallback path=remote error_code=remote_init_incomplete"
                );
                remote_failure = Some("remote init reported success but schema is missing".to_string());
            }
            Err(err) => {
                warn!(
                    "event=schema_bootstrap module=db status=fallback path=remote error_code=remote_init_failed error={}",
                    err
                );
                remote_failure = Some(err);
            }
        }
    }

    match create_schema_locally(conn) {
        Ok(()) => {
            info!("event=schema_bootstrap module=db status=ok path=local");
            Ok(SchemaOutcome::Local)
        }
        Err(local) => Err(DbError::Bootstrap {
            remote: remote_failure,
            local,
        }),
    }
}

fn create_schema_locally(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(&schema_sql())?;
    tx.execute(
        SEED_SETTINGS_SQL,
        params![DEFAULT_SITE_NAME, DEFAULT_PAGE_TITLE, DEFAULT_META_DESCRIPTION],
    )?;
    tx.execute_batch(INDEX_SQL)?;
    tx.commit()
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
