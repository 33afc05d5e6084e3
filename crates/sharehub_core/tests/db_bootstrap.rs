use sharehub_core::db::{
    ensure_schema, open_db, open_db_in_memory, open_db_with_initializer, DbError,
    SchemaInitializer, SchemaOutcome,
};
use rusqlite::{Connection, OpenFlags};
use std::cell::Cell;
use std::path::PathBuf;

struct FailingInitializer {
    calls: Cell<u32>,
}

impl SchemaInitializer for FailingInitializer {
    fn initialize(&self) -> Result<(), String> {
        self.calls.set(self.calls.get() + 1);
        Err("connection refused".to_string())
    }
}

struct NoopInitializer;

impl SchemaInitializer for NoopInitializer {
    fn initialize(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Stands in for the remote service by creating the schema through a
/// separate connection to the same file.
struct SameFileInitializer {
    path: PathBuf,
}

impl SchemaInitializer for SameFileInitializer {
    fn initialize(&self) -> Result<(), String> {
        open_db(&self.path).map(drop).map_err(|err| err.to_string())
    }
}

#[test]
fn open_db_in_memory_creates_tables_indexes_and_seed() {
    let conn = open_db_in_memory().unwrap();

    for table in ["content_types", "contents", "access_logs", "site_settings"] {
        assert_table_exists(&conn, table);
    }
    for index in [
        "idx_contents_content_type",
        "idx_contents_created_at",
        "idx_contents_updated_at",
        "idx_access_logs_content_id",
        "idx_access_logs_created_at",
    ] {
        assert_index_exists(&conn, index);
    }

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM content_types;"), 6);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM site_settings;"), 1);
}

#[test]
fn reopening_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("share.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(count(&conn_first, "SELECT COUNT(*) FROM site_settings;"), 1);
    drop(conn_first);

    let mut conn_second = open_db(&path).unwrap();
    assert_eq!(count(&conn_second, "SELECT COUNT(*) FROM site_settings;"), 1);
    assert_eq!(
        ensure_schema(&mut conn_second, None).unwrap(),
        SchemaOutcome::AlreadyPresent
    );
}

#[test]
fn existing_schema_skips_remote_initializer() {
    let mut conn = open_db_in_memory().unwrap();
    let initializer = FailingInitializer {
        calls: Cell::new(0),
    };

    let outcome = ensure_schema(&mut conn, Some(&initializer)).unwrap();
    assert_eq!(outcome, SchemaOutcome::AlreadyPresent);
    assert_eq!(initializer.calls.get(), 0);
}

#[test]
fn failing_remote_initializer_falls_back_to_local_ddl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fallback.sqlite3");
    let initializer = FailingInitializer {
        calls: Cell::new(0),
    };

    let conn = open_db_with_initializer(&path, &initializer).unwrap();
    assert_eq!(initializer.calls.get(), 1);
    assert_table_exists(&conn, "contents");
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM site_settings;"), 1);
}

#[test]
fn remote_success_without_schema_still_falls_back() {
    let mut conn = Connection::open_in_memory().unwrap();
    let outcome = ensure_schema(&mut conn, Some(&NoopInitializer)).unwrap();
    assert_eq!(outcome, SchemaOutcome::Local);
    assert_table_exists(&conn, "contents");
}

#[test]
fn remote_initializer_that_creates_schema_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("remote.sqlite3");
    let mut conn = Connection::open(&path).unwrap();
    let initializer = SameFileInitializer { path: path.clone() };

    let outcome = ensure_schema(&mut conn, Some(&initializer)).unwrap();
    assert_eq!(outcome, SchemaOutcome::Remote);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM site_settings;"), 1);
}

#[test]
fn exhausting_remote_and_local_paths_returns_bootstrap_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readonly.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE unrelated (x INTEGER);")
            .unwrap();
    }

    let mut conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY).unwrap();
    let initializer = FailingInitializer {
        calls: Cell::new(0),
    };

    let err = ensure_schema(&mut conn, Some(&initializer)).unwrap_err();
    match err {
        DbError::Bootstrap { remote, .. } => {
            assert_eq!(remote.as_deref(), Some("connection refused"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(initializer.calls.get(), 1);
}

#[test]
fn content_type_enumeration_rejects_unknown_values() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO contents (uuid, name, content_type, blob_url)
         VALUES ('abcdefghijklmnopqrstu', 'Lore', 'lorebook', 'https://x/l.json');",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn content_type_check_holds_without_foreign_keys() {
    let mut conn = Connection::open_in_memory().unwrap();
    ensure_schema(&mut conn, None).unwrap();
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();

    let rejected = conn.execute(
        "INSERT INTO contents (uuid, name, content_type, blob_url)
         VALUES ('abcdefghijklmnopqrstu', 'Lore', 'lorebook', 'https://x/l.json');",
        [],
    );
    assert!(rejected.is_err());

    conn.execute(
        "INSERT INTO contents (uuid, name, content_type, blob_url)
         VALUES ('bbcdefghijklmnopqrstu', 'Book', 'story_book', 'https://x/b.json');",
        [],
    )
    .unwrap();
    let (created_at, updated_at): (i64, i64) = conn
        .query_row(
            "SELECT created_at, updated_at FROM contents WHERE name = 'Book';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(created_at > 1_600_000_000_000);
    assert_eq!(created_at, updated_at);
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'index' AND name = ?1
            );",
            [index_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "index {index_name} does not exist");
}
