//! Best-effort access logging.
//!
//! # Responsibility
//! - Append one `access_logs` row per content access when enabled.
//! - Shield callers from every logging failure.
//!
//! # Invariants
//! - Disabled logger never touches the database.
//! - `log` never returns an error; failures become `None`.

use crate::config::AppConfig;
use crate::model::access_log::AccessLog;
use crate::model::content::ContentId;
use crate::repo::content_repo::RepoResult;
use log::{debug, warn};
use rusqlite::{params, Connection};

/// Feature-flagged access log writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessLogger {
    enabled: bool,
}

impl AccessLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Uses `ENABLE_ACCESS_LOG` from the loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.enable_access_log)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records one access and returns the new log id.
    ///
    /// Returns `None` when disabled or when the write fails for any reason
    /// (unknown content id included).
    pub fn log(
        &self,
        conn: &Connection,
        content_id: ContentId,
        access_type: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Option<i64> {
        if !self.enabled {
            return None;
        }

        match insert_access_log(conn, content_id, access_type, ip_address, user_agent) {
            Ok(id) => {
                debug!(
                    "event=access_log module=repo status=ok content_id={} access_type={} log_id={}",
                    content_id, access_type, id
                );
                Some(id)
            }
            Err(err) => {
                warn!(
                    "event=access_log module=repo status=error content_id={} access_type={} error={}",
                    content_id, access_type, err
                );
                None
            }
        }
    }
}

/// Counts log rows recorded for one content id.
pub fn count_for_content(conn: &Connection, content_id: ContentId) -> RepoResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM access_logs WHERE content_id = ?1;",
        [content_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Lists log rows for one content id, newest first.
pub fn list_for_content(conn: &Connection, content_id: ContentId) -> RepoResult<Vec<AccessLog>> {
    let mut stmt = conn.prepare(
        "SELECT
            id,
            content_id,
            access_type,
            ip_address,
            user_agent,
            created_at
         FROM access_logs
         WHERE content_id = ?1
         ORDER BY created_at DESC, id DESC;",
    )?;
    let mut rows = stmt.query([content_id])?;
    let mut logs = Vec::new();
    while let Some(row) = rows.next()? {
        logs.push(AccessLog {
            id: row.get("id")?,
            content_id: row.get("content_id")?,
            access_type: row.get("access_type")?,
            ip_address: row.get("ip_address")?,
            user_agent: row.get("user_agent")?,
            created_at: row.get("created_at")?,
        });
    }
    Ok(logs)
}

fn insert_access_log(
    conn: &Connection,
    content_id: ContentId,
    access_type: &str,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO access_logs (content_id, access_type, ip_address, user_agent)
         VALUES (?1, ?2, ?3, ?4);",
        params![content_id, access_type, ip_address, user_agent],
    )?;
    Ok(conn.last_insert_rowid())
}
