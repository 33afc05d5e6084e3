//! Site settings repository.
//!
//! # Responsibility
//! - Read the canonical settings row (lowest id).
//! - Patch it with one fixed statement shape.
//!
//! # Invariants
//! - Empty patches never write.
//! - Every non-empty patch refreshes `updated_at`.
//! - With no settings row, updates target `FALLBACK_SETTINGS_ID`.

use crate::db::schema::table_exists;
use crate::db::NOW_MS_SQL;
use crate::model::site_settings::{SiteSettings, SiteSettingsPatch, FALLBACK_SETTINGS_ID};
use crate::repo::content_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Params, Row};

const SETTINGS_COLUMNS: &str = "id,
    site_name,
    show_download_link,
    page_title,
    meta_description,
    created_at,
    updated_at";

/// Repository interface for the singleton settings row.
pub trait SettingsRepository {
    fn get_settings(&self) -> RepoResult<Option<SiteSettings>>;
    fn update_settings(&self, patch: &SiteSettingsPatch) -> RepoResult<Option<SiteSettings>>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, "site_settings")? {
            return Err(RepoError::MissingRequiredTable("site_settings"));
        }
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn get_settings(&self) -> RepoResult<Option<SiteSettings>> {
        query_optional_settings(
            self.conn,
            &format!("SELECT {SETTINGS_COLUMNS} FROM site_settings ORDER BY id ASC LIMIT 1;"),
            [],
        )
    }

    fn update_settings(&self, patch: &SiteSettingsPatch) -> RepoResult<Option<SiteSettings>> {
        if patch.is_empty() {
            return self.get_settings();
        }

        let target_id = self
            .get_settings()?
            .map_or(FALLBACK_SETTINGS_ID, |settings| settings.id);

        query_optional_settings(
            self.conn,
            &format!(
                "UPDATE site_settings
                 SET
                    site_name = COALESCE(?1, site_name),
                    show_download_link = COALESCE(?2, show_download_link),
                    page_title = COALESCE(?3, page_title),
                    meta_description = COALESCE(?4, meta_description),
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?5
                 RETURNING {SETTINGS_COLUMNS};"
            ),
            params![
                patch.site_name.as_deref(),
                patch.show_download_link,
                patch.page_title.as_deref(),
                patch.meta_description.as_deref(),
                target_id,
            ],
        )
    }
}

fn query_optional_settings<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> RepoResult<Option<SiteSettings>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_settings_row(row)?)),
        None => Ok(None),
    }
}

fn parse_settings_row(row: &Row<'_>) -> RepoResult<SiteSettings> {
    let show_download_link = match row.get::<_, i64>("show_download_link")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid show_download_link value `{other}` in site_settings.show_download_link"
            )));
        }
    };

    Ok(SiteSettings {
        id: row.get("id")?,
        site_name: row.get("site_name")?,
        show_download_link,
        page_title: row.get("page_title")?,
        meta_description: row.get("meta_description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
