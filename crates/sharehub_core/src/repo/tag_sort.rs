//! Tag list and manual ordering mutations.
//!
//! # Invariants
//! - `set_tags` replaces the whole sequence in one statement; order and
//!   duplicates are kept as given.
//! - `sort_order = NULL` returns a row to timestamp ordering.
//! - `reorder` assigns positions inside one transaction.

use crate::db::NOW_MS_SQL;
use crate::model::content::{Content, ContentId};
use crate::repo::content_repo::{query_optional_content, RepoError, RepoResult, CONTENT_COLUMNS};
use log::debug;
use rusqlite::{params, Connection};

/// Replaces the tag sequence of one content row.
///
/// Returns `None` when `id` does not exist.
pub fn set_tags(conn: &Connection, id: ContentId, tags: &[String]) -> RepoResult<Option<Content>> {
    let encoded = encode_tags(tags)?;
    query_optional_content(
        conn,
        &format!(
            "UPDATE contents
             SET tags = ?1, updated_at = {NOW_MS_SQL}
             WHERE id = ?2
             RETURNING {CONTENT_COLUMNS};"
        ),
        params![encoded, id],
    )
}

/// Sets or clears the manual position of one content row.
pub fn set_sort_order(
    conn: &Connection,
    id: ContentId,
    order: Option<i64>,
) -> RepoResult<Option<Content>> {
    query_optional_content(
        conn,
        &format!(
            "UPDATE contents
             SET sort_order = ?1, updated_at = {NOW_MS_SQL}
             WHERE id = ?2
             RETURNING {CONTENT_COLUMNS};"
        ),
        params![order, id],
    )
}

/// Applies a drag-reorder: the id at index `n` gets `sort_order = n`.
///
/// Unknown ids are skipped. Returns the number of rows updated.
pub fn reorder(conn: &mut Connection, ids: &[ContentId]) -> RepoResult<usize> {
    let tx = conn.transaction()?;
    let mut updated = 0;
    {
        let mut stmt = tx.prepare(&format!(
            "UPDATE contents
             SET sort_order = ?1, updated_at = {NOW_MS_SQL}
             WHERE id = ?2;"
        ))?;
        for (position, id) in ids.iter().enumerate() {
            updated += stmt.execute(params![position as i64, id])?;
        }
    }
    tx.commit()?;

    debug!(
        "event=content_reorder module=repo status=ok requested={} updated={}",
        ids.len(),
        updated
    );
    Ok(updated)
}

pub(crate) fn encode_tags(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode tags: {err}")))
}

pub(crate) fn decode_tags(text: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(text)
        .map_err(|err| RepoError::InvalidData(format!("invalid json in contents.tags: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{decode_tags, encode_tags};

    #[test]
    fn tags_keep_order_and_duplicates() {
        let tags = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        let encoded = encode_tags(&tags).unwrap();
        assert_eq!(encoded, r#"["b","a","b"]"#);
        assert_eq!(decode_tags(&encoded).unwrap(), tags);
    }

    #[test]
    fn decode_rejects_non_array_payload() {
        assert!(decode_tags("{\"tag\":1}").is_err());
    }
}
