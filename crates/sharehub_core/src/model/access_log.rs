//! Access log record.

use super::content::ContentId;
use serde::{Deserialize, Serialize};

/// Append-only audit record of one content access event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLog {
    pub id: i64,
    pub content_id: ContentId,
    /// Free-form label such as `view` or `download`.
    pub access_type: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: i64,
}
