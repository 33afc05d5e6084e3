//! Site settings model.
//!
//! # Invariants
//! - Only the row with the lowest id is treated as canonical.

use serde::{Deserialize, Serialize};

/// Row id targeted by updates when no settings row exists yet.
pub const FALLBACK_SETTINGS_ID: i64 = 1;

pub const DEFAULT_SITE_NAME: &str = "Content Share";
pub const DEFAULT_PAGE_TITLE: &str = "Content Share";
pub const DEFAULT_META_DESCRIPTION: &str =
    "Share character cards, knowledge bases, event books, prompt injections and story books.";

/// Site-wide display options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub id: i64,
    pub site_name: String,
    pub show_download_link: bool,
    pub page_title: String,
    pub meta_description: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial update for site settings; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_download_link: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

impl SiteSettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.site_name.is_none()
            && self.show_download_link.is_none()
            && self.page_title.is_none()
            && self.meta_description.is_none()
    }
}
