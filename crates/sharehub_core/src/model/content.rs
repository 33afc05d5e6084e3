//! Content domain model.
//!
//! # Responsibility
//! - Define the shareable content record and its enumerated kinds.
//! - Generate the short external `uuid` token.
//! - Define creation input and partial-update patch shapes.
//!
//! # Invariants
//! - `uuid` is 21 characters from the URL-safe alphabet and never changes.
//! - `tags` keep caller order; duplicates are allowed.
//! - `sort_order = None` means the record falls back to timestamp ordering.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Surrogate database identifier for content rows.
pub type ContentId = i64;

/// Length of the generated external content token.
pub const CONTENT_UUID_LEN: usize = 21;

const CONTENT_UUID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Enumerated kinds of shareable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    CharacterCard,
    KnowledgeBase,
    EventBook,
    PromptInjection,
    StoryBook,
    Other,
}

impl ContentType {
    /// Every variant, in declaration order.
    pub const ALL: [ContentType; 6] = [
        ContentType::CharacterCard,
        ContentType::KnowledgeBase,
        ContentType::EventBook,
        ContentType::PromptInjection,
        ContentType::StoryBook,
        ContentType::Other,
    ];

    /// Storage/wire label of this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CharacterCard => "character_card",
            Self::KnowledgeBase => "knowledge_base",
            Self::EventBook => "event_book",
            Self::PromptInjection => "prompt_injection",
            Self::StoryBook => "story_book",
            Self::Other => "other",
        }
    }

    /// Parses a storage/wire label.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
    }
}

/// Canonical shareable content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    /// Short random external identifier, distinct from `id`.
    pub uuid: String,
    pub name: String,
    pub description: String,
    pub content_type: ContentType,
    /// Opaque reference into external blob storage.
    pub blob_url: String,
    pub thumbnail_url: Option<String>,
    pub metadata: Option<Value>,
    pub tags: Vec<String>,
    /// Manual drag-reorder position; `None` sorts last.
    pub sort_order: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Creation input for a content record.
///
/// Optional fields default to: empty description, no thumbnail, no
/// metadata, empty tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContent {
    pub name: String,
    pub content_type: ContentType,
    pub blob_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl NewContent {
    pub fn new(
        name: impl Into<String>,
        content_type: ContentType,
        blob_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type,
            blob_url: blob_url.into(),
            description: None,
            thumbnail_url: None,
            metadata: None,
            tags: None,
        }
    }
}

/// Partial update for a content record.
///
/// `None` leaves a field untouched. For nullable columns the inner option
/// distinguishes "set" (`Some(Some(v))`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<Option<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub sort_order: Option<Option<i64>>,
}

impl ContentPatch {
    /// Returns whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.content_type.is_none()
            && self.blob_url.is_none()
            && self.thumbnail_url.is_none()
            && self.metadata.is_none()
            && self.tags.is_none()
            && self.sort_order.is_none()
    }
}

/// Generates a fresh 21-character external content token.
pub fn generate_content_uuid() -> String {
    let mut rng = rand::thread_rng();
    (0..CONTENT_UUID_LEN)
        .map(|_| char::from(CONTENT_UUID_ALPHABET[rng.gen_range(0..CONTENT_UUID_ALPHABET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{generate_content_uuid, ContentPatch, ContentType, CONTENT_UUID_LEN};

    #[test]
    fn generated_uuid_is_url_safe_and_fixed_length() {
        let token = generate_content_uuid();
        assert_eq!(token.len(), CONTENT_UUID_LEN);
        assert!(token
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'));
        assert_ne!(token, generate_content_uuid());
    }

    #[test]
    fn content_type_labels_roundtrip() {
        for kind in ContentType::ALL {
            assert_eq!(ContentType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ContentType::parse("lorebook"), None);
    }

    #[test]
    fn patch_distinguishes_missing_and_explicit_null() {
        let patch: ContentPatch =
            serde_json::from_str(r#"{"thumbnail_url": null, "name": "renamed"}"#).unwrap();
        assert_eq!(patch.thumbnail_url, Some(None));
        assert_eq!(patch.metadata, None);
        assert_eq!(patch.name.as_deref(), Some("renamed"));
        assert!(!patch.is_empty());

        let empty: ContentPatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
