//! Domain model for shareable content, access logs and site settings.
//!
//! # Responsibility
//! - Define canonical data structures used by repositories and services.
//! - Define patch shapes that distinguish "field absent" from "field cleared".
//!
//! # Invariants
//! - Every content record has a surrogate `id` and an immutable short `uuid`.
//! - Timestamps are Unix epoch milliseconds.

pub mod access_log;
pub mod content;
pub mod site_settings;

use serde::{Deserialize, Deserializer};

/// Deserializes a nullable patch field.
///
/// Used with `#[serde(default)]`: a missing key stays `None`, an explicit
/// `null` becomes `Some(None)`, and a value becomes `Some(Some(value))`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
