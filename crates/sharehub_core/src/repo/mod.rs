//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - By-id lookups return `Option`; a missing row is not an error.
//! - Only the access logger swallows failures.

pub mod access_logger;
pub mod content_repo;
pub mod settings_repo;
pub mod tag_sort;
