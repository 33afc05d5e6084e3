//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Log failures, then propagate them unchanged.

pub mod content_service;
pub mod settings_service;
