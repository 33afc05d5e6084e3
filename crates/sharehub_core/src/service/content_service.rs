//! Content use-case service.
//!
//! # Responsibility
//! - Expose the content operation surface to callers (HTTP layer, CLI).
//! - Log persistence failures before handing them back unchanged.
//!
//! # Invariants
//! - Absence (`None`) is never logged as a failure.
//! - Service APIs never bypass repository persistence contracts.

use crate::model::content::{Content, ContentId, ContentPatch, ContentType, NewContent};
use crate::repo::content_repo::{ContentRepository, RepoResult};
use log::error;

/// Use-case service wrapper for content operations.
pub struct ContentService<R: ContentRepository> {
    repo: R,
}

impl<R: ContentRepository> ContentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists content, optionally restricted to one kind.
    pub fn list(&self, kind: Option<ContentType>) -> RepoResult<Vec<Content>> {
        logged("content_list", self.repo.list_contents(kind))
    }

    pub fn get(&self, id: ContentId) -> RepoResult<Option<Content>> {
        logged("content_get", self.repo.get_content(id))
    }

    pub fn create(&self, input: &NewContent) -> RepoResult<Content> {
        logged("content_create", self.repo.create_content(input))
    }

    /// Applies `patch` and returns the canonical row afterwards.
    ///
    /// An empty patch returns the current row without writing.
    pub fn update(&self, id: ContentId, patch: &ContentPatch) -> RepoResult<Option<Content>> {
        logged("content_update", self.repo.update_content(id, patch))
    }

    /// Deletes content together with its access logs.
    pub fn delete(&mut self, id: ContentId) -> RepoResult<Option<Content>> {
        logged("content_delete", self.repo.delete_content(id))
    }

    pub fn get_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Content>> {
        logged("content_get_by_ids", self.repo.get_contents_by_ids(ids))
    }

    pub fn set_tags(&self, id: ContentId, tags: &[String]) -> RepoResult<Option<Content>> {
        logged("content_set_tags", self.repo.set_tags(id, tags))
    }

    pub fn set_sort_order(&self, id: ContentId, order: Option<i64>) -> RepoResult<Option<Content>> {
        logged("content_set_sort_order", self.repo.set_sort_order(id, order))
    }

    pub fn reorder(&mut self, ids: &[ContentId]) -> RepoResult<usize> {
        logged("content_reorder", self.repo.reorder(ids))
    }
}

pub(crate) fn logged<T>(event: &'static str, result: RepoResult<T>) -> RepoResult<T> {
    if let Err(err) = &result {
        error!("event={event} module=service status=error error={err}");
    }
    result
}
