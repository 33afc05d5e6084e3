//! Site settings use-case service.

use crate::model::site_settings::{SiteSettings, SiteSettingsPatch};
use crate::repo::content_repo::RepoResult;
use crate::repo::settings_repo::SettingsRepository;
use crate::service::content_service::logged;

pub struct SettingsService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the canonical settings row, if seeded.
    pub fn get(&self) -> RepoResult<Option<SiteSettings>> {
        logged("settings_get", self.repo.get_settings())
    }

    /// Patches the canonical settings row; empty patches do not write.
    pub fn update(&self, patch: &SiteSettingsPatch) -> RepoResult<Option<SiteSettings>> {
        logged("settings_update", self.repo.update_settings(patch))
    }
}
