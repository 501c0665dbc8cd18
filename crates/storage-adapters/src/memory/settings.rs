//! `SettingsProvider` with per-user overrides over a default sort mode.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{Result, SettingsProvider, SortMode, UserId};

#[derive(Debug, Default)]
pub struct StaticSettings {
    default_mode: SortMode,
    overrides: DashMap<UserId, SortMode>,
}

impl StaticSettings {
    pub fn new(default_mode: SortMode) -> Self {
        Self {
            default_mode,
            overrides: DashMap::new(),
        }
    }

    pub fn set_sort_mode(&self, viewer: UserId, mode: SortMode) {
        self.overrides.insert(viewer, mode);
    }
}

#[async_trait]
impl SettingsProvider for StaticSettings {
    async fn sort_mode(&self, viewer: UserId) -> Result<SortMode> {
        Ok(self
            .overrides
            .get(&viewer)
            .map(|mode| *mode)
            .unwrap_or(self.default_mode))
    }
}
