//! JSON seed files for the in-memory backend.
//!
//! ```json
//! {
//!   "posts": [{ "pid": 1, "tid": 3, "uid": 7, "content": "hi",
//!               "timestamp": "2024-01-01T00:00:00Z", "votes": 2,
//!               "user": { "uid": 7, "username": "alice" } }],
//!   "sort_modes": [{ "uid": 7, "mode": "most_votes" }],
//!   "grants": [{ "uid": 1, "capabilities": ["topics:read", "posts:view_deleted"] }],
//!   "hidden": [4]
//! }
//! ```

use std::path::Path;

use domains::{Capability, Post, PostId, SortMode, UserId};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::memory::MemoryBackend;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SortOverride {
    pub uid: UserId,
    pub mode: SortMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Grant {
    pub uid: UserId,
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub posts: Vec<Post>,
    pub sort_modes: Vec<SortOverride>,
    pub grants: Vec<Grant>,
    pub hidden: Vec<PostId>,
}

impl SeedFile {
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub async fn load(path: &Path) -> Result<Self, SeedError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    /// Loads everything into `backend`. Returns the number of posts added.
    pub fn apply(self, backend: &MemoryBackend) -> usize {
        let count = self.posts.len();
        for post in self.posts {
            backend.add_post(post);
        }
        for SortOverride { uid, mode } in self.sort_modes {
            backend.settings.set_sort_mode(uid, mode);
        }
        for Grant { uid, capabilities } in self.grants {
            backend
                .privileges
                .grant(uid, capabilities.into_iter().collect());
        }
        for pid in self.hidden {
            backend.privileges.hide(pid);
        }
        info!(posts = count, "seeded in-memory backend");
        count
    }
}
