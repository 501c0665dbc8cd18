//! In-process adapters backed by `dashmap`.

mod posts;
mod privileges;
mod settings;
mod sorted_set;
mod store;

pub use posts::InMemoryPostRepository;
pub use privileges::StaticPrivileges;
pub use settings::StaticSettings;
pub use sorted_set::SortedSet;
pub use store::InMemoryStore;

use std::sync::Arc;

use domains::{Post, Privileges, SortMode};

/// The in-memory adapters that share one dataset, bundled for wiring.
#[derive(Clone)]
pub struct MemoryBackend {
    pub store: Arc<InMemoryStore>,
    pub posts: Arc<InMemoryPostRepository>,
    pub settings: Arc<StaticSettings>,
    pub privileges: Arc<StaticPrivileges>,
}

impl MemoryBackend {
    pub fn new(default_sort: SortMode, default_grant: Privileges) -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            settings: Arc::new(StaticSettings::new(default_sort)),
            privileges: Arc::new(StaticPrivileges::new(default_grant)),
        }
    }

    /// Stores `post` and indexes it in every container.
    pub fn add_post(&self, post: Post) {
        self.store.index_post(&post);
        self.posts.insert(post);
    }
}
