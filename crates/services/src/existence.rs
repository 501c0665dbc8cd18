//! Existence Checker: is there a stored record behind a post id?

use std::sync::Arc;

use domains::{OrderedStore, PostId, Result};

use domains::keys::post_key;

/// Read-only membership test against the `post:{pid}` keys.
#[derive(Clone)]
pub struct ExistenceChecker {
    store: Arc<dyn OrderedStore>,
}

impl ExistenceChecker {
    pub fn new(store: Arc<dyn OrderedStore>) -> Self {
        Self { store }
    }

    pub async fn exists(&self, pid: PostId) -> Result<bool> {
        self.store.exists(&post_key(pid)).await
    }

    /// One answer per id, in input order. An empty slice is passed through
    /// to the backend as is.
    pub async fn exists_many(&self, pids: &[PostId]) -> Result<Vec<bool>> {
        let keys: Vec<String> = pids.iter().copied().map(post_key).collect();
        self.store.exists_many(&keys).await
    }
}
