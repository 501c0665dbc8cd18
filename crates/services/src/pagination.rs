//! Pagination Resolver: turns a container slice into post ids.

use std::sync::Arc;

use domains::{Direction, OrderedStore, PostId, Result};
use tracing::debug;

#[derive(Clone)]
pub struct PaginationResolver {
    store: Arc<dyn OrderedStore>,
}

impl PaginationResolver {
    pub fn new(store: Arc<dyn OrderedStore>) -> Self {
        Self { store }
    }

    /// Returns the ids in `[start, stop]` of `set`.
    ///
    /// `None` stands for an offset that was not a valid number; such a
    /// request yields an empty page without touching the backend. Any other
    /// combination of offsets (including `start > stop`) is left to the
    /// backend to interpret.
    pub async fn get_pids_from_set(
        &self,
        set: &str,
        start: Option<i64>,
        stop: Option<i64>,
        direction: Direction,
    ) -> Result<Vec<PostId>> {
        let (Some(start), Some(stop)) = (start, stop) else {
            debug!(set, "non-numeric pagination offsets, returning empty page");
            return Ok(Vec::new());
        };
        self.store.range(set, start, stop, direction).await
    }
}
