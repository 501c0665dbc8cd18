//! `HookDispatcher` backed by an in-process registry of filter functions.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{HookDispatcher, PostsHookPayload, Result};
use tracing::debug;

/// A plugin filter. Returning `None` aborts the chain.
pub type PostsFilter = dyn Fn(PostsHookPayload) -> Option<PostsHookPayload> + Send + Sync;

/// Filters registered per hook name, run in registration order.
#[derive(Default)]
pub struct HookRegistry {
    filters: DashMap<String, Vec<Arc<PostsFilter>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, hook: &str, filter: F)
    where
        F: Fn(PostsHookPayload) -> Option<PostsHookPayload> + Send + Sync + 'static,
    {
        self.filters
            .entry(hook.to_string())
            .or_default()
            .push(Arc::new(filter));
    }

    pub fn listeners(&self, hook: &str) -> usize {
        self.filters.get(hook).map(|f| f.len()).unwrap_or(0)
    }
}

#[async_trait]
impl HookDispatcher for HookRegistry {
    async fn filter_posts(
        &self,
        hook: &str,
        payload: PostsHookPayload,
    ) -> Result<Option<PostsHookPayload>> {
        let chain: Vec<Arc<PostsFilter>> = self
            .filters
            .get(hook)
            .map(|filters| filters.clone())
            .unwrap_or_default();
        debug!(hook, listeners = chain.len(), "firing filter hook");

        Ok(chain
            .iter()
            .try_fold(payload, |payload, filter| filter(payload)))
    }
}
