//! Post Retriever: ids in, hydrated and plugin-filtered posts out.

use std::sync::Arc;

use domains::keys::GET_POSTS_HOOK;
use domains::{
    ContentParser, HookDispatcher, Post, PostId, PostRepository, PostsHookPayload, Result, UserId,
};
use futures_util::future::try_join_all;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct PostRetriever {
    posts: Arc<dyn PostRepository>,
    parser: Arc<dyn ContentParser>,
    hooks: Arc<dyn HookDispatcher>,
}

impl PostRetriever {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        parser: Arc<dyn ContentParser>,
        hooks: Arc<dyn HookDispatcher>,
    ) -> Self {
        Self {
            posts,
            parser,
            hooks,
        }
    }

    /// Loads, parses and filters `pids` for `viewer`.
    ///
    /// Input order is kept through loading and parsing; after that the hook
    /// dispatcher may drop, reorder or rewrite entries. Posts that are
    /// missing from storage or nulled out by a plugin are left out.
    #[instrument(skip_all, fields(count = pids.len(), viewer = %viewer))]
    pub async fn get_posts_by_pids(&self, pids: &[PostId], viewer: UserId) -> Result<Vec<Post>> {
        if pids.is_empty() {
            debug!("no post ids requested");
            return Ok(Vec::new());
        }

        let records = self.posts.load_raw(pids).await?;
        let parsed = try_join_all(records.into_iter().map(|record| self.parse_record(record))).await?;

        let payload = PostsHookPayload {
            posts: parsed,
            viewer,
        };
        let Some(filtered) = self.hooks.filter_posts(GET_POSTS_HOOK, payload).await? else {
            warn!(hook = GET_POSTS_HOOK, "hook produced no usable result, returning no posts");
            return Ok(Vec::new());
        };

        Ok(filtered.posts.into_iter().flatten().collect())
    }

    async fn parse_record(&self, record: Option<Post>) -> Result<Option<Post>> {
        match record {
            Some(post) => self.parser.parse(post).await.map(Some),
            None => Ok(None),
        }
    }
}
