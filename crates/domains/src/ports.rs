//! # Core Traits (Ports)
//!
//! Contracts for every collaborator the indexing layer talks to. Adapters in
//! `storage-adapters` implement them; services receive them as `Arc<dyn _>`
//! so tests can substitute mocks.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{
    Capability, Direction, Post, PostId, PostSummary, PostsHookPayload, Privileges, SortMode,
    SummaryOptions, TopicId, UserId,
};

/// Ordered key-value backend: key existence plus range and rank queries over
/// named sorted containers of post identifiers.
///
/// Ranks are 0-based; `None` means the member is not in the container.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait OrderedStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool>;

    /// One answer per key, in key order.
    async fn exists_many(&self, keys: &[String]) -> Result<Vec<bool>>;

    /// Inclusive slice of a container. Negative offsets count from the end.
    async fn range(
        &self,
        container: &str,
        start: i64,
        stop: i64,
        direction: Direction,
    ) -> Result<Vec<PostId>>;

    async fn rank(&self, container: &str, pid: PostId, direction: Direction)
        -> Result<Option<u64>>;

    /// Ranks of many members within one container.
    async fn ranks(
        &self,
        container: &str,
        pids: &[PostId],
        direction: Direction,
    ) -> Result<Vec<Option<u64>>>;

    /// Ranks of many members, each within its own container. `containers`
    /// and `pids` are parallel arrays of equal length.
    async fn ranks_across(
        &self,
        containers: &[String],
        pids: &[PostId],
        direction: Direction,
    ) -> Result<Vec<Option<u64>>>;
}

/// Decides what a viewer may see.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PrivilegeService: Send + Sync {
    /// Returns the subset of `pids` the viewer holds `capability` for.
    async fn filter_readable(
        &self,
        capability: Capability,
        pids: Vec<PostId>,
        viewer: UserId,
    ) -> Result<Vec<PostId>>;

    /// Resolves the viewer's capability set inside a topic.
    async fn privileges_for(&self, viewer: UserId, tid: TopicId) -> Result<Privileges>;
}

/// Per-user preferences.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn sort_mode(&self, viewer: UserId) -> Result<SortMode>;
}

/// Plugin filter points.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait HookDispatcher: Send + Sync {
    /// Runs the named filter over a batch of posts. `None` means the
    /// extensions produced no usable result.
    async fn filter_posts(
        &self,
        hook: &str,
        payload: PostsHookPayload,
    ) -> Result<Option<PostsHookPayload>>;
}

/// Raw post storage.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Loads records in the order given. Missing posts come back as `None`.
    async fn load_raw(&self, pids: &[PostId]) -> Result<Vec<Option<Post>>>;

    async fn load_summaries(
        &self,
        pids: &[PostId],
        viewer: UserId,
        options: SummaryOptions,
    ) -> Result<Vec<PostSummary>>;
}

/// Turns a stored body into its rendered form.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ContentParser: Send + Sync {
    async fn parse(&self, post: Post) -> Result<Post>;
}
