//! Rank Resolvers: a post's 1-based position inside its topic ordering.
//!
//! The backend reports 0-based ranks or nothing at all. Callers always get
//! `rank + 1`, with `0` reserved for "not ranked".

use std::collections::HashSet;
use std::sync::Arc;

use domains::keys::container_for;
use domains::{
    Direction, OrderedStore, PostId, PostRef, Result, SettingsProvider, SortMode, TopicId, UserId,
};
use tracing::{debug, instrument};

/// Maps a backend rank to the 1-based value exposed to callers.
pub fn rank_from_raw(raw: Option<u64>) -> u64 {
    raw.map_or(0, |rank| rank + 1)
}

/// How a batch of ranks is fetched from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankQuery {
    /// Every post lives in the same container: one keyed batch lookup.
    Shared { container: String },
    /// Posts span containers: parallel arrays, one container per post.
    PerPost { containers: Vec<String> },
}

impl RankQuery {
    /// Picks the cheapest query able to rank posts held in `containers`
    /// (one entry per post).
    pub fn plan(mut containers: Vec<String>) -> Self {
        let distinct = containers.iter().collect::<HashSet<_>>().len();
        if distinct == 1 {
            return Self::Shared {
                container: containers.swap_remove(0),
            };
        }
        Self::PerPost { containers }
    }
}

#[derive(Clone)]
pub struct RankResolver {
    store: Arc<dyn OrderedStore>,
    settings: Arc<dyn SettingsProvider>,
}

impl RankResolver {
    pub fn new(store: Arc<dyn OrderedStore>, settings: Arc<dyn SettingsProvider>) -> Self {
        Self { store, settings }
    }

    /// Position of `pid` in topic `tid` under the sort mode named by `mode`.
    /// Unrecognised modes rank oldest first.
    pub async fn get_pid_index(&self, pid: PostId, tid: TopicId, mode: &str) -> Result<u64> {
        let mode = SortMode::from_setting(mode);
        let container = container_for(tid, mode);
        let raw = self.store.rank(&container, pid, mode.direction()).await?;
        Ok(rank_from_raw(raw))
    }

    /// Positions of `posts` under the viewer's preferred sort mode, in input
    /// order. Each post is ranked within its own topic.
    #[instrument(skip_all, fields(count = posts.len(), viewer = %viewer))]
    pub async fn get_post_indices(&self, posts: &[PostRef], viewer: UserId) -> Result<Vec<u64>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mode = self.settings.sort_mode(viewer).await?;
        let containers = posts
            .iter()
            .map(|post| container_for(post.tid, mode))
            .collect();
        let pids: Vec<PostId> = posts.iter().map(|post| post.pid).collect();

        self.ranks_for(RankQuery::plan(containers), &pids, mode.direction())
            .await
    }

    /// Runs an already planned batch query. Both variants yield the same
    /// ranks for the same data; `Shared` is only cheaper.
    pub async fn ranks_for(
        &self,
        query: RankQuery,
        pids: &[PostId],
        direction: Direction,
    ) -> Result<Vec<u64>> {
        let raw = match query {
            RankQuery::Shared { container } => {
                debug!(%container, "ranking batch against a single container");
                self.store.ranks(&container, pids, direction).await?
            }
            RankQuery::PerPost { containers } => {
                debug!(containers = containers.len(), "ranking batch across containers");
                self.store.ranks_across(&containers, pids, direction).await?
            }
        };
        Ok(raw.into_iter().map(rank_from_raw).collect())
    }
}
