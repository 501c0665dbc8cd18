//! `OrderedStore` held entirely in process memory.

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use domains::keys::{post_key, topic_posts, topic_votes, user_posts};
use domains::{Direction, DomainError, OrderedStore, Post, PostId, Result};
use tracing::debug;

use super::sorted_set::SortedSet;

/// Plain keys plus named sorted sets. Guards are never held across an
/// `.await`, so the store can be shared freely between tasks.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    keys: DashSet<String>,
    sets: DashMap<String, SortedSet>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    pub fn sorted_set_add(&self, container: &str, member: PostId, score: f64) {
        self.sets
            .entry(container.to_string())
            .or_default()
            .upsert(member, score);
    }

    pub fn container_len(&self, container: &str) -> usize {
        self.sets.get(container).map(|set| set.len()).unwrap_or(0)
    }

    /// Registers `post` under every key and container the indexing layer
    /// reads: `post:{pid}`, the recency and vote containers of its topic and
    /// the author's post list.
    pub fn index_post(&self, post: &Post) {
        let created = post.timestamp.timestamp_millis() as f64;
        self.set_key(post_key(post.pid));
        self.sorted_set_add(&topic_posts(post.tid), post.pid, created);
        self.sorted_set_add(&topic_votes(post.tid), post.pid, post.votes as f64);
        self.sorted_set_add(&user_posts(post.uid), post.pid, created);
        debug!(pid = %post.pid, tid = %post.tid, "indexed post");
    }

    fn rank_in(&self, container: &str, pid: PostId, direction: Direction) -> Option<u64> {
        self.sets
            .get(container)
            .and_then(|set| set.rank(pid, direction))
    }
}

#[async_trait]
impl OrderedStore for InMemoryStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.keys.contains(key))
    }

    async fn exists_many(&self, keys: &[String]) -> Result<Vec<bool>> {
        Ok(keys.iter().map(|key| self.keys.contains(key)).collect())
    }

    async fn range(
        &self,
        container: &str,
        start: i64,
        stop: i64,
        direction: Direction,
    ) -> Result<Vec<PostId>> {
        Ok(self
            .sets
            .get(container)
            .map(|set| set.range(start, stop, direction))
            .unwrap_or_default())
    }

    async fn rank(
        &self,
        container: &str,
        pid: PostId,
        direction: Direction,
    ) -> Result<Option<u64>> {
        Ok(self.rank_in(container, pid, direction))
    }

    async fn ranks(
        &self,
        container: &str,
        pids: &[PostId],
        direction: Direction,
    ) -> Result<Vec<Option<u64>>> {
        Ok(pids
            .iter()
            .map(|pid| self.rank_in(container, *pid, direction))
            .collect())
    }

    async fn ranks_across(
        &self,
        containers: &[String],
        pids: &[PostId],
        direction: Direction,
    ) -> Result<Vec<Option<u64>>> {
        if containers.len() != pids.len() {
            return Err(DomainError::Validation(format!(
                "{} containers for {} members",
                containers.len(),
                pids.len()
            )));
        }
        Ok(containers
            .iter()
            .zip(pids)
            .map(|(container, pid)| self.rank_in(container, *pid, direction))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domains::{PostAuthor, TopicId, UserId};

    fn post(pid: u64, tid: u64, votes: i64) -> Post {
        Post {
            pid: PostId(pid),
            tid: TopicId(tid),
            uid: UserId(1),
            content: String::new(),
            timestamp: Utc.timestamp_opt(1_700_000_000 + pid as i64, 0).unwrap(),
            votes,
            deleted: false,
            self_post: false,
            user: PostAuthor {
                uid: UserId(1),
                username: "alice".into(),
                signature: String::new(),
            },
        }
    }

    #[tokio::test]
    async fn index_post_populates_every_container() {
        let store = InMemoryStore::new();
        store.index_post(&post(1, 3, 5));
        store.index_post(&post(2, 3, 9));

        assert!(store.exists("post:1").await.unwrap());
        assert_eq!(
            store.range("tid:3:posts", 0, -1, Direction::Forward).await.unwrap(),
            vec![PostId(1), PostId(2)]
        );
        assert_eq!(
            store
                .range("tid:3:posts:votes", 0, -1, Direction::Reverse)
                .await
                .unwrap(),
            vec![PostId(2), PostId(1)]
        );
        assert_eq!(store.container_len("uid:1:posts"), 2);
    }

    #[tokio::test]
    async fn keyed_and_parallel_ranks_agree() {
        let store = InMemoryStore::new();
        for pid in 1..=4 {
            store.index_post(&post(pid, 3, pid as i64));
        }
        let pids = vec![PostId(4), PostId(9), PostId(1)];
        let containers = vec!["tid:3:posts".to_string(); 3];

        for direction in [Direction::Forward, Direction::Reverse] {
            let keyed = store.ranks("tid:3:posts", &pids, direction).await.unwrap();
            let parallel = store.ranks_across(&containers, &pids, direction).await.unwrap();
            assert_eq!(keyed, parallel);
        }
    }

    #[tokio::test]
    async fn mismatched_parallel_arrays_are_rejected() {
        let store = InMemoryStore::new();
        let result = store
            .ranks_across(&["tid:1:posts".to_string()], &[], Direction::Forward)
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn missing_container_ranks_nothing() {
        let store = InMemoryStore::new();
        assert_eq!(
            store.rank("tid:404:posts", PostId(1), Direction::Forward).await.unwrap(),
            None
        );
        assert!(store
            .range("tid:404:posts", 0, 10, Direction::Forward)
            .await
            .unwrap()
            .is_empty());
    }
}
