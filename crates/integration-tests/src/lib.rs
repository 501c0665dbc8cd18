//! Fixtures for the end-to-end tests: a seeded in-memory backend and a
//! `PostService` wired over it.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use domains::{Capability, Post, PostAuthor, PostId, Privileges, SortMode, TopicId, UserId};
use services::post_service::{PostService, PostServiceDeps};
use storage_adapters::{HookRegistry, HtmlContentParser, MemoryBackend};

pub struct Fixture {
    pub backend: MemoryBackend,
    pub hooks: Arc<HookRegistry>,
    pub service: PostService,
}

impl Fixture {
    /// Everyone may read; nobody may see deleted posts; viewers sort
    /// oldest first unless told otherwise.
    pub fn new() -> Self {
        let backend = MemoryBackend::new(
            SortMode::OldestToNewest,
            Privileges::none().with(Capability::TopicsRead),
        );
        let hooks = Arc::new(HookRegistry::new());
        let service = PostService::new(PostServiceDeps {
            store: backend.store.clone(),
            privileges: backend.privileges.clone(),
            settings: backend.settings.clone(),
            hooks: hooks.clone(),
            posts: backend.posts.clone(),
            parser: Arc::new(HtmlContentParser::new()),
        });
        Self {
            backend,
            hooks,
            service,
        }
    }

    pub fn add(&self, post: Post) -> &Self {
        self.backend.add_post(post);
        self
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A post created `pid` seconds after a fixed epoch, so recency order
/// follows pid order.
pub fn post(pid: u64, tid: u64, uid: u64, votes: i64) -> Post {
    Post {
        pid: PostId(pid),
        tid: TopicId(tid),
        uid: UserId(uid),
        content: format!("post {pid}"),
        timestamp: Utc
            .timestamp_opt(1_700_000_000 + pid as i64, 0)
            .single()
            .unwrap_or_default(),
        votes,
        deleted: false,
        self_post: false,
        user: PostAuthor {
            uid: UserId(uid),
            username: format!("user{uid}"),
            signature: format!("signature of user{uid}"),
        },
    }
}

pub fn pids(raw: &[u64]) -> Vec<PostId> {
    raw.iter().copied().map(PostId).collect()
}
