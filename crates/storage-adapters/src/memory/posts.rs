//! `PostRepository` over a `DashMap` of canonical post records.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{Post, PostId, PostRepository, PostSummary, Result, SummaryOptions, UserId};

#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: DashMap<PostId, Post>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the canonical record. Per-viewer fields are reset so they are
    /// never persisted.
    pub fn insert(&self, mut post: Post) {
        post.self_post = false;
        self.posts.insert(post.pid, post);
    }

    pub fn get(&self, pid: PostId) -> Option<Post> {
        self.posts.get(&pid).map(|post| post.clone())
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

fn summarize(post: &Post, options: SummaryOptions) -> PostSummary {
    let content = if options.strip_tags {
        strip_tags(&post.content)
    } else {
        post.content.clone()
    };
    PostSummary {
        pid: post.pid,
        tid: post.tid,
        uid: post.uid,
        content,
        timestamp: post.timestamp,
        deleted: post.deleted,
        user: post.user.clone(),
    }
}

/// Drops everything between `<` and `>`.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn load_raw(&self, pids: &[PostId]) -> Result<Vec<Option<Post>>> {
        Ok(pids.iter().map(|pid| self.get(*pid)).collect())
    }

    async fn load_summaries(
        &self,
        pids: &[PostId],
        _viewer: UserId,
        options: SummaryOptions,
    ) -> Result<Vec<PostSummary>> {
        Ok(pids
            .iter()
            .filter_map(|pid| self.posts.get(pid).map(|post| summarize(&post, options)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{PostAuthor, TopicId};

    fn post(pid: u64, content: &str) -> Post {
        Post {
            pid: PostId(pid),
            tid: TopicId(1),
            uid: UserId(2),
            content: content.into(),
            timestamp: Utc::now(),
            votes: 0,
            deleted: false,
            self_post: true,
            user: PostAuthor {
                uid: UserId(2),
                username: "bob".into(),
                signature: "-- bob".into(),
            },
        }
    }

    #[tokio::test]
    async fn load_raw_keeps_order_and_holes() {
        let repo = InMemoryPostRepository::new();
        repo.insert(post(1, "one"));
        repo.insert(post(3, "three"));

        let loaded = repo
            .load_raw(&[PostId(3), PostId(2), PostId(1)])
            .await
            .unwrap();
        let shape: Vec<Option<u64>> = loaded.iter().map(|p| p.as_ref().map(|p| p.pid.0)).collect();
        assert_eq!(shape, vec![Some(3), None, Some(1)]);
    }

    #[test]
    fn insert_clears_viewer_fields() {
        let repo = InMemoryPostRepository::new();
        repo.insert(post(1, "one"));
        assert!(!repo.get(PostId(1)).unwrap().self_post);
    }

    #[tokio::test]
    async fn summaries_skip_missing_and_honor_strip_tags() {
        let repo = InMemoryPostRepository::new();
        repo.insert(post(1, "<p>hello <b>world</b></p>"));

        let plain = repo
            .load_summaries(&[PostId(1), PostId(2)], UserId(9), SummaryOptions::default())
            .await
            .unwrap();
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].content, "<p>hello <b>world</b></p>");

        let stripped = repo
            .load_summaries(&[PostId(1)], UserId(9), SummaryOptions { strip_tags: true })
            .await
            .unwrap();
        assert_eq!(stripped[0].content, "hello world");
    }
}
