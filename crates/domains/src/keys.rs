//! Key naming convention shared by services and storage adapters.

use crate::models::{PostId, SortMode, TopicId, UserId};

/// Filter point fired after a batch of posts has been hydrated.
pub const GET_POSTS_HOOK: &str = "filter:post.getPosts";

/// Storage key whose existence means the post exists.
pub fn post_key(pid: PostId) -> String {
    format!("post:{pid}")
}

/// Topic posts ordered by creation time.
pub fn topic_posts(tid: TopicId) -> String {
    format!("tid:{tid}:posts")
}

/// Topic posts ordered by vote count.
pub fn topic_votes(tid: TopicId) -> String {
    format!("tid:{tid}:posts:votes")
}

/// Posts written by a user, ordered by creation time.
pub fn user_posts(uid: UserId) -> String {
    format!("uid:{uid}:posts")
}

/// Container a sort mode ranks against.
pub fn container_for(tid: TopicId, mode: SortMode) -> String {
    match mode {
        SortMode::MostVotes => topic_votes(tid),
        SortMode::NewestToOldest | SortMode::OldestToNewest => topic_posts(tid),
    }
}
