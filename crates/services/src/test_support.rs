//! Fixtures shared by the unit tests in this crate.

use chrono::{TimeZone, Utc};
use domains::{Post, PostAuthor, PostId, TopicId, UserId};

pub fn post(pid: u64, tid: u64, uid: u64) -> Post {
    Post {
        pid: PostId(pid),
        tid: TopicId(tid),
        uid: UserId(uid),
        content: format!("body of {pid}"),
        timestamp: Utc.timestamp_opt(1_700_000_000 + pid as i64, 0).unwrap(),
        votes: 0,
        deleted: false,
        self_post: false,
        user: PostAuthor {
            uid: UserId(uid),
            username: format!("user{uid}"),
            signature: format!("sig of {uid}"),
        },
    }
}

pub fn pids(raw: &[u64]) -> Vec<PostId> {
    raw.iter().copied().map(PostId).collect()
}
