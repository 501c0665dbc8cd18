//! # Domain Models
//!
//! These structs represent the entities the indexing layer moves around.
//! Identifiers are plain integers wrapped in newtypes so a topic id can never
//! be passed where a post id is expected.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text that replaces the body of a deleted post for unprivileged viewers.
pub const DELETED_POST_PLACEHOLDER: &str = "[[topic:post-is-deleted]]";

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

id_newtype!(
    /// Unique, never reused identifier of a post.
    PostId
);
id_newtype!(
    /// Identifier of the discussion thread (topic) a post belongs to.
    TopicId
);
id_newtype!(
    /// Identifier of a user. `UserId::GUEST` is the anonymous viewer.
    UserId
);

impl UserId {
    pub const GUEST: UserId = UserId(0);

    pub fn is_guest(&self) -> bool {
        self.0 == 0
    }
}

/// Author sub-record embedded in a hydrated post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub uid: UserId,
    pub username: String,
    /// Empty when the author has no signature or it has been redacted.
    #[serde(default)]
    pub signature: String,
}

/// A fully hydrated post as returned to presentation logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub pid: PostId,
    pub tid: TopicId,
    pub uid: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub deleted: bool,
    /// Whether the requesting viewer wrote this post. Computed per request,
    /// never persisted.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub self_post: bool,
    pub user: PostAuthor,
}

/// Condensed post used by listing pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub pid: PostId,
    pub tid: TopicId,
    pub uid: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub deleted: bool,
    pub user: PostAuthor,
}

/// Options forwarded to the summary hydration routine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    pub strip_tags: bool,
}

/// Ordering policy for posts inside a topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    NewestToOldest,
    #[default]
    OldestToNewest,
    MostVotes,
}

impl SortMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewestToOldest => "newest_to_oldest",
            Self::OldestToNewest => "oldest_to_newest",
            Self::MostVotes => "most_votes",
        }
    }

    /// Interprets a stored setting. Anything unrecognised sorts oldest first.
    #[must_use]
    pub fn from_setting(raw: &str) -> Self {
        match raw {
            "newest_to_oldest" => Self::NewestToOldest,
            "most_votes" => Self::MostVotes,
            _ => Self::OldestToNewest,
        }
    }

    /// Newest-first and most-votes-first both walk their container backwards.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::NewestToOldest | Self::MostVotes => Direction::Reverse,
            Self::OldestToNewest => Direction::Forward,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Iteration direction over an ordered container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Self::Reverse
        } else {
            Self::Forward
        }
    }
}

/// Inclusive slice `[start, stop]` of an ordered container.
///
/// Negative offsets count from the end of the container, as the backend does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub start: i64,
    pub stop: i64,
}

impl PageCursor {
    pub fn new(start: i64, stop: i64) -> Self {
        Self { start, stop }
    }

    /// Parses raw pagination input. Returns `None` unless both offsets are
    /// integers.
    pub fn from_query(start: &str, stop: &str) -> Option<Self> {
        Some(Self {
            start: parse_offset(start)?,
            stop: parse_offset(stop)?,
        })
    }

    /// Start of the following page. Always `stop + 1`, even when the page
    /// came back short.
    pub fn next_start(&self) -> i64 {
        self.stop + 1
    }
}

/// Parses one pagination offset. Non-numeric input yields `None`.
pub fn parse_offset(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// One page of summaries plus where the next page begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPage {
    pub posts: Vec<PostSummary>,
    pub next_start: i64,
}

/// Named capabilities understood by the privilege service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "topics:read")]
    TopicsRead,
    #[serde(rename = "posts:view_deleted")]
    PostsViewDeleted,
}

impl Capability {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TopicsRead => "topics:read",
            Self::PostsViewDeleted => "posts:view_deleted",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A viewer's resolved capability set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privileges {
    capabilities: BTreeSet<Capability>,
}

impl Privileges {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl FromIterator<Capability> for Privileges {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            capabilities: iter.into_iter().collect(),
        }
    }
}

/// Payload handed to the hook dispatcher at the post retrieval filter point.
///
/// Plugins may null out entries (`None`), reorder or rewrite them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsHookPayload {
    pub posts: Vec<Option<Post>>,
    pub viewer: UserId,
}

/// The minimum a batch rank lookup needs to know about a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostRef {
    pub pid: PostId,
    pub tid: TopicId,
}

impl PostRef {
    pub fn new(pid: impl Into<PostId>, tid: impl Into<TopicId>) -> Self {
        Self {
            pid: pid.into(),
            tid: tid.into(),
        }
    }
}

impl From<&Post> for PostRef {
    fn from(post: &Post) -> Self {
        Self {
            pid: post.pid,
            tid: post.tid,
        }
    }
}
