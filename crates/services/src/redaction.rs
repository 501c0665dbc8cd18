//! Redaction Rule: hide deleted posts from viewers who may not see them.
//!
//! Works on owned copies only. The stored record is never touched.

use domains::{Capability, Post, Privileges, DELETED_POST_PLACEHOLDER};

/// Returns `post` as `privileges` may see it.
///
/// A deleted post that the viewer did not write and cannot view-deleted gets
/// its body replaced by the placeholder and its author signature cleared.
/// Everything else comes back unchanged.
pub fn redact_for_viewer(mut post: Post, privileges: &Privileges) -> Post {
    if post.deleted && !post.self_post && !privileges.has(Capability::PostsViewDeleted) {
        post.content = DELETED_POST_PLACEHOLDER.to_string();
        post.user.signature.clear();
    }
    post
}

/// Applies [`redact_for_viewer`] to a whole batch.
pub fn redact_all(posts: Vec<Post>, privileges: &Privileges) -> Vec<Post> {
    posts
        .into_iter()
        .map(|post| redact_for_viewer(post, privileges))
        .collect()
}
