//! Summary Paginator: one page of post summaries, newest first.

use std::sync::Arc;

use domains::{
    Capability, Direction, OrderedStore, PageCursor, PostRepository, PrivilegeService, Result,
    SummaryOptions, SummaryPage, UserId,
};
use tracing::instrument;

#[derive(Clone)]
pub struct SummaryPaginator {
    store: Arc<dyn OrderedStore>,
    privileges: Arc<dyn PrivilegeService>,
    posts: Arc<dyn PostRepository>,
    options: SummaryOptions,
}

impl SummaryPaginator {
    pub fn new(
        store: Arc<dyn OrderedStore>,
        privileges: Arc<dyn PrivilegeService>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            store,
            privileges,
            posts,
            options: SummaryOptions::default(),
        }
    }

    /// Overrides the options passed to summary hydration.
    pub fn with_options(mut self, options: SummaryOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the readable summaries in `cursor` of `set`, most recent first.
    ///
    /// `next_start` is `cursor.stop + 1` even when the privilege filter
    /// removed entries and the page came back short.
    #[instrument(skip_all, fields(set = %set, viewer = %viewer, start = cursor.start, stop = cursor.stop))]
    pub async fn get_post_summaries_from_set(
        &self,
        set: &str,
        viewer: UserId,
        cursor: PageCursor,
    ) -> Result<SummaryPage> {
        let pids = self
            .store
            .range(set, cursor.start, cursor.stop, Direction::Reverse)
            .await?;
        let readable = self
            .privileges
            .filter_readable(Capability::TopicsRead, pids, viewer)
            .await?;
        let posts = self
            .posts
            .load_summaries(&readable, viewer, self.options)
            .await?;

        Ok(SummaryPage {
            posts,
            next_start: cursor.next_start(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pids, post};
    use domains::{
        DomainError, MockOrderedStore, MockPostRepository, MockPrivilegeService, PostId,
        PostSummary,
    };

    fn summary(pid: u64) -> PostSummary {
        let post = post(pid, 1, 7);
        PostSummary {
            pid: post.pid,
            tid: post.tid,
            uid: post.uid,
            content: post.content,
            timestamp: post.timestamp,
            deleted: post.deleted,
            user: post.user,
        }
    }

    #[tokio::test]
    async fn filters_then_hydrates_in_reverse_order() {
        let mut store = MockOrderedStore::new();
        store
            .expect_range()
            .withf(|set, start, stop, direction| {
                set == "uid:7:posts" && *start == 0 && *stop == 3 && *direction == Direction::Reverse
            })
            .times(1)
            .returning(|_, _, _, _| Ok(pids(&[9, 8, 7, 6])));

        let mut privileges = MockPrivilegeService::new();
        privileges
            .expect_filter_readable()
            .withf(|capability, pids, viewer| {
                *capability == Capability::TopicsRead && pids.len() == 4 && *viewer == UserId(2)
            })
            .times(1)
            .returning(|_, pids, _| Ok(pids.into_iter().filter(|pid| pid.0 != 8).collect()));

        let mut repo = MockPostRepository::new();
        repo.expect_load_summaries()
            .withf(|pids, viewer, options| {
                pids.to_vec() == vec![PostId(9), PostId(7), PostId(6)]
                    && *viewer == UserId(2)
                    && !options.strip_tags
            })
            .times(1)
            .returning(|pids, _, _| Ok(pids.iter().map(|pid| summary(pid.0)).collect()));

        let paginator =
            SummaryPaginator::new(Arc::new(store), Arc::new(privileges), Arc::new(repo));
        let page = paginator
            .get_post_summaries_from_set("uid:7:posts", UserId(2), PageCursor::new(0, 3))
            .await
            .unwrap();

        let order: Vec<u64> = page.posts.iter().map(|s| s.pid.0).collect();
        assert_eq!(order, vec![9, 7, 6]);
        assert_eq!(page.next_start, 4);
    }

    #[tokio::test]
    async fn next_start_is_unconditional_on_empty_page() {
        let mut store = MockOrderedStore::new();
        store.expect_range().returning(|_, _, _, _| Ok(Vec::new()));
        let mut privileges = MockPrivilegeService::new();
        privileges
            .expect_filter_readable()
            .returning(|_, pids, _| Ok(pids));
        let mut repo = MockPostRepository::new();
        repo.expect_load_summaries().returning(|_, _, _| Ok(Vec::new()));

        let paginator =
            SummaryPaginator::new(Arc::new(store), Arc::new(privileges), Arc::new(repo));
        let page = paginator
            .get_post_summaries_from_set("uid:7:posts", UserId(2), PageCursor::new(40, 59))
            .await
            .unwrap();
        assert!(page.posts.is_empty());
        assert_eq!(page.next_start, 60);
    }

    #[tokio::test]
    async fn strip_tags_option_is_forwarded() {
        let mut store = MockOrderedStore::new();
        store.expect_range().returning(|_, _, _, _| Ok(pids(&[1])));
        let mut privileges = MockPrivilegeService::new();
        privileges
            .expect_filter_readable()
            .returning(|_, pids, _| Ok(pids));
        let mut repo = MockPostRepository::new();
        repo.expect_load_summaries()
            .withf(|_, _, options| options.strip_tags)
            .times(1)
            .returning(|_, _, _| Ok(vec![summary(1)]));

        let paginator =
            SummaryPaginator::new(Arc::new(store), Arc::new(privileges), Arc::new(repo))
                .with_options(SummaryOptions { strip_tags: true });
        let page = paginator
            .get_post_summaries_from_set("uid:7:posts", UserId(2), PageCursor::new(0, 0))
            .await
            .unwrap();
        assert_eq!(page.posts.len(), 1);
    }

    #[tokio::test]
    async fn privilege_failure_propagates() {
        let mut store = MockOrderedStore::new();
        store.expect_range().returning(|_, _, _, _| Ok(pids(&[1])));
        let mut privileges = MockPrivilegeService::new();
        privileges
            .expect_filter_readable()
            .returning(|_, _, _| Err(DomainError::collaborator("privileges offline")));
        let mut repo = MockPostRepository::new();
        repo.expect_load_summaries().never();

        let paginator =
            SummaryPaginator::new(Arc::new(store), Arc::new(privileges), Arc::new(repo));
        let result = paginator
            .get_post_summaries_from_set("uid:7:posts", UserId(2), PageCursor::new(0, 9))
            .await;
        assert!(result.is_err());
    }
}
