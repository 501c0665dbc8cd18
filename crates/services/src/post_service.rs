//! # PostService
//!
//! Aggregate over the individual resolvers. Presentation code holds one of
//! these and never wires the components by hand.

use std::sync::Arc;

use domains::{
    Capability, ContentParser, Direction, HookDispatcher, OrderedStore, PageCursor, Post, PostId,
    PostRef, PostRepository, PrivilegeService, Result, SettingsProvider, SummaryOptions,
    SummaryPage, TopicId, UserId,
};
use tracing::{debug, instrument};

use crate::existence::ExistenceChecker;
use crate::pagination::PaginationResolver;
use crate::rank::RankResolver;
use crate::redaction::redact_all;
use crate::retrieval::PostRetriever;
use crate::summary::SummaryPaginator;

/// Collaborators required to build a [`PostService`].
#[derive(Clone)]
pub struct PostServiceDeps {
    pub store: Arc<dyn OrderedStore>,
    pub privileges: Arc<dyn PrivilegeService>,
    pub settings: Arc<dyn SettingsProvider>,
    pub hooks: Arc<dyn HookDispatcher>,
    pub posts: Arc<dyn PostRepository>,
    pub parser: Arc<dyn ContentParser>,
}

#[derive(Clone)]
pub struct PostService {
    existence: ExistenceChecker,
    pagination: PaginationResolver,
    retriever: PostRetriever,
    summaries: SummaryPaginator,
    ranks: RankResolver,
    privileges: Arc<dyn PrivilegeService>,
}

impl PostService {
    pub fn new(deps: PostServiceDeps) -> Self {
        Self {
            existence: ExistenceChecker::new(deps.store.clone()),
            pagination: PaginationResolver::new(deps.store.clone()),
            retriever: PostRetriever::new(deps.posts.clone(), deps.parser, deps.hooks),
            summaries: SummaryPaginator::new(
                deps.store.clone(),
                deps.privileges.clone(),
                deps.posts,
            ),
            ranks: RankResolver::new(deps.store, deps.settings),
            privileges: deps.privileges,
        }
    }

    pub fn with_summary_options(mut self, options: SummaryOptions) -> Self {
        self.summaries = self.summaries.with_options(options);
        self
    }

    pub async fn exists(&self, pid: PostId) -> Result<bool> {
        self.existence.exists(pid).await
    }

    pub async fn exists_many(&self, pids: &[PostId]) -> Result<Vec<bool>> {
        self.existence.exists_many(pids).await
    }

    pub async fn get_pids_from_set(
        &self,
        set: &str,
        start: Option<i64>,
        stop: Option<i64>,
        direction: Direction,
    ) -> Result<Vec<PostId>> {
        self.pagination
            .get_pids_from_set(set, start, stop, direction)
            .await
    }

    pub async fn get_posts_by_pids(&self, pids: &[PostId], viewer: UserId) -> Result<Vec<Post>> {
        self.retriever.get_posts_by_pids(pids, viewer).await
    }

    pub async fn get_post_summaries_from_set(
        &self,
        set: &str,
        viewer: UserId,
        cursor: PageCursor,
    ) -> Result<SummaryPage> {
        self.summaries
            .get_post_summaries_from_set(set, viewer, cursor)
            .await
    }

    pub async fn get_pid_index(&self, pid: PostId, tid: TopicId, mode: &str) -> Result<u64> {
        self.ranks.get_pid_index(pid, tid, mode).await
    }

    pub async fn get_post_indices(&self, posts: &[PostRef], viewer: UserId) -> Result<Vec<u64>> {
        self.ranks.get_post_indices(posts, viewer).await
    }

    /// Full posts for a slice of `set`, limited to what the viewer may read.
    #[instrument(skip_all, fields(set = %set, viewer = %viewer))]
    pub async fn get_posts_from_set(
        &self,
        set: &str,
        viewer: UserId,
        start: Option<i64>,
        stop: Option<i64>,
        direction: Direction,
    ) -> Result<Vec<Post>> {
        let pids = self
            .pagination
            .get_pids_from_set(set, start, stop, direction)
            .await?;
        if pids.is_empty() {
            return Ok(Vec::new());
        }
        let readable = self
            .privileges
            .filter_readable(Capability::TopicsRead, pids, viewer)
            .await?;
        self.retriever.get_posts_by_pids(&readable, viewer).await
    }

    /// Hydrates posts of topic `tid` and redacts them for `viewer`.
    ///
    /// The viewer's privileges are resolved for `tid` only, so posts that
    /// belong to another topic are left out. Ownership is computed here; a
    /// guest never owns a post.
    #[instrument(skip_all, fields(count = pids.len(), viewer = %viewer, tid = %tid))]
    pub async fn get_posts_for_viewer(
        &self,
        pids: &[PostId],
        viewer: UserId,
        tid: TopicId,
    ) -> Result<Vec<Post>> {
        let (posts, privileges) = tokio::try_join!(
            self.retriever.get_posts_by_pids(pids, viewer),
            self.privileges.privileges_for(viewer, tid),
        )?;
        let hydrated = posts.len();
        let posts: Vec<Post> = posts
            .into_iter()
            .filter(|post| post.tid == tid)
            .map(|mut post| {
                post.self_post = !viewer.is_guest() && post.uid == viewer;
                post
            })
            .collect();
        debug!(
            hydrated,
            foreign = hydrated - posts.len(),
            "applying redaction"
        );
        Ok(redact_all(posts, &privileges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pids, post};
    use domains::{
        MockContentParser, MockHookDispatcher, MockOrderedStore, MockPostRepository,
        MockPrivilegeService, MockSettingsProvider, Privileges, DELETED_POST_PLACEHOLDER,
    };

    struct Mocks {
        store: MockOrderedStore,
        privileges: MockPrivilegeService,
        posts: MockPostRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                store: MockOrderedStore::new(),
                privileges: MockPrivilegeService::new(),
                posts: MockPostRepository::new(),
            }
        }

        fn build(self) -> PostService {
            let mut parser = MockContentParser::new();
            parser.expect_parse().returning(Ok);
            let mut hooks = MockHookDispatcher::new();
            hooks
                .expect_filter_posts()
                .returning(|_, payload| Ok(Some(payload)));

            PostService::new(PostServiceDeps {
                store: Arc::new(self.store),
                privileges: Arc::new(self.privileges),
                settings: Arc::new(MockSettingsProvider::new()),
                hooks: Arc::new(hooks),
                posts: Arc::new(self.posts),
                parser: Arc::new(parser),
            })
        }
    }

    #[tokio::test]
    async fn posts_from_set_filter_unreadable_ids() {
        let mut mocks = Mocks::new();
        mocks
            .store
            .expect_range()
            .returning(|_, _, _, _| Ok(pids(&[4, 5, 6])));
        mocks
            .privileges
            .expect_filter_readable()
            .withf(|capability, _, _| *capability == Capability::TopicsRead)
            .returning(|_, pids, _| Ok(pids.into_iter().filter(|pid| pid.0 != 5).collect()));
        mocks
            .posts
            .expect_load_raw()
            .withf(|pids| pids.to_vec() == vec![PostId(4), PostId(6)])
            .returning(|pids| Ok(pids.iter().map(|pid| Some(post(pid.0, 1, 7))).collect()));

        let service = mocks.build();
        let posts = service
            .get_posts_from_set("tid:1:posts", UserId(2), Some(0), Some(2), Direction::Forward)
            .await
            .unwrap();
        let order: Vec<u64> = posts.iter().map(|p| p.pid.0).collect();
        assert_eq!(order, vec![4, 6]);
    }

    #[tokio::test]
    async fn posts_from_set_with_bad_offsets_is_empty() {
        let mut mocks = Mocks::new();
        mocks.store.expect_range().never();
        mocks.privileges.expect_filter_readable().never();
        mocks.posts.expect_load_raw().never();

        let service = mocks.build();
        let posts = service
            .get_posts_from_set("tid:1:posts", UserId(2), None, Some(2), Direction::Forward)
            .await
            .unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn viewer_posts_are_redacted_unless_owned() {
        let mut mocks = Mocks::new();
        mocks.posts.expect_load_raw().returning(|_| {
            Ok(vec![
                Some(Post {
                    deleted: true,
                    ..post(1, 3, 7)
                }),
                Some(Post {
                    deleted: true,
                    ..post(2, 3, 8)
                }),
                Some(post(3, 3, 8)),
            ])
        });
        mocks
            .privileges
            .expect_privileges_for()
            .withf(|viewer, tid| *viewer == UserId(7) && *tid == TopicId(3))
            .returning(|_, _| Ok(Privileges::none().with(Capability::TopicsRead)));

        let service = mocks.build();
        let posts = service
            .get_posts_for_viewer(&pids(&[1, 2, 3]), UserId(7), TopicId(3))
            .await
            .unwrap();

        assert!(posts[0].self_post);
        assert_eq!(posts[0].content, "body of 1");
        assert!(!posts[1].self_post);
        assert_eq!(posts[1].content, DELETED_POST_PLACEHOLDER);
        assert!(posts[1].user.signature.is_empty());
        assert_eq!(posts[2].content, "body of 3");
    }

    #[tokio::test]
    async fn posts_from_other_topics_are_left_out() {
        let mut mocks = Mocks::new();
        mocks.posts.expect_load_raw().returning(|_| {
            Ok(vec![
                Some(Post {
                    deleted: true,
                    ..post(9, 9, 8)
                }),
                Some(Post {
                    deleted: true,
                    ..post(4, 3, 8)
                }),
            ])
        });
        mocks
            .privileges
            .expect_privileges_for()
            .withf(|_, tid| *tid == TopicId(3))
            .returning(|_, _| {
                Ok(Privileges::none()
                    .with(Capability::TopicsRead)
                    .with(Capability::PostsViewDeleted))
            });

        let service = mocks.build();
        let posts = service
            .get_posts_for_viewer(&pids(&[9, 4]), UserId(7), TopicId(3))
            .await
            .unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].pid, PostId(4));
        assert_eq!(posts[0].content, "body of 4");
        assert!(posts.iter().all(|p| p.content != "body of 9"));
    }

    #[tokio::test]
    async fn guest_never_owns_a_post() {
        let mut mocks = Mocks::new();
        mocks.posts.expect_load_raw().returning(|_| {
            Ok(vec![Some(Post {
                deleted: true,
                ..post(1, 3, 0)
            })])
        });
        mocks
            .privileges
            .expect_privileges_for()
            .returning(|_, _| Ok(Privileges::none()));

        let service = mocks.build();
        let posts = service
            .get_posts_for_viewer(&pids(&[1]), UserId::GUEST, TopicId(3))
            .await
            .unwrap();
        assert!(!posts[0].self_post);
        assert_eq!(posts[0].content, DELETED_POST_PLACEHOLDER);
    }
}
