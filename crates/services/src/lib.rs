//! # services
//!
//! The algorithmic core of post-index: existence checks, container paging,
//! post hydration, summary paging, rank resolution and viewer redaction.
//! Every collaborator arrives through a port from `domains`.

pub mod existence;
pub mod pagination;
pub mod post_service;
pub mod rank;
pub mod redaction;
pub mod retrieval;
pub mod summary;

pub use existence::ExistenceChecker;
pub use pagination::PaginationResolver;
pub use post_service::PostService;
pub use rank::{rank_from_raw, RankResolver};
pub use redaction::{redact_all, redact_for_viewer};
pub use retrieval::PostRetriever;
pub use summary::SummaryPaginator;

#[cfg(test)]
pub(crate) mod test_support;
