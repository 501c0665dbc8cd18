//! # DomainError
//!
//! Centralized error handling for post-index.
//!
//! Only genuine failures live here. Empty pages, zero ranks and redacted
//! content are ordinary results and never travel through this type.

use thiserror::Error;

/// The primary error type for all post-index operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The ordered key-value backend failed or is unreachable.
    #[error("backend error: {0}")]
    Backend(String),

    /// A collaborator (privileges, settings, hooks, parser) failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// Malformed input rejected before reaching a collaborator.
    #[error("validation error: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn backend<T: ToString>(msg: T) -> Self {
        Self::Backend(msg.to_string())
    }

    pub fn collaborator<T: ToString>(msg: T) -> Self {
        Self::Collaborator(msg.to_string())
    }
}

/// A specialized Result type for post-index logic.
pub type Result<T> = std::result::Result<T, DomainError>;
