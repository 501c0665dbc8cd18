//! post-index/crates/domains/src/lib.rs
//!
//! Models, collaborator contracts (ports) and the error type shared by every
//! post-index crate. Nothing in here performs I/O.

pub mod errors;
pub mod keys;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;
