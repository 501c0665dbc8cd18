//! # storage-adapters
//!
//! Implementations of the `domains` ports.
//!
//! - `memory`: `DashMap`-backed ordered store, post repository and default
//!   collaborators. Always compiled; used by tests and the CLI.
//! - `redis`: sorted-set backed `OrderedStore` (feature `redis`).
//! - `hooks` / `parser`: plugin filter registry and the HTML content parser.

pub mod hooks;
pub mod memory;
pub mod parser;
pub mod seed;

#[cfg(feature = "redis")]
pub mod redis;

pub use hooks::HookRegistry;
pub use memory::{
    InMemoryPostRepository, InMemoryStore, MemoryBackend, StaticPrivileges, StaticSettings,
};
pub use seed::{SeedError, SeedFile};
pub use parser::HtmlContentParser;
