//! Persistence for alert state and subscription lookups
//!
//! This module provides a trait-based abstraction over the persistence
//! layer the core relies on.
//!
//! ## Design
//!
//! - **Trait-based**: `AlertStore` allows swapping implementations
//! - **Async**: All operations are async for compatibility with Tokio
//! - **Atomic transitions**: `commit_transition` writes `state` and
//!   `last_triggered_at` in a single commit so a crash never leaves a
//!   partial transition visible
//!
//! ## Backends
//!
//! - **In-Memory**: No persistence, for testing and embedders that bring
//!   their own database behind the trait

pub mod backend;
pub mod error;
pub mod memory;

pub use backend::AlertStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
