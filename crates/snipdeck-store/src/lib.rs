//! Snipdeck Store - persisted snippet collection.
//!
//! [`SnippetStore`] owns the registered snippets and their derived groups
//! and stats. Every mutation validates its input, applies the change,
//! synchronously recomputes groups and stats, and saves the store file
//! atomically; reads after a mutation always observe consistent derived
//! state. Loading is fail-open: a missing or corrupt store file yields an
//! empty store, never a crash.

pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::SnippetStore;
