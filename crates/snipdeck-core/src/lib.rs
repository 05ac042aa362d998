//! Snipdeck Core - snippet domain types and the grouping engine.
//!
//! This crate provides the pure computation layer of Snipdeck. It defines:
//!
//! - [`Snippet`] and the closed [`SnippetKind`]/[`Location`]/[`PageScope`]
//!   catalogs that describe where a snippet is injected
//! - [`compute_groups`]: deterministic partitioning of active snippets into
//!   deduplicated asset groups
//! - [`suggest`]: predicts whether a candidate snippet joins an existing
//!   group or opens a new one, with a performance-gain estimate
//! - [`compute_stats`]: dashboard counters over the active snippet set
//! - [`embed_tag`] / [`parse_embed_tag`]: the HTML tags that load a group
//!   from the CDN
//!
//! # Architecture
//!
//! Everything here is a pure function over plain data. Persistence, deploys
//! and presentation live in the crates above:
//!
//! ```text
//! ┌──────────────────┐
//! │   snipdeck-cli   │  (User interface)
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌───────────────────┐
//! │  snipdeck-store  │     │ snipdeck-publish  │
//! │  (persistence)   │     │ snipdeck-manifest │
//! └────────┬─────────┘     └─────────┬─────────┘
//!          │                         │
//!          ▼                         ▼
//! ┌──────────────────────────────────────────┐
//! │  snipdeck-core  (this crate - pure math) │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use snipdeck_core::{compute_groups, compute_stats, PagePriorities};
//!
//! let snippets = Vec::new();
//! let groups = compute_groups(&snippets, &PagePriorities::default());
//! let stats = compute_stats(&snippets, &PagePriorities::default());
//!
//! assert!(groups.is_empty());
//! assert_eq!(stats.total_active_codes, 0);
//! ```

pub mod codegen;
pub mod error;
pub mod filenames;
pub mod gain;
pub mod grouping;
pub mod stats;
pub mod suggest;
pub mod types;
pub mod validation;

// Re-export core types for convenience
pub use codegen::{embed_tag, parse_embed_tag};
pub use error::{Error, Result};
pub use filenames::{group_filename, name_slug, pages_slug, snippet_filename};
pub use gain::estimate_gain;
pub use grouping::{compute_groups, PagePriorities, DEFAULT_PAGE_PRIORITY};
pub use stats::compute_stats;
pub use suggest::suggest;
pub use types::{
    DashboardStats, Group, GroupKey, Location, PageScope, PerformanceGain, Snippet, SnippetDraft,
    SnippetKind, Suggestion, SuggestionKind,
};
pub use validation::{detect_kind, validate_draft};
