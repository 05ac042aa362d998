//! Publishing pipeline for snippet assets.
//!
//! A [`Publisher`] takes a [`PublishRequest`] (one snippet or one whole
//! group, already flattened to a filename plus content) and makes it
//! available under a public URL. The bundled [`FsPublisher`] writes into a
//! local publish root laid out like the served asset tree:
//!
//! ```text
//! <root>/assets/<filename>     minified asset
//! <root>/assets/index.json     deploy manifest
//! <root>/deploy.log            append-only deploy journal
//! ```
//!
//! Content passes through a [`Minifier`] before being written; the
//! manifest records a hash of the original content so staleness can be
//! detected later. [`deploy_all`] drives whole batches sequentially,
//! tolerating per-item failures.

pub mod batch;
pub mod error;
pub mod fs;
pub mod minify;
pub mod publisher;

pub use batch::{deploy_all, BatchFailure, BatchOutcome};
pub use error::{PublishError, Result};
pub use fs::FsPublisher;
pub use minify::{BasicMinifier, Minifier, Passthrough};
pub use publisher::{PublishReceipt, PublishRequest, Publisher};
