//! Snipdeck Manifest - the persisted record of published assets.
//!
//! The deploy manifest (`assets/index.json` under the publish root) is the
//! only cross-session record of what has actually been published. This
//! crate owns:
//!
//! - [`DeployManifest`]: load/save and entry upserts, keyed by snippet id
//! - [`DeployState`]: the never-deployed / stale / current tri-state,
//!   derived by comparing manifest content hashes against live snippets
//! - [`analytics`]: totals, deploy history and file metrics over the
//!   manifest
//! - [`sync_manifest`]: reconciling the manifest with the published asset
//!   tree
//! - [`ManifestWatcher`]: change notifications over a broadcast channel,
//!   backed by mtime polling

pub mod analytics;
pub mod error;
pub mod manifest;
pub mod sync;
pub mod watch;

pub use analytics::{history, metrics, totals, FileExtreme, ManifestMetrics, ManifestTotals};
pub use error::{ManifestError, Result};
pub use manifest::{content_hash, DeployManifest, DeploySource, DeployState, ManifestEntry};
pub use sync::{sync_manifest, SyncReport};
pub use watch::{ManifestEvent, ManifestWatcher};
