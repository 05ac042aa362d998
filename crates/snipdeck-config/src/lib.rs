//! Dashboard configuration, stored in `~/.snipdeck/config.toml`.
//!
//! [`Config`] holds the publish target (base url, publish root), the
//! timing knobs for deploys and watching, and per-page priority
//! overrides for group ordering. [`ConfigManager`] owns loading, atomic
//! saving and key-by-key edits from the CLI.

pub mod manager;
pub mod types;

pub use manager::{ConfigError, ConfigManager};
pub use types::Config;
