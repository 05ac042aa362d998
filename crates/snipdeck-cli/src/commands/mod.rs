pub mod config;
pub mod deploy;
pub mod snippets;
pub mod watch;

pub use config::ConfigCommand;

use anyhow::{Context, Result};
use snipdeck_config::ConfigManager;
use snipdeck_store::SnippetStore;
use std::path::{Path, PathBuf};

/// Load configuration, honoring an explicit `--config` path.
///
/// An explicit path must exist; the default path falls back to built-in
/// defaults when no config file has been written yet.
pub fn load_config(config_path: Option<&Path>) -> Result<ConfigManager> {
    match config_path {
        Some(path) => ConfigManager::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => ConfigManager::load_or_default().context("Failed to load config"),
    }
}

/// Open the snippet store at the configured (or default) path.
pub fn open_store(manager: &ConfigManager) -> Result<SnippetStore> {
    let path = match &manager.config().store_path {
        Some(path) => path.clone(),
        None => SnippetStore::default_path()?,
    };

    SnippetStore::open(&path, manager.config().priorities())
        .with_context(|| format!("Failed to open snippet store at {}", path.display()))
}

/// Resolve the publish root the deploy commands write into.
pub fn publish_root(manager: &ConfigManager) -> Result<PathBuf> {
    match &manager.config().publish_root {
        Some(root) => Ok(root.clone()),
        None => Ok(ConfigManager::default_publish_root()?),
    }
}
