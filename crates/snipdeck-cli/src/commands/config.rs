//! Configuration commands backed by the TOML config file.

use crate::commands::{load_config, publish_root};
use crate::OutputFormat;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use snipdeck_config::ConfigManager;
use snipdeck_store::SnippetStore;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Initialize config file at ~/.snipdeck/config.toml
    Init,

    /// Show the resolved configuration
    Show,

    /// Set a config value and save
    Set {
        /// Key to set (e.g. base_url, deploy_delay_ms, page_priorities.checkout)
        key: String,

        /// New value
        value: String,
    },

    /// Show config file path
    Path,
}

pub fn handle_config_command(
    cmd: ConfigCommand,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> Result<()> {
    match cmd {
        ConfigCommand::Init => init(config_path),
        ConfigCommand::Show => show(format, config_path),
        ConfigCommand::Set { key, value } => set(key, value, config_path),
        ConfigCommand::Path => path(config_path),
    }
}

fn init(config_path: Option<&Path>) -> Result<()> {
    let target = match config_path {
        Some(path) => path.to_path_buf(),
        None => ConfigManager::config_path()?,
    };

    if target.exists() {
        println!("Config already exists at: {}", target.display());
        println!("Edit it with: snipdeck config set <key> <value>");
        return Ok(());
    }

    ConfigManager::init_at(&target).context("Failed to initialize config")?;
    println!("{} Initialized config at: {}", "✓".green(), target.display());
    Ok(())
}

fn show(format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let config = manager.config();

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    let store_path = match &config.store_path {
        Some(path) => path.clone(),
        None => SnippetStore::default_path()?,
    };
    let root = publish_root(&manager)?;

    println!("\nConfiguration ({})", manager.path().display());
    println!("{}", "=".repeat(60));
    println!("  base_url: {}", config.base_url);
    println!("  store_path: {}", store_path.display());
    println!("  publish_root: {}", root.display());
    println!("  deploy_delay_ms: {}", config.deploy_delay_ms);
    println!("  publish_timeout_secs: {}", config.publish_timeout_secs);
    println!("  watch_interval_secs: {}", config.watch_interval_secs);
    println!("  auto_minify: {}", config.auto_minify);

    if !config.page_priorities.is_empty() {
        println!("  page_priorities:");
        for (page, priority) in &config.page_priorities {
            println!("    {}: {}", page, priority);
        }
    }

    Ok(())
}

fn set(key: String, value: String, config_path: Option<&Path>) -> Result<()> {
    let mut manager = match config_path {
        Some(path) => ConfigManager::load_or_default_from(path),
        None => ConfigManager::load_or_default(),
    }
    .context("Failed to load config")?;

    manager
        .set(&key, &value)
        .with_context(|| format!("Failed to set {}", key))?;

    println!("{} Set {} = {}", "✓".green(), key, value);
    println!("  Saved to {}", manager.path().display());
    Ok(())
}

fn path(config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", ConfigManager::config_path()?.display()),
    }
    Ok(())
}
