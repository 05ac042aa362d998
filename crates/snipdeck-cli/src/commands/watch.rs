//! Live event stream over the manifest and deploy log.

use crate::commands::{load_config, publish_root};
use crate::OutputFormat;
use anyhow::{Context, Result};
use chrono::Utc;
use snipdeck_manifest::{DeployManifest, ManifestEvent, ManifestWatcher};
use std::path::Path;
use tokio::runtime::Runtime;
use tokio::sync::broadcast::error::RecvError;

pub fn handle_watch(format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(watch(format, config_path))
}

async fn watch(format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let root = publish_root(&manager)?;

    let manifest_path = DeployManifest::path_in(&root);
    let log_path = root.join("deploy.log");
    let watcher = ManifestWatcher::spawn(
        manifest_path,
        log_path,
        manager.config().watch_interval(),
    );
    let mut events = watcher.subscribe();

    if !format.is_json() {
        println!("Watching {} (Ctrl-C to stop)", root.display());
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                if !format.is_json() {
                    println!("\nStopped.");
                }
                break;
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event, format),
                Err(RecvError::Lagged(skipped)) => {
                    eprintln!("Warning: skipped {} event(s)", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    Ok(())
}

fn print_event(event: &ManifestEvent, format: OutputFormat) {
    match event {
        ManifestEvent::FilesUpdated { totals } => {
            if format.is_json() {
                let payload = serde_json::json!({"event": "files_updated", "totals": totals});
                println!("{}", payload);
            } else {
                println!(
                    "[{}] Files updated: {} asset(s), {} bytes",
                    Utc::now().format("%H:%M:%S"),
                    totals.total,
                    totals.size
                );
            }
        }
        ManifestEvent::DeployLogged { line } => {
            if format.is_json() {
                let payload = serde_json::json!({"event": "deploy_logged", "line": line});
                println!("{}", payload);
            } else {
                println!("{}", line);
            }
        }
    }
}
