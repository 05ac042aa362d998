//! Deploy-side commands: publish, status, history, analytics, sync.

use crate::commands::{load_config, open_store, publish_root};
use crate::OutputFormat;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::*;
use snipdeck_config::ConfigManager;
use snipdeck_core::GroupKey;
use snipdeck_manifest::{DeployManifest, DeploySource, DeployState};
use snipdeck_publish::{deploy_all, BasicMinifier, FsPublisher, Minifier, Passthrough, PublishRequest};
use std::path::Path;
use tokio::runtime::Runtime;
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Deploy one snippet individually by id
    #[arg(long, conflicts_with_all = ["group", "all"])]
    pub id: Option<Uuid>,

    /// Deploy one group by key (e.g. css-head-all)
    #[arg(long, conflicts_with = "all")]
    pub group: Option<GroupKey>,

    /// Deploy every computed group
    #[arg(long)]
    pub all: bool,
}

pub fn handle_deploy(args: DeployArgs, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(deploy(args, format, config_path))
}

async fn deploy(args: DeployArgs, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let store = open_store(&manager)?;
    let root = publish_root(&manager)?;

    let requests: Vec<PublishRequest> = if let Some(id) = args.id {
        let snippet = store
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("Snippet not found: {}", id))?;
        vec![PublishRequest::from_snippet(snippet)]
    } else if let Some(key) = args.group {
        let group = store
            .groups()
            .iter()
            .find(|g| g.key == key)
            .ok_or_else(|| anyhow::anyhow!("No group with key: {}", key))?;
        vec![PublishRequest::from_group(group)]
    } else if args.all {
        store.groups().iter().map(PublishRequest::from_group).collect()
    } else {
        anyhow::bail!("Specify what to deploy: --id <id>, --group <key> or --all");
    };

    if requests.is_empty() {
        println!("Nothing to deploy.");
        return Ok(());
    }

    let minifier: Box<dyn Minifier> = if manager.config().auto_minify {
        Box::new(BasicMinifier)
    } else {
        Box::new(Passthrough)
    };
    let publisher = FsPublisher::new(root, manager.config().base_url.clone(), minifier);

    if !format.is_json() {
        println!("Deploying {} file(s)...", requests.len());
    }

    let outcome = deploy_all(
        &publisher,
        requests,
        manager.config().deploy_delay(),
        manager.config().publish_timeout(),
    )
    .await;

    if format.is_json() {
        let failed: Vec<_> = outcome
            .failed
            .iter()
            .map(|f| serde_json::json!({"filename": f.filename, "error": f.error.to_string()}))
            .collect();
        let summary = serde_json::json!({
            "deployed": outcome.deployed,
            "failed": failed,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for receipt in &outcome.deployed {
            println!(
                "{} {} -> {} ({} bytes)",
                "✓".green(),
                receipt.filename,
                receipt.url,
                receipt.size
            );
        }
        for failure in &outcome.failed {
            println!("{} {}: {}", "✗".red(), failure.filename, failure.error);
        }
        println!(
            "\nDeployed {} file(s), {} failed",
            outcome.deployed.len(),
            outcome.failed.len()
        );
    }

    if !outcome.failed.is_empty() {
        anyhow::bail!("{} deploy(s) failed", outcome.failed.len());
    }

    Ok(())
}

pub fn status(format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let store = open_store(&manager)?;
    let manifest = load_manifest(&manager)?;

    if format.is_json() {
        let rows: Vec<_> = store
            .list()
            .iter()
            .map(|snippet| {
                let entry = manifest.get(snippet.id);
                serde_json::json!({
                    "id": snippet.id,
                    "name": snippet.name,
                    "state": manifest.deploy_state(snippet),
                    "deployedAt": entry.map(|e| e.deployed_at),
                    "url": entry.map(|e| e.url.clone()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if store.list().is_empty() {
        println!("No snippets registered.");
        return Ok(());
    }

    println!("\nDeploy Status:");
    println!("{}", "=".repeat(60));

    for snippet in store.list() {
        let state = manifest.deploy_state(snippet);
        let marker = match state {
            DeployState::Current => "✓".green(),
            DeployState::Stale => "~".yellow(),
            DeployState::NeverDeployed => "·".bright_black(),
        };
        println!("\n{} {} - {}", marker, snippet.name, state.display_name());

        if let Some(entry) = manifest.get(snippet.id) {
            println!(
                "  Deployed: {} ({} bytes)",
                entry.deployed_at.format("%Y-%m-%d %H:%M:%S"),
                entry.size
            );
            println!("  URL: {}", entry.url);
        }
    }
    Ok(())
}

pub fn history(limit: usize, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let manifest = load_manifest(&manager)?;
    let entries = snipdeck_manifest::history(&manifest, limit);

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No deploys recorded.");
        return Ok(());
    }

    println!("\nDeploy History (latest {}):", limit);
    println!("{}", "=".repeat(60));

    for entry in entries {
        let source = match entry.source {
            DeploySource::LocalDeploy => "local",
            DeploySource::GithubSync => "synced",
        };
        println!("\n{} ({})", entry.filename, source);
        println!(
            "  {} | {} bytes",
            entry.deployed_at.format("%Y-%m-%d %H:%M:%S"),
            entry.size
        );
    }
    Ok(())
}

pub fn analytics(format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let manifest = load_manifest(&manager)?;

    let totals = snipdeck_manifest::totals(&manifest);
    let metrics = snipdeck_manifest::metrics(&manifest, Utc::now());

    if format.is_json() {
        let summary = serde_json::json!({
            "totals": totals,
            "metrics": metrics,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("\nDeploy Analytics");
    println!("================\n");
    println!(
        "  Files: {} ({} css, {} js)",
        totals.total, totals.css, totals.js
    );
    println!("  Total size: {} bytes", totals.size);
    println!(
        "  Local deploys: {}, synced: {}",
        totals.local_deploys, totals.github_synced
    );

    if totals.total == 0 {
        return Ok(());
    }

    println!("\n  Average file size: {:.0} bytes", metrics.avg_file_size);
    if let Some(largest) = &metrics.largest_file {
        println!("  Largest: {} ({} bytes)", largest.name, largest.size);
    }
    if let Some(smallest) = &metrics.smallest_file {
        println!("  Smallest: {} ({} bytes)", smallest.name, smallest.size);
    }
    println!("  Deploy frequency: {:.1}/day", metrics.deploy_frequency);
    Ok(())
}

pub fn sync(format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let root = publish_root(&manager)?;
    let assets_dir = root.join("assets");

    let mut manifest = load_manifest(&manager)?;
    let report = snipdeck_manifest::sync_manifest(
        &mut manifest,
        &assets_dir,
        &manager.config().base_url,
    )
    .with_context(|| format!("Failed to sync against {}", assets_dir.display()))?;

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} Synced manifest with {}", "✓".green(), assets_dir.display());
    println!("  Kept: {}", report.kept);
    println!("  Added: {}", report.added);
    println!("  Dropped: {}", report.dropped);
    Ok(())
}

fn load_manifest(manager: &ConfigManager) -> Result<DeployManifest> {
    let root = publish_root(manager)?;
    DeployManifest::load(&DeployManifest::path_in(&root)).context("Failed to load deploy manifest")
}
