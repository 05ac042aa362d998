//! Snippet management commands: the store, groups and previews.

use crate::commands::{load_config, open_store};
use crate::OutputFormat;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;
use colored::*;
use snipdeck_core::{
    detect_kind, embed_tag, Group, GroupKey, Location, PageScope, Snippet, SnippetDraft,
    SnippetKind,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The creation-form fields shared by `add` and `suggest`.
#[derive(Args, Debug)]
pub struct SnippetInput {
    /// Display name for the snippet
    #[arg(short, long)]
    pub name: String,

    /// Inline snippet content
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,

    /// Read snippet content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Snippet kind: css or js (detected from content when omitted)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Injection location: head or footer
    #[arg(short, long, default_value = "head")]
    pub location: String,

    /// Page scope: all, home, product, category, cart, checkout or account
    #[arg(short, long, default_value = "all")]
    pub pages: String,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub input: SnippetInput,

    /// Register the snippet as inactive
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Snippet id to edit
    pub id: Uuid,

    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// New inline content
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,

    /// Read new content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// New kind: css or js
    #[arg(long)]
    pub kind: Option<String>,

    /// New location: head or footer
    #[arg(long)]
    pub location: Option<String>,

    /// New page scope
    #[arg(long)]
    pub pages: Option<String>,
}

pub fn add(args: AddArgs, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let mut store = open_store(&manager)?;

    let draft = build_draft(args.input, !args.inactive)?;
    let snippet = store.create(draft).context("Failed to add snippet")?;

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&snippet)?);
        return Ok(());
    }

    println!(
        "{} Added snippet: {} ({})",
        "✓".green(),
        snippet.name,
        snippet.id
    );
    println!("  Kind: {}", snippet.kind.display_name());
    println!("  Location: {}", snippet.location.display_name());
    println!("  Pages: {}", snippet.pages.label());

    if snippet.active {
        if let Some(group) = store.groups().iter().find(|g| g.key == snippet.group_key()) {
            println!(
                "  Group: {} ({} snippet(s) -> {})",
                group.key,
                group.codes.len(),
                group.filename
            );
        }
    } else {
        println!("  Inactive: excluded from groups until enabled");
    }

    Ok(())
}

pub fn list(format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let store = open_store(&manager)?;
    let snippets = store.list();

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(snippets)?);
        return Ok(());
    }

    if snippets.is_empty() {
        println!("No snippets registered.");
        println!("Add one with: snipdeck add --name <name> --content <css-or-js>");
        return Ok(());
    }

    println!("\nRegistered Snippets:");
    println!("{}", "=".repeat(60));

    for snippet in snippets {
        let marker = if snippet.active {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("\n{} {} ({})", marker, snippet.name, snippet.id);
        println!(
            "  {} | {} | {}",
            snippet.kind.display_name(),
            snippet.location.display_name(),
            snippet.pages.label()
        );
        println!(
            "  {} bytes, updated {}",
            snippet.content.len(),
            snippet.updated_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    println!("\nTotal: {} snippet(s)", snippets.len());
    Ok(())
}

pub fn edit(args: EditArgs, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let mut store = open_store(&manager)?;

    let existing = store
        .get(args.id)
        .ok_or_else(|| anyhow::anyhow!("Snippet not found: {}", args.id))?
        .clone();

    let content = match (args.content, args.file) {
        (None, None) => existing.content.clone(),
        (content, file) => resolve_content(content, file)?,
    };

    let draft = SnippetDraft {
        name: args.name.unwrap_or(existing.name),
        content,
        kind: match args.kind.as_deref() {
            Some(kind) => parse_kind(kind)?,
            None => existing.kind,
        },
        location: match args.location.as_deref() {
            Some(location) => parse_location(location)?,
            None => existing.location,
        },
        pages: match args.pages.as_deref() {
            Some(pages) => parse_pages(pages)?,
            None => existing.pages,
        },
        active: existing.active,
    };

    let snippet = store
        .update(args.id, draft)
        .context("Failed to update snippet")?;

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&snippet)?);
        return Ok(());
    }

    println!(
        "{} Updated snippet: {} ({})",
        "✓".green(),
        snippet.name,
        snippet.id
    );
    Ok(())
}

pub fn remove(
    id: Uuid,
    skip_confirm: bool,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> Result<()> {
    let manager = load_config(config_path)?;
    let mut store = open_store(&manager)?;

    let snippet = store
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Snippet not found: {}", id))?;

    if !skip_confirm {
        println!("Remove snippet '{}'?", snippet.name);
        println!("  Kind: {}", snippet.kind.display_name());
        println!("  Size: {} bytes", snippet.content.len());
        print!("\nContinue? [y/N] ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = store.remove(id).context("Failed to remove snippet")?;

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&removed)?);
        return Ok(());
    }

    println!(
        "{} Removed snippet: {} ({})",
        "✓".green(),
        removed.name,
        removed.id
    );
    Ok(())
}

pub fn set_active(
    id: Uuid,
    active: bool,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> Result<()> {
    let manager = load_config(config_path)?;
    let mut store = open_store(&manager)?;

    let snippet = store.set_active(id, active).context(if active {
        "Failed to enable snippet"
    } else {
        "Failed to disable snippet"
    })?;

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&snippet)?);
        return Ok(());
    }

    if active {
        println!("{} Enabled snippet: {}", "✓".green(), snippet.name);
    } else {
        println!(
            "{} Disabled snippet: {} (kept, excluded from groups)",
            "✓".green(),
            snippet.name
        );
    }
    Ok(())
}

pub fn groups(format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let store = open_store(&manager)?;
    let groups = store.groups();

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No active snippets, so no groups.");
        return Ok(());
    }

    println!("\nAsset Groups:");
    println!("{}", "=".repeat(60));

    for group in groups {
        println!("\n{} ({})", group.display_name(), group.key);
        println!("  File: {}", group.filename);
        println!("  Snippets: {}", group.codes.len());
        for snippet in &group.codes {
            println!("    - {}", snippet.name);
        }
        println!(
            "  Size: {} bytes -> ~{} bytes minified",
            group.total_size, group.minified_size
        );
    }

    println!("\nTotal: {} group(s)", groups.len());
    Ok(())
}

pub fn tags(
    group_key: Option<GroupKey>,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> Result<()> {
    let manager = load_config(config_path)?;
    let store = open_store(&manager)?;
    let base_url = &manager.config().base_url;

    let selected: Vec<&Group> = match group_key {
        Some(key) => {
            let group = store
                .groups()
                .iter()
                .find(|g| g.key == key)
                .ok_or_else(|| anyhow::anyhow!("No group with key: {}", key))?;
            vec![group]
        }
        None => store.groups().iter().collect(),
    };

    if format.is_json() {
        let tags: Vec<_> = selected
            .iter()
            .map(|group| {
                serde_json::json!({
                    "group": group.key.to_string(),
                    "filename": group.filename,
                    "tag": embed_tag(group, base_url),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&tags)?);
        return Ok(());
    }

    if selected.is_empty() {
        println!("No groups to embed.");
        return Ok(());
    }

    for group in selected {
        println!("\n{}", group.display_name());
        println!("  {}", embed_tag(group, base_url));
    }
    Ok(())
}

pub fn suggest(input: SnippetInput, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let store = open_store(&manager)?;

    let draft = build_draft(input, true)?;
    let candidate = Snippet {
        id: Uuid::new_v4(),
        name: draft.name,
        content: draft.content,
        kind: draft.kind,
        location: draft.location,
        pages: draft.pages,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let suggestion = snipdeck_core::suggest(&candidate, store.groups());

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
        return Ok(());
    }

    println!("\n{}", suggestion.message);

    let gain = &suggestion.performance_gain;
    println!("\nEstimated impact:");
    println!(
        "  Size: {} bytes -> ~{} bytes minified",
        gain.original_size, gain.minified_size
    );
    println!("  Compression gain: {}%", gain.compression_gain);
    println!("  Total gain: {}%", gain.total_gain);
    println!("  Requests saved: {}", gain.files_reduced);

    if let (Some(key), Some(count)) = (suggestion.group_key, suggestion.member_count) {
        println!("\nJoins group {} with {} existing snippet(s).", key, count);
    }

    Ok(())
}

pub fn stats(format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let store = open_store(&manager)?;
    let stats = store.stats();

    if format.is_json() {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\nDashboard Stats");
    println!("===============\n");
    println!("  Active snippets: {}", stats.total_active_codes);
    println!("  Asset groups: {}", stats.total_active_groups);
    println!("  Minified size: ~{} bytes", stats.total_minified_size);
    println!("  Estimated gain: {}%", stats.estimated_performance_gain);
    Ok(())
}

pub fn export(path: PathBuf, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let store = open_store(&manager)?;

    store
        .export_to(&path)
        .with_context(|| format!("Failed to export to {}", path.display()))?;

    if format.is_json() {
        let summary = serde_json::json!({"exported": store.list().len(), "path": path});
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} Exported {} snippet(s) to {}",
        "✓".green(),
        store.list().len(),
        path.display()
    );
    Ok(())
}

pub fn import(path: PathBuf, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let manager = load_config(config_path)?;
    let mut store = open_store(&manager)?;

    let imported = store
        .import_from(&path)
        .with_context(|| format!("Failed to import from {}", path.display()))?;

    if format.is_json() {
        let summary = serde_json::json!({
            "imported": imported,
            "snippets": store.list().len(),
            "groups": store.groups().len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} Imported {} snippet(s)", "✓".green(), imported);
    println!(
        "  Snippets: {}, groups: {}",
        store.list().len(),
        store.groups().len()
    );
    Ok(())
}

fn resolve_content(content: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (content, file) {
        (Some(content), _) => Ok(content),
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => bail!("Provide snippet content with --content or --file"),
    }
}

fn build_draft(input: SnippetInput, active: bool) -> Result<SnippetDraft> {
    let content = resolve_content(input.content, input.file)?;
    let kind = match input.kind.as_deref() {
        Some(kind) => parse_kind(kind)?,
        None => detect_kind(&content),
    };

    Ok(SnippetDraft {
        name: input.name,
        content,
        kind,
        location: parse_location(&input.location)?,
        pages: parse_pages(&input.pages)?,
        active,
    })
}

fn parse_kind(s: &str) -> Result<SnippetKind> {
    SnippetKind::from_cli_name(s).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown kind '{}'. Valid kinds: {}",
            s,
            catalog(SnippetKind::all().iter().map(|k| k.cli_name()))
        )
    })
}

fn parse_location(s: &str) -> Result<Location> {
    Location::from_cli_name(s).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown location '{}'. Valid locations: {}",
            s,
            catalog(Location::all().iter().map(|l| l.cli_name()))
        )
    })
}

fn parse_pages(s: &str) -> Result<PageScope> {
    PageScope::from_cli_name(s).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown page scope '{}'. Valid scopes: {}",
            s,
            catalog(PageScope::all().iter().map(|p| p.cli_name()))
        )
    })
}

fn catalog<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}
