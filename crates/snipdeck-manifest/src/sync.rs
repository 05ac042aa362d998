//! Reconcile the manifest against the files actually present in the
//! published asset tree.
//!
//! Assets on disk win: files the manifest does not know get fresh entries,
//! known files keep their identity, and entries whose file vanished are
//! dropped unless they came from a local deploy.

use crate::error::Result;
use crate::manifest::{DeployManifest, DeploySource, ManifestEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use snipdeck_core::SnippetKind;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Outcome of one sync pass.
///
/// `kept + dropped` is the entry count before the pass, `kept + added`
/// the count after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub kept: usize,
    pub added: usize,
    pub dropped: usize,
}

/// Walk `assets_dir` and rebuild the manifest from what is actually there.
///
/// Known filenames keep their id, name and deploy timestamp; size and url
/// are refreshed and the entry is stamped as synced. Unknown `.css`/`.js`
/// files get new entries named after the file. Entries whose file is gone
/// are dropped, except local deploys, which are kept as-is.
pub fn sync_manifest(
    manifest: &mut DeployManifest,
    assets_dir: &Path,
    base_url: &str,
) -> Result<SyncReport> {
    let previous = manifest.entry_map().clone();
    let mut next: BTreeMap<Uuid, ManifestEntry> = BTreeMap::new();
    let mut report = SyncReport::default();

    for dir_entry in fs::read_dir(assets_dir)? {
        let dir_entry = dir_entry?;
        let metadata = dir_entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let file_name = match dir_entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        let kind = match Path::new(&file_name).extension().and_then(|ext| ext.to_str()) {
            Some("css") => SnippetKind::Css,
            Some("js") => SnippetKind::Js,
            _ => continue,
        };

        let url = format!("{base_url}/{file_name}");
        match previous.values().find(|entry| entry.filename == file_name) {
            Some(existing) => {
                let mut entry = existing.clone();
                entry.url = url;
                entry.size = metadata.len();
                entry.source = DeploySource::GithubSync;
                tracing::debug!(filename = %file_name, "sync: known asset");
                next.insert(entry.id, entry);
                report.kept += 1;
            }
            None => {
                let deployed_at = metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                let entry = ManifestEntry {
                    id: Uuid::new_v4(),
                    name: display_name(&file_name),
                    filename: file_name.clone(),
                    kind,
                    url,
                    deployed_at,
                    size: metadata.len(),
                    content_hash: None,
                    source: DeploySource::GithubSync,
                };
                tracing::info!(filename = %file_name, id = %entry.id, "sync: discovered asset");
                next.insert(entry.id, entry);
                report.added += 1;
            }
        }
    }

    for (id, entry) in &previous {
        if next.contains_key(id) {
            continue;
        }
        match entry.source {
            DeploySource::LocalDeploy => {
                tracing::debug!(filename = %entry.filename, "sync: keeping local deploy without asset");
                next.insert(*id, entry.clone());
                report.kept += 1;
            }
            DeploySource::GithubSync => {
                tracing::info!(filename = %entry.filename, "sync: dropping vanished asset");
                report.dropped += 1;
            }
        }
    }

    // Skip the write when nothing changed so manifest watchers see no
    // mtime churn from a no-op sync.
    if next != previous {
        manifest.replace_entries(next);
        manifest.save()?;
    }

    Ok(report)
}

/// Readable asset name from a published filename, e.g.
/// `header-styles.min.css` becomes `Header Styles`.
fn display_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename);
    let stem = stem.strip_suffix(".min").unwrap_or(stem);

    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
