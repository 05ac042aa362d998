//! Read-only views over the manifest: counters, history, file metrics.

use crate::manifest::{DeployManifest, DeploySource, ManifestEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters over every published asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManifestTotals {
    pub total: usize,
    pub css: usize,
    pub js: usize,
    /// Combined size of all published assets, in bytes.
    pub size: u64,
    pub github_synced: usize,
    pub local_deploys: usize,
}

impl ManifestTotals {
    /// Tally counters over an entry set.
    pub fn of<'a>(entries: impl Iterator<Item = &'a ManifestEntry>) -> Self {
        let mut totals = Self::default();

        for entry in entries {
            totals.total += 1;
            match entry.kind {
                snipdeck_core::SnippetKind::Css => totals.css += 1,
                snipdeck_core::SnippetKind::Js => totals.js += 1,
            }
            totals.size += entry.size;
            match entry.source {
                DeploySource::GithubSync => totals.github_synced += 1,
                DeploySource::LocalDeploy => totals.local_deploys += 1,
            }
        }

        totals
    }
}

/// Counters for the whole manifest.
pub fn totals(manifest: &DeployManifest) -> ManifestTotals {
    ManifestTotals::of(manifest.entries())
}

/// The most recent deploys, newest first, at most `limit` of them.
pub fn history(manifest: &DeployManifest, limit: usize) -> Vec<&ManifestEntry> {
    let mut entries: Vec<&ManifestEntry> = manifest.entries().collect();
    entries.sort_by(|a, b| b.deployed_at.cmp(&a.deployed_at));
    entries.truncate(limit);
    entries
}

/// Name and size of a single asset, for largest/smallest reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileExtreme {
    /// Published filename of the asset.
    pub name: String,
    pub size: u64,
}

/// Aggregate file metrics over the manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ManifestMetrics {
    pub avg_file_size: f64,
    pub largest_file: Option<FileExtreme>,
    pub smallest_file: Option<FileExtreme>,
    /// Deploys per day since the earliest recorded deploy, with a floor
    /// of one day so a fresh manifest does not divide by zero.
    pub deploy_frequency: f64,
}

/// File metrics for the whole manifest. `now` anchors the frequency window.
pub fn metrics(manifest: &DeployManifest, now: DateTime<Utc>) -> ManifestMetrics {
    let entries: Vec<&ManifestEntry> = manifest.entries().collect();
    if entries.is_empty() {
        return ManifestMetrics::default();
    }

    let total_size: u64 = entries.iter().map(|e| e.size).sum();
    let avg_file_size = total_size as f64 / entries.len() as f64;

    let extreme = |entry: &ManifestEntry| FileExtreme {
        name: entry.filename.clone(),
        size: entry.size,
    };
    let largest_file = entries.iter().max_by_key(|e| e.size).map(|e| extreme(e));
    let smallest_file = entries.iter().min_by_key(|e| e.size).map(|e| extreme(e));

    let earliest = entries
        .iter()
        .map(|e| e.deployed_at)
        .min()
        .unwrap_or(now);
    let days = ((now - earliest).num_seconds() as f64 / 86_400.0).max(1.0);
    let deploy_frequency = entries.len() as f64 / days;

    ManifestMetrics {
        avg_file_size,
        largest_file,
        smallest_file,
        deploy_frequency,
    }
}
