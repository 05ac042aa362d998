//! Poll-based watcher over the publish root, for dashboards that want to
//! refresh while deploys happen elsewhere.
//!
//! Watches two files: the manifest (emitting fresh totals when its mtime
//! moves) and the deploy log (emitting each appended line).

use crate::analytics::ManifestTotals;
use crate::manifest::parse_entries;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Change notification from the publish root.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestEvent {
    /// The manifest file changed; `totals` reflects its new contents.
    FilesUpdated { totals: ManifestTotals },
    /// A line was appended to the deploy log.
    DeployLogged { line: String },
}

/// Background poller over the manifest and deploy log.
///
/// The poll task is aborted when the watcher is dropped. Baseline state is
/// captured before the task starts, so only changes made after `spawn`
/// returns produce events.
pub struct ManifestWatcher {
    sender: broadcast::Sender<ManifestEvent>,
    handle: JoinHandle<()>,
}

impl ManifestWatcher {
    /// Start polling. Must be called from within a tokio runtime.
    pub fn spawn(manifest_path: PathBuf, log_path: PathBuf, interval: Duration) -> Self {
        let (sender, _) = broadcast::channel(64);
        let event_tx = sender.clone();

        let mut manifest_mtime = modified_at(&manifest_path);
        let mut log_offset = file_len(&log_path);

        tracing::debug!(
            manifest = %manifest_path.display(),
            log = %log_path.display(),
            interval_ms = interval.as_millis() as u64,
            "manifest watcher started"
        );

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let mtime = modified_at(&manifest_path);
                if mtime != manifest_mtime {
                    manifest_mtime = mtime;
                    if let Some(totals) = read_totals(&manifest_path).await {
                        let _ = event_tx.send(ManifestEvent::FilesUpdated { totals });
                    }
                }

                let len = file_len(&log_path);
                if len < log_offset {
                    // Truncated or rotated, start over.
                    log_offset = 0;
                }
                if len > log_offset {
                    if let Ok(bytes) = tokio::fs::read(&log_path).await {
                        let tail = &bytes[log_offset.min(bytes.len())..];
                        // Only consume complete lines; a partially written
                        // line stays buffered until its newline arrives.
                        let consumed = match tail.iter().rposition(|b| *b == b'\n') {
                            Some(pos) => pos + 1,
                            None => 0,
                        };
                        for line in String::from_utf8_lossy(&tail[..consumed]).lines() {
                            let line = line.trim();
                            if !line.is_empty() {
                                let _ = event_tx.send(ManifestEvent::DeployLogged {
                                    line: line.to_string(),
                                });
                            }
                        }
                        log_offset += consumed;
                    }
                }
            }
        });

        Self { sender, handle }
    }

    /// New receiver for change events.
    pub fn subscribe(&self) -> broadcast::Receiver<ManifestEvent> {
        self.sender.subscribe()
    }
}

impl Drop for ManifestWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

fn file_len(path: &Path) -> usize {
    std::fs::metadata(path).map(|m| m.len() as usize).unwrap_or(0)
}

async fn read_totals(path: &Path) -> Option<ManifestTotals> {
    let contents = tokio::fs::read_to_string(path).await.ok()?;
    match parse_entries(&contents) {
        Ok(entries) => Some(ManifestTotals::of(entries.values())),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "unreadable manifest while watching");
            None
        }
    }
}
