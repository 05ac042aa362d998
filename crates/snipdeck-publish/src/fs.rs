//! Publisher writing into a local publish root.

use crate::error::Result;
use crate::minify::Minifier;
use crate::publisher::{PublishReceipt, PublishRequest, Publisher};
use async_trait::async_trait;
use chrono::Utc;
use snipdeck_manifest::{content_hash, DeployManifest, DeploySource, ManifestEntry};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Publishes assets into a directory tree shaped like the served CDN
/// root: minified files and the manifest under `assets/`, plus an
/// append-only `deploy.log` at the top.
pub struct FsPublisher {
    root: PathBuf,
    base_url: String,
    minifier: Box<dyn Minifier>,
}

impl FsPublisher {
    pub fn new(
        root: impl Into<PathBuf>,
        base_url: impl Into<String>,
        minifier: Box<dyn Minifier>,
    ) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
            minifier,
        }
    }

    /// The publish root this publisher writes into.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl Publisher for FsPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt> {
        let minified = self.minifier.minify(request.kind, &request.content);

        let assets_dir = self.root.join("assets");
        tokio::fs::create_dir_all(&assets_dir).await?;
        tokio::fs::write(assets_dir.join(&request.filename), minified.as_bytes()).await?;

        let size = minified.len() as u64;
        let deployed_at = Utc::now();
        let url = format!("{}/{}", self.base_url, request.filename);

        // The hash covers the original content, not the minified output,
        // so staleness checks compare like with like.
        let mut manifest = DeployManifest::load(&DeployManifest::path_in(&self.root))?;
        manifest.upsert(ManifestEntry {
            id: request.manifest_id,
            name: request.name.clone(),
            filename: request.filename.clone(),
            kind: request.kind,
            url: url.clone(),
            deployed_at,
            size,
            content_hash: Some(content_hash(&request.content)),
            source: DeploySource::LocalDeploy,
        });
        manifest.save()?;

        let log_line = format!(
            "[{}] Deploy: {}\n",
            deployed_at.format("%Y-%m-%d %H:%M:%S"),
            request.filename
        );
        let mut log = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join("deploy.log"))
            .await?;
        log.write_all(log_line.as_bytes()).await?;

        tracing::info!(filename = %request.filename, size, "deploy complete");

        Ok(PublishReceipt {
            filename: request.filename.clone(),
            url,
            size,
            deployed_at,
        })
    }
}
