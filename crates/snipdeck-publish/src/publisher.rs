//! The publish contract: request in, receipt out.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use snipdeck_core::{filenames, Group, Snippet, SnippetKind};
use uuid::Uuid;

/// One asset to publish, already flattened to filename plus content.
///
/// `manifest_id` is the identity the deploy is recorded under: a
/// snippet's own id, or a stable id derived from the group key so that
/// redeploying a group replaces its previous manifest entry.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub manifest_id: Uuid,
    pub name: String,
    pub filename: String,
    pub kind: SnippetKind,
    /// Raw content; minification happens inside the publisher.
    pub content: String,
}

impl PublishRequest {
    /// Request for one snippet on its own.
    pub fn from_snippet(snippet: &Snippet) -> Self {
        Self {
            manifest_id: snippet.id,
            name: snippet.name.clone(),
            filename: filenames::snippet_filename(&snippet.name, &snippet.id, snippet.kind),
            kind: snippet.kind,
            content: snippet.content.clone(),
        }
    }

    /// Request for a whole group, members concatenated in group order.
    pub fn from_group(group: &Group) -> Self {
        let content = group
            .codes
            .iter()
            .map(|snippet| snippet.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            manifest_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, group.key.to_string().as_bytes()),
            name: group.display_name(),
            filename: group.filename.clone(),
            kind: group.kind,
            content,
        }
    }
}

/// Confirmation of a completed publish.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReceipt {
    pub filename: String,
    /// Public URL the asset is now served from.
    pub url: String,
    /// Bytes written, after minification.
    pub size: u64,
    pub deployed_at: DateTime<Utc>,
}

/// Something that can take an asset live.
///
/// Implementations must leave no partial state behind on failure for the
/// request being published; earlier completed publishes stay in place.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt>;
}
