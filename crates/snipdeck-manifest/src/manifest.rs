//! The deploy manifest: snippet id → published asset record.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use snipdeck_core::{Snippet, SnippetKind};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// How an entry got into the manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploySource {
    /// Written by a publisher running on this machine
    #[default]
    LocalDeploy,
    /// Recovered from the published asset tree by a sync
    GithubSync,
}

/// One published asset, keyed by the snippet id it was published for.
///
/// Serialized field names follow the historical `index.json` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: Uuid,
    pub name: String,
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: SnippetKind,
    /// Public URL of the published asset.
    pub url: String,
    pub deployed_at: DateTime<Utc>,
    /// Bytes written, after minification.
    pub size: u64,
    /// Hex SHA-256 of the snippet content at deploy time. Entries
    /// recovered by sync have none, so their drift state is unknowable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub source: DeploySource,
}

/// Deploy status of a snippet, derived from the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployState {
    /// No manifest entry exists for the snippet
    NeverDeployed,
    /// An entry exists but the published content no longer matches
    Stale,
    /// The published content matches the snippet's current content
    Current,
}

impl DeployState {
    /// Short label for listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            DeployState::NeverDeployed => "never deployed",
            DeployState::Stale => "stale",
            DeployState::Current => "current",
        }
    }
}

/// Hex SHA-256 of snippet content, as recorded in manifest entries.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// The persisted manifest of published assets.
///
/// Backed by a single JSON object keyed by snippet id. Loading is
/// fail-open (missing or corrupt files yield an empty manifest); saving is
/// atomic via a temp file and rename.
#[derive(Debug)]
pub struct DeployManifest {
    path: PathBuf,
    entries: BTreeMap<Uuid, ManifestEntry>,
}

impl DeployManifest {
    /// Manifest location under a publish root (`assets/index.json`).
    pub fn path_in(publish_root: &Path) -> PathBuf {
        publish_root.join("assets").join("index.json")
    }

    /// Load the manifest at `path`, fail-open.
    pub fn load(path: &Path) -> Result<Self> {
        let entries = match fs::read_to_string(path) {
            Ok(contents) => parse_entries(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "corrupt manifest, starting empty");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Save the manifest atomically.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Path of the backing manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of published assets on record.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been published yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for one snippet id.
    pub fn get(&self, id: Uuid) -> Option<&ManifestEntry> {
        self.entries.get(&id)
    }

    /// Entry owning a published filename, if any.
    pub fn get_by_filename(&self, filename: &str) -> Option<&ManifestEntry> {
        self.entries.values().find(|e| e.filename == filename)
    }

    /// All entries, ordered by id.
    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.values()
    }

    /// Insert or replace the entry for `entry.id`.
    pub fn upsert(&mut self, entry: ManifestEntry) {
        self.entries.insert(entry.id, entry);
    }

    /// Drop the entry for `id`, returning it if present.
    pub fn remove(&mut self, id: Uuid) -> Option<ManifestEntry> {
        self.entries.remove(&id)
    }

    /// Replace the whole entry map (used by sync).
    pub(crate) fn replace_entries(&mut self, entries: BTreeMap<Uuid, ManifestEntry>) {
        self.entries = entries;
    }

    /// Raw entry map (used by sync).
    pub(crate) fn entry_map(&self) -> &BTreeMap<Uuid, ManifestEntry> {
        &self.entries
    }

    /// Deploy status of a snippet.
    ///
    /// No entry means never deployed. An entry with a matching content
    /// hash is current; a differing or absent hash reads as stale, so an
    /// edited snippet flips to stale without touching the manifest.
    pub fn deploy_state(&self, snippet: &Snippet) -> DeployState {
        match self.entries.get(&snippet.id) {
            None => DeployState::NeverDeployed,
            Some(entry) => match &entry.content_hash {
                Some(hash) if *hash == content_hash(&snippet.content) => DeployState::Current,
                _ => DeployState::Stale,
            },
        }
    }
}

/// Parse the raw entry map from manifest JSON.
pub(crate) fn parse_entries(
    contents: &str,
) -> std::result::Result<BTreeMap<Uuid, ManifestEntry>, serde_json::Error> {
    serde_json::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use snipdeck_core::{Location, PageScope};
    use tempfile::TempDir;

    fn test_entry(name: &str, filename: &str, content: Option<&str>) -> ManifestEntry {
        ManifestEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            filename: filename.to_string(),
            kind: SnippetKind::Css,
            url: format!("https://cdn.example.com/{filename}"),
            deployed_at: Utc::now(),
            size: 42,
            content_hash: content.map(content_hash),
            source: DeploySource::LocalDeploy,
        }
    }

    fn test_snippet(content: &str) -> Snippet {
        Snippet {
            id: Uuid::new_v4(),
            name: "entry".to_string(),
            content: content.to_string(),
            kind: SnippetKind::Css,
            location: Location::Head,
            pages: PageScope::All,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = DeployManifest::load(&temp_dir.path().join("index.json")).unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        fs::write(&path, "∞ not json").unwrap();

        let manifest = DeployManifest::load(&path).unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn upsert_save_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = DeployManifest::path_in(temp_dir.path());

        let mut manifest = DeployManifest::load(&path).unwrap();
        let entry = test_entry("Promo", "promo-a1b2c3d4.min.css", Some(".promo {}"));
        manifest.upsert(entry.clone());
        manifest.save().unwrap();

        let reloaded = DeployManifest::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(entry.id), Some(&entry));
        assert_eq!(
            reloaded.get_by_filename("promo-a1b2c3d4.min.css").unwrap().id,
            entry.id
        );
    }

    #[test]
    fn serialized_entries_use_historical_field_names() {
        let entry = test_entry("Promo", "promo.min.css", Some(".promo {}"));
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["type"], "css");
        assert!(json.get("deployedAt").is_some());
        assert!(json.get("contentHash").is_some());
        assert_eq!(json["source"], "local_deploy");
        assert!(json.get("deployed_at").is_none());
    }

    #[test]
    fn entries_without_source_read_as_local() {
        let raw = r#"{
            "0d9a2d6e-9c3e-4f6a-8d2b-4e8b44b0a111": {
                "id": "0d9a2d6e-9c3e-4f6a-8d2b-4e8b44b0a111",
                "name": "legacy",
                "filename": "legacy.min.js",
                "type": "js",
                "url": "https://cdn.example.com/legacy.min.js",
                "deployedAt": "2024-03-01T12:00:00Z",
                "size": 120
            }
        }"#;

        let entries = parse_entries(raw).unwrap();
        let entry = entries.values().next().unwrap();
        assert_eq!(entry.source, DeploySource::LocalDeploy);
        assert_eq!(entry.content_hash, None);
    }

    #[test]
    fn deploy_state_tracks_content_drift() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        let mut manifest = DeployManifest::load(&path).unwrap();

        let mut snippet = test_snippet(".promo { color: red; }");
        assert_eq!(manifest.deploy_state(&snippet), DeployState::NeverDeployed);

        let mut entry = test_entry("Promo", "promo.min.css", Some(&snippet.content));
        entry.id = snippet.id;
        manifest.upsert(entry);
        assert_eq!(manifest.deploy_state(&snippet), DeployState::Current);

        snippet.content = ".promo { color: blue; }".to_string();
        assert_eq!(manifest.deploy_state(&snippet), DeployState::Stale);
    }

    #[test]
    fn entries_without_hash_read_as_stale() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = DeployManifest::load(&temp_dir.path().join("index.json")).unwrap();

        let snippet = test_snippet(".x {}");
        let mut entry = test_entry("X", "x.min.css", None);
        entry.id = snippet.id;
        manifest.upsert(entry);

        assert_eq!(manifest.deploy_state(&snippet), DeployState::Stale);
    }

    #[test]
    fn content_hash_is_stable_hex_sha256() {
        let hash = content_hash("body { margin: 0; }");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, content_hash("body { margin: 0; }"));
        assert_ne!(hash, content_hash("body { margin: 1; }"));
    }
}
