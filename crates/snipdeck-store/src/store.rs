//! The persisted snippet collection and its derived state.

use crate::error::{Result, StoreError};
use chrono::Utc;
use snipdeck_core::{
    compute_groups, compute_stats, validate_draft, DashboardStats, Group, PagePriorities, Snippet,
    SnippetDraft,
};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Store for registered snippets.
///
/// Owns the snippet list plus the groups and stats derived from it. Every
/// mutation recomputes the derived state synchronously and persists the
/// snippet list to a single JSON file with an atomic temp-file-then-rename
/// write.
pub struct SnippetStore {
    path: PathBuf,
    snippets: Vec<Snippet>,
    priorities: PagePriorities,
    groups: Vec<Group>,
    stats: DashboardStats,
}

impl SnippetStore {
    /// Get the default store path (~/.snipdeck/store.json)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(StoreError::HomeNotFound)?;
        Ok(home.join(".snipdeck").join("store.json"))
    }

    /// Open the store at `path`.
    ///
    /// Fail-open: a missing file yields an empty store, and a corrupt file
    /// logs a warning and also yields an empty store. The file is only
    /// rewritten on the next mutation.
    pub fn open(path: &Path, priorities: PagePriorities) -> Result<Self> {
        let snippets = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Vec<Snippet>>(&contents) {
                Ok(snippets) => snippets,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "corrupt store file, starting empty");
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        let mut store = Self {
            path: path.to_path_buf(),
            snippets,
            priorities,
            groups: Vec::new(),
            stats: DashboardStats {
                total_active_codes: 0,
                total_active_groups: 0,
                total_minified_size: 0,
                estimated_performance_gain: 0,
            },
        };
        store.recompute();
        Ok(store)
    }

    /// Save the snippet list to disk atomically.
    ///
    /// Writes a temporary file next to the target and renames it over, so
    /// a crash mid-write never leaves a truncated store.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.snippets)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Path of the backing store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All snippets in store order, inactive ones included.
    pub fn list(&self) -> &[Snippet] {
        &self.snippets
    }

    /// Look up one snippet by id.
    pub fn get(&self, id: Uuid) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// Current groups, recomputed on the last mutation.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Current dashboard stats, recomputed on the last mutation.
    pub fn stats(&self) -> DashboardStats {
        self.stats
    }

    /// Create a snippet from a validated draft.
    pub fn create(&mut self, draft: SnippetDraft) -> Result<Snippet> {
        validate_draft(&draft)?;

        let now = Utc::now();
        let snippet = Snippet {
            id: Uuid::new_v4(),
            name: draft.name,
            content: draft.content,
            kind: draft.kind,
            location: draft.location,
            pages: draft.pages,
            active: draft.active,
            created_at: now,
            updated_at: now,
        };

        self.snippets.push(snippet.clone());
        self.commit()?;
        tracing::debug!(id = %snippet.id, "snippet created");
        Ok(snippet)
    }

    /// Replace the mutable fields of an existing snippet.
    ///
    /// The id and creation timestamp are preserved; `updated_at` is
    /// refreshed.
    pub fn update(&mut self, id: Uuid, draft: SnippetDraft) -> Result<Snippet> {
        validate_draft(&draft)?;

        let snippet = self
            .snippets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;

        snippet.name = draft.name;
        snippet.content = draft.content;
        snippet.kind = draft.kind;
        snippet.location = draft.location;
        snippet.pages = draft.pages;
        snippet.active = draft.active;
        snippet.updated_at = Utc::now();
        let updated = snippet.clone();

        self.commit()?;
        Ok(updated)
    }

    /// Remove a snippet entirely.
    pub fn remove(&mut self, id: Uuid) -> Result<Snippet> {
        let index = self
            .snippets
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let removed = self.snippets.remove(index);
        self.commit()?;
        tracing::debug!(id = %removed.id, "snippet removed");
        Ok(removed)
    }

    /// Activate or deactivate a snippet without deleting it.
    pub fn set_active(&mut self, id: Uuid, active: bool) -> Result<Snippet> {
        let snippet = self
            .snippets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;

        snippet.active = active;
        snippet.updated_at = Utc::now();
        let updated = snippet.clone();

        self.commit()?;
        Ok(updated)
    }

    /// Flip a snippet's active flag.
    pub fn toggle(&mut self, id: Uuid) -> Result<Snippet> {
        let active = self.get(id).ok_or(StoreError::NotFound(id))?.active;
        self.set_active(id, !active)
    }

    /// Write the snippet list to `path` as pretty JSON.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snippets)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Replace the store contents with the snippets in `path`.
    ///
    /// Strict, all-or-nothing: a missing file, unparsable JSON or any
    /// invalid entry rejects the whole import and leaves the store
    /// untouched. Returns the number of imported snippets.
    pub fn import_from(&mut self, path: &Path) -> Result<usize> {
        let contents = fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StoreError::ImportNotFound(path.to_path_buf())
            } else {
                StoreError::Io(err)
            }
        })?;
        let snippets: Vec<Snippet> = serde_json::from_str(&contents)?;

        for snippet in &snippets {
            validate_draft(&SnippetDraft {
                name: snippet.name.clone(),
                content: snippet.content.clone(),
                kind: snippet.kind,
                location: snippet.location,
                pages: snippet.pages,
                active: snippet.active,
            })?;
        }

        let count = snippets.len();
        self.snippets = snippets;
        self.commit()?;
        tracing::debug!(count, "store imported");
        Ok(count)
    }

    /// Recompute derived state, then persist.
    fn commit(&mut self) -> Result<()> {
        self.recompute();
        self.save()
    }

    fn recompute(&mut self) {
        self.groups = compute_groups(&self.snippets, &self.priorities);
        self.stats = compute_stats(&self.snippets, &self.priorities);
    }
}
