//! Deterministic asset filenames.
//!
//! Both formats are CDN-facing compatibility surfaces and must never
//! change shape: `{kind}-{location}-{pages_slug}.min.{ext}` for grouped
//! assets, `{name_slug}-{short_id}.min.{ext}` for individually deployed
//! snippets.

use crate::types::{Location, PageScope, SnippetKind};
use uuid::Uuid;

/// How many id characters an individual filename embeds.
const SHORT_ID_LEN: usize = 8;

/// Slug of a page label: emoji and whitespace stripped, lowercased.
///
/// Implemented as a filter to ASCII alphanumerics, which drops the emoji,
/// the spaces and any punctuation in one pass.
pub fn pages_slug(pages: PageScope) -> String {
    pages
        .label()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Slug of a snippet name: lowercased, runs of non-alphanumerics become a
/// single `-`, leading/trailing dashes trimmed.
pub fn name_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Filename of a grouped asset.
pub fn group_filename(kind: SnippetKind, location: Location, pages: PageScope) -> String {
    format!(
        "{}-{}-{}.min.{}",
        kind.cli_name(),
        location.cli_name(),
        pages_slug(pages),
        kind.extension()
    )
}

/// Filename of an individually deployed snippet.
pub fn snippet_filename(name: &str, id: &Uuid, kind: SnippetKind) -> String {
    let full_id = id.to_string();
    format!(
        "{}-{}.min.{}",
        name_slug(name),
        &full_id[..SHORT_ID_LEN],
        kind.extension()
    )
}
