//! Core data types for the snippet dashboard.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The language of a snippet, which decides both the generated file
/// extension and the HTML tag used to embed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetKind {
    /// Stylesheet content, embedded with a `<link>` tag
    Css,
    /// Script content, embedded with a `<script>` tag
    Js,
}

impl SnippetKind {
    /// Returns all kinds in a consistent order
    pub fn all() -> &'static [SnippetKind] {
        &[SnippetKind::Css, SnippetKind::Js]
    }

    /// Returns the display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            SnippetKind::Css => "CSS (styles)",
            SnippetKind::Js => "JavaScript (behavior)",
        }
    }

    /// Returns the lowercase name for CLI parsing and group keys
    pub fn cli_name(&self) -> &'static str {
        match self {
            SnippetKind::Css => "css",
            SnippetKind::Js => "js",
        }
    }

    /// Returns the file extension used for generated assets
    pub fn extension(&self) -> &'static str {
        match self {
            SnippetKind::Css => "css",
            SnippetKind::Js => "js",
        }
    }

    /// Parse from CLI string
    pub fn from_cli_name(s: &str) -> Option<Self> {
        Self::all().iter().find(|k| k.cli_name() == s).copied()
    }
}

/// Injection point of a snippet within the storefront page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Inside `<head>`
    Head,
    /// Just before `</body>`
    Footer,
}

impl Location {
    /// Returns all locations in a consistent order
    pub fn all() -> &'static [Location] {
        &[Location::Head, Location::Footer]
    }

    /// Returns the display name for this location
    pub fn display_name(&self) -> &'static str {
        match self {
            Location::Head => "Head (<head>)",
            Location::Footer => "Footer (before </body>)",
        }
    }

    /// Returns the lowercase name for CLI parsing and group keys
    pub fn cli_name(&self) -> &'static str {
        match self {
            Location::Head => "head",
            Location::Footer => "footer",
        }
    }

    /// Parse from CLI string
    pub fn from_cli_name(s: &str) -> Option<Self> {
        Self::all().iter().find(|l| l.cli_name() == s).copied()
    }
}

/// Which storefront pages a snippet targets.
///
/// Each scope carries a display label and a default sort priority; the
/// priority orders groups in listings (lower means earlier) and can be
/// overridden per page through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageScope {
    /// Every page of the store
    All,
    /// The landing page
    Home,
    /// Product detail pages
    Product,
    /// Category listing pages
    Category,
    /// The cart page
    Cart,
    /// The checkout flow
    Checkout,
    /// The customer account area
    Account,
}

impl PageScope {
    /// Returns all page scopes in a consistent order
    pub fn all() -> &'static [PageScope] {
        &[
            PageScope::All,
            PageScope::Home,
            PageScope::Product,
            PageScope::Category,
            PageScope::Cart,
            PageScope::Checkout,
            PageScope::Account,
        ]
    }

    /// Returns the display label for this scope
    pub fn label(&self) -> &'static str {
        match self {
            PageScope::All => "🌐 All pages",
            PageScope::Home => "🏠 Home page",
            PageScope::Product => "📦 Product pages",
            PageScope::Category => "📂 Category pages",
            PageScope::Cart => "🛒 Cart page",
            PageScope::Checkout => "💳 Checkout",
            PageScope::Account => "👤 Customer account",
        }
    }

    /// Returns the default sort priority (lower sorts earlier)
    pub fn priority(&self) -> u8 {
        match self {
            PageScope::All => 1,
            PageScope::Home => 2,
            PageScope::Product => 2,
            PageScope::Category => 3,
            PageScope::Cart => 3,
            PageScope::Checkout => 4,
            PageScope::Account => 4,
        }
    }

    /// Returns the lowercase name for CLI parsing and group keys
    pub fn cli_name(&self) -> &'static str {
        match self {
            PageScope::All => "all",
            PageScope::Home => "home",
            PageScope::Product => "product",
            PageScope::Category => "category",
            PageScope::Cart => "cart",
            PageScope::Checkout => "checkout",
            PageScope::Account => "account",
        }
    }

    /// Parse from CLI string
    pub fn from_cli_name(s: &str) -> Option<Self> {
        Self::all().iter().find(|p| p.cli_name() == s).copied()
    }
}

/// One registered CSS/JS fragment with its placement metadata.
///
/// Serialized field names follow the historical dashboard store format
/// (`type`, `createdAt`, `updatedAt`) so existing store files load as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Opaque unique id, assigned at creation and never reused.
    pub id: Uuid,
    /// Human label shown in listings.
    pub name: String,
    /// Raw CSS/JS source text.
    pub content: String,
    #[serde(rename = "type")]
    pub kind: SnippetKind,
    pub location: Location,
    pub pages: PageScope,
    /// Inactive snippets are kept but excluded from groups and stats.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Snippet {
    /// The partition key this snippet groups under.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            kind: self.kind,
            location: self.location,
            pages: self.pages,
        }
    }
}

/// The mutable fields of a snippet, as submitted on create or edit.
#[derive(Debug, Clone)]
pub struct SnippetDraft {
    pub name: String,
    pub content: String,
    pub kind: SnippetKind,
    pub location: Location,
    pub pages: PageScope,
    pub active: bool,
}

/// Partition identity of a group: the (kind, location, pages) triple.
///
/// Rendered as `{kind}-{location}-{pages}` (e.g. `css-head-all`). The
/// separator cannot occur inside any component name, so distinct triples
/// always render to distinct strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub kind: SnippetKind,
    pub location: Location,
    pub pages: PageScope,
}

impl GroupKey {
    /// The key a snippet partitions under.
    pub fn of(snippet: &Snippet) -> Self {
        snippet.group_key()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.kind.cli_name(),
            self.location.cli_name(),
            self.pages.cli_name()
        )
    }
}

impl FromStr for GroupKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidGroupKey {
            value: s.to_string(),
        };

        let mut parts = s.split('-');
        let kind = parts
            .next()
            .and_then(SnippetKind::from_cli_name)
            .ok_or_else(invalid)?;
        let location = parts
            .next()
            .and_then(Location::from_cli_name)
            .ok_or_else(invalid)?;
        let pages = parts
            .next()
            .and_then(PageScope::from_cli_name)
            .ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(GroupKey {
            kind,
            location,
            pages,
        })
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A derived bundle of all active snippets sharing one group key.
///
/// Groups are recomputed from scratch on every store mutation and never
/// persisted; the key doubles as the stable `id` in serialized output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(rename = "id")]
    pub key: GroupKey,
    #[serde(rename = "type")]
    pub kind: SnippetKind,
    pub location: Location,
    pub pages: PageScope,
    /// Member snippets in store order.
    pub codes: Vec<Snippet>,
    /// Deterministic asset filename for this group.
    pub filename: String,
    /// Sum of member content lengths, in bytes.
    pub total_size: usize,
    /// Estimated minified size (fixed 70%-reduction heuristic).
    pub minified_size: usize,
}

impl Group {
    /// Human-readable identity shown in listings and suggestions.
    pub fn display_name(&self) -> String {
        format!(
            "{} • {} • {}",
            self.kind.display_name(),
            self.location.display_name(),
            self.pages.label()
        )
    }
}

/// Heuristic performance estimate for serving a set of snippets as one
/// grouped, minified, CDN-hosted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceGain {
    /// Combined raw content length, in bytes.
    pub original_size: usize,
    /// Estimated size after minification.
    pub minified_size: usize,
    /// Percentage saved by minification alone.
    pub compression_gain: u8,
    /// Overall estimate including the assumed CDN benefit, capped at 85.
    pub total_gain: u8,
    /// How many fewer requests the browser makes when grouped.
    pub files_reduced: usize,
}

/// Whether a candidate snippet would join an existing group or open a new
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// A group with the same key already exists
    ExistingGroup,
    /// No group matches; a new one would be created
    NewGroup,
}

/// Grouping prediction for a candidate snippet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Key of the matched group, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_key: Option<GroupKey>,
    /// Current member count of the matched group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_count: Option<usize>,
    pub performance_gain: PerformanceGain,
    /// Sentence shown in the creation wizard.
    pub message: String,
}

/// Dashboard summary counters over the active snippet set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_active_codes: usize,
    pub total_active_groups: usize,
    /// Estimated minified size of all active content, in bytes.
    pub total_minified_size: usize,
    /// Percentage estimate, 0 when there is no active content.
    pub estimated_performance_gain: u8,
}
