//! Draft validation and content-kind detection.

use crate::error::{Error, Result};
use crate::types::{SnippetDraft, SnippetKind};

/// Validates a draft before it reaches the store.
///
/// Name and content must be non-empty after trimming; the remaining fields
/// are closed enums and cannot hold invalid values. Rejection leaves no
/// partial state anywhere.
pub fn validate_draft(draft: &SnippetDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(Error::InvalidSnippet {
            message: "name must not be empty".to_string(),
        });
    }
    if draft.content.trim().is_empty() {
        return Err(Error::InvalidSnippet {
            message: "content must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Guesses the kind of pasted content.
///
/// Backs the creation form's auto-detect; an explicitly chosen kind always
/// wins. CSS wins ties and is the fallback for unrecognizable content.
pub fn detect_kind(content: &str) -> SnippetKind {
    if content.contains('{')
        && (content.contains(':') || content.contains("@media") || content.contains("!important"))
    {
        return SnippetKind::Css;
    }
    if content.contains("function")
        || content.contains("$(")
        || content.contains("document.")
        || content.contains("console.")
    {
        return SnippetKind::Js;
    }
    SnippetKind::Css
}
