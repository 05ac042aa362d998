//! Embed-tag generation for published groups.

use crate::types::{Group, SnippetKind};

/// Emits the HTML tag that loads `group` from the CDN.
///
/// `base_url` is the configured CDN root; the asset URL is always
/// `{base_url}/{filename}`. Pure formatting, no side effects.
pub fn embed_tag(group: &Group, base_url: &str) -> String {
    let url = format!("{}/{}", base_url, group.filename);
    match group.kind {
        SnippetKind::Css => format!(r#"<link rel="stylesheet" href="{url}">"#),
        SnippetKind::Js => format!(r#"<script src="{url}"></script>"#),
    }
}

/// Recovers the (kind, filename) pair from a tag produced by
/// [`embed_tag`]. Anything else yields `None`.
pub fn parse_embed_tag(tag: &str) -> Option<(SnippetKind, String)> {
    let tag = tag.trim();
    let (kind, attr) = if tag.starts_with("<link") {
        (SnippetKind::Css, r#"href=""#)
    } else if tag.starts_with("<script") {
        (SnippetKind::Js, r#"src=""#)
    } else {
        return None;
    };

    let start = tag.find(attr)? + attr.len();
    let rest = &tag[start..];
    let url = &rest[..rest.find('"')?];
    let filename = url.rsplit('/').next()?.to_string();
    if filename.is_empty() {
        return None;
    }

    Some((kind, filename))
}
