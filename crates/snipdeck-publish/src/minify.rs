//! Size reduction applied to assets before they are written.
//!
//! These are whitespace-and-comment strippers, not parsers; they can
//! mangle string literals that contain comment markers. Use
//! [`Passthrough`] when content must be written untouched.

use regex::{Captures, Regex};
use snipdeck_core::SnippetKind;

/// Content transformation applied at publish time.
pub trait Minifier: Send + Sync {
    /// Rewrite `content` for publishing. Must be deterministic.
    fn minify(&self, kind: SnippetKind, content: &str) -> String;
}

/// Writes content exactly as submitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Minifier for Passthrough {
    fn minify(&self, _kind: SnippetKind, content: &str) -> String {
        content.to_string()
    }
}

/// Regex-based strip of comments and redundant whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicMinifier;

impl Minifier for BasicMinifier {
    fn minify(&self, kind: SnippetKind, content: &str) -> String {
        match kind {
            SnippetKind::Css => minify_css(content),
            SnippetKind::Js => minify_js(content),
        }
    }
}

fn minify_css(content: &str) -> String {
    let mut out = content.trim().to_string();

    if let Ok(re) = Regex::new(r"(?s)/\*.*?\*/") {
        out = re.replace_all(&out, "").into_owned();
    }
    if let Ok(re) = Regex::new(r"\s+") {
        out = re.replace_all(&out, " ").into_owned();
    }

    // Put rule openings, declarations and closings back on their own
    // lines so deployed stylesheets stay diffable.
    out = out.replace(" { ", " {\n");
    out = out.replace("; ", ";\n");
    out = out.replace(" }", "\n}");

    out.trim().to_string()
}

fn minify_js(content: &str) -> String {
    let mut out = content.trim().to_string();

    if let Ok(re) = Regex::new(r"(?m)//.*$") {
        out = re
            .replace_all(&out, |caps: &Captures| strip_unless_important(&caps[0]))
            .into_owned();
    }
    if let Ok(re) = Regex::new(r"(?s)/\*.*?\*/") {
        out = re
            .replace_all(&out, |caps: &Captures| strip_unless_important(&caps[0]))
            .into_owned();
    }
    if let Ok(re) = Regex::new(r"[ \t]+") {
        out = re.replace_all(&out, " ").into_owned();
    }
    if let Ok(re) = Regex::new(r"(?m)[ \t]+$") {
        out = re.replace_all(&out, "").into_owned();
    }
    if let Ok(re) = Regex::new(r"\n\s*\n") {
        out = re.replace_all(&out, "\n").into_owned();
    }

    out.trim().to_string()
}

/// Comments mentioning "important" are kept, so license banners and
/// do-not-remove markers survive minification.
fn strip_unless_important(comment: &str) -> String {
    if comment.contains("important") {
        comment.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_leaves_content_untouched() {
        let content = "  .promo { color: red; }  /* raw */ ";
        assert_eq!(Passthrough.minify(SnippetKind::Css, content), content);
    }

    #[test]
    fn css_drops_comments_and_reflows_declarations() {
        let content = ".promo {  color: red;   /* brand color */ }";
        assert_eq!(
            BasicMinifier.minify(SnippetKind::Css, content),
            ".promo {\ncolor: red;\n}"
        );
    }

    #[test]
    fn css_collapses_multiline_whitespace() {
        let content = ".a {\n    margin: 0;\n}\n\n.b {\n    padding: 0;\n}";
        assert_eq!(
            BasicMinifier.minify(SnippetKind::Css, content),
            ".a {\nmargin: 0;\n} .b {\npadding: 0;\n}"
        );
    }

    #[test]
    fn js_strips_line_and_block_comments() {
        let content = "// setup\n/* banner */\nlet x = 1;\nconsole.log(x);";
        assert_eq!(
            BasicMinifier.minify(SnippetKind::Js, content),
            "let x = 1;\nconsole.log(x);"
        );
    }

    #[test]
    fn js_keeps_comments_marked_important() {
        let content = "let x = 1; // important: keep this\nconsole.log(x);";
        assert_eq!(
            BasicMinifier.minify(SnippetKind::Js, content),
            "let x = 1; // important: keep this\nconsole.log(x);"
        );
    }

    #[test]
    fn js_collapses_blank_lines_and_indentation() {
        let content = "function hi() {\n    console.log('hi');\n}\n\n\nhi();";
        assert_eq!(
            BasicMinifier.minify(SnippetKind::Js, content),
            "function hi() {\n console.log('hi');\n}\nhi();"
        );
    }

    #[test]
    fn minified_output_is_never_larger_for_commented_sources() {
        let content = "/* a very long banner comment that repeats itself */\n.x { color: blue; }";
        let out = BasicMinifier.minify(SnippetKind::Css, content);
        assert!(out.len() < content.len());
    }
}
