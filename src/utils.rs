//! Utility functions for the composer.
//!
//! - Slug and identifier derivation for pages and components
//! - Text-content and JS string escaping (injection-safe)
//! - Line recognizers for the narrow snippet shapes the catalog emits
//!
//! The recognizers here are deliberately line-oriented, not a general
//! source parser. Catalog snippets follow a closed set of shapes and
//! anything outside that set is passed through or rejected upstream.

use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Line Recognizers
// ---------------------------------------------------------------------------

fn directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*(?:"use (?:client|server)"|'use (?:client|server)');?\s*$"#).unwrap()
    })
}

/// Check whether a line is a standalone module directive (`"use client"`,
/// `'use server'`, with or without a trailing semicolon).
pub fn is_directive_line(line: &str) -> bool {
    directive_re().is_match(line)
}

/// Check whether a line is (the start of) a comment.
/// Covers `//`, `/* ... */` openers, and `*`/`*/` block continuations.
pub fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with("* ")
        || trimmed == "*"
        || trimmed.starts_with("*/")
}

/// Check whether a line begins an import statement.
pub fn is_import_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed == "import"
        || trimmed.starts_with("import ")
        || trimmed.starts_with("import{")
        || trimmed.starts_with("import\"")
        || trimmed.starts_with("import'")
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape a string for safe embedding as literal text content in markup.
/// Ampersand first, then angle brackets.
pub fn escape_text_content(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a string for safe embedding inside a JS double-quoted string literal.
pub fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Name Derivation
// ---------------------------------------------------------------------------

/// Derive a URL-safe slug from a display name.
/// Lowercases, collapses non-alphanumeric runs to single dashes,
/// trims leading/trailing dashes. May return an empty string.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Derive a PascalCase identifier from a catalog display name.
/// `"glow button"` / `"glow-button"` both become `GlowButton`.
/// Names that yield no usable identifier fall back to `Component`.
pub fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("Component{out}");
    }
    out
}

/// Sanitize a label for embedding inside a `/* ... */` or `{/* ... */}`
/// comment. Only `*/` can break out of the comment.
pub fn comment_safe(label: &str) -> String {
    label.replace("*/", "* /")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
