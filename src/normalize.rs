//! Snippet normalization: raw catalog snippet -> (imports, body, identifier).
//!
//! Catalog snippets are self-contained, independently compilable modules.
//! Before they can be composed into one page module they are:
//! 1. stripped of module directives (invalid anywhere but the top of the
//!    assembled module; the assembler re-hoists one copy)
//! 2. split into an import section and a body section
//! 3. rewritten so the top-level `export function Name` / `export const
//!    Name` becomes a plain declaration, keeping `Name` as the component's
//!    usage identifier
//!
//! Export syntaxes outside those two shapes are a normalization failure —
//! the scanner is scoped to what the catalog emits and does not guess.

use std::sync::OnceLock;

use regex::Regex;

use crate::utils::{is_comment_line, is_directive_line, is_import_line, pascal_case};
use crate::ComposeError;

// ---------------------------------------------------------------------------
// Normalized Snippet
// ---------------------------------------------------------------------------

/// Which declaration form introduced the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Function,
    Const,
}

/// A snippet split into composable parts.
#[derive(Debug, Clone)]
pub struct NormalizedSnippet {
    /// The component's usage identifier.
    pub name: String,
    /// Leading module directive, if the snippet carried one.
    pub directive: Option<String>,
    /// Captured import statements, one logical line each.
    pub import_lines: Vec<String>,
    /// The de-exported body.
    pub body: String,
    /// `None` when the snippet declared nothing and the identifier was
    /// derived from the catalog display name.
    pub declaration: Option<DeclKind>,
}

fn export_function_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)export\s+function\s+([A-Za-z_$][\w$]*)").unwrap())
}

fn export_const_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)export\s+const\s+([A-Za-z_$][\w$]*)").unwrap())
}

fn export_anything_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*export\b").unwrap())
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize one raw snippet. `display_name` is the catalog component's
/// display name, used to derive an identifier when the snippet declares
/// no export of its own.
pub fn normalize_snippet(
    source: &str,
    display_name: &str,
) -> Result<NormalizedSnippet, ComposeError> {
    // CRLF input must produce the same module as LF input.
    let source = source.replace("\r\n", "\n");
    let lines: Vec<&str> = source.lines().collect();

    let mut directive: Option<String> = None;
    let mut import_lines: Vec<String> = Vec::new();
    let mut idx = 0;
    let mut in_block_comment = false;

    // Leading directive zone: directives, blanks, comments.
    while idx < lines.len() {
        let line = lines[idx];
        if in_block_comment {
            if line.contains("*/") {
                in_block_comment = false;
            }
            idx += 1;
            continue;
        }
        if line.trim().is_empty() || is_comment_line(line) {
            if line.trim_start().starts_with("/*") && !line.contains("*/") {
                in_block_comment = true;
            }
            idx += 1;
            continue;
        }
        if is_directive_line(line) {
            if directive.is_none() {
                directive = Some(line.trim().trim_end_matches(';').to_string());
            }
            idx += 1;
            continue;
        }
        break;
    }

    // Import zone: capture imports, skipping interleaved blanks/comments.
    // A brace import spanning lines is buffered until the line that
    // contains both `}` and `from` closes it.
    while idx < lines.len() {
        let line = lines[idx];
        if in_block_comment {
            if line.contains("*/") {
                in_block_comment = false;
            }
            idx += 1;
            continue;
        }
        if line.trim().is_empty() || is_comment_line(line) {
            if line.trim_start().starts_with("/*") && !line.contains("*/") {
                in_block_comment = true;
            }
            idx += 1;
            continue;
        }
        if !is_import_line(line) {
            break;
        }
        let spans_lines =
            line.contains('{') && !(line.contains('}') && line.contains("from"));
        if !spans_lines {
            import_lines.push(line.trim().to_string());
            idx += 1;
            continue;
        }
        let mut buffered = line.trim().to_string();
        idx += 1;
        while idx < lines.len() {
            let continuation = lines[idx];
            buffered.push(' ');
            buffered.push_str(continuation.trim());
            idx += 1;
            if continuation.contains('}') && continuation.contains("from") {
                break;
            }
        }
        import_lines.push(buffered);
    }

    // Remaining lines form the body; directives reappearing mid-body are
    // invalid in the assembled module and get dropped.
    let mut body_lines: Vec<&str> = lines[idx..]
        .iter()
        .copied()
        .filter(|line| !is_directive_line(line))
        .collect();
    while body_lines.first().is_some_and(|l| l.trim().is_empty()) {
        body_lines.remove(0);
    }
    while body_lines.last().is_some_and(|l| l.trim().is_empty()) {
        body_lines.pop();
    }

    if body_lines.is_empty() {
        return Err(ComposeError::NoRenderableContent);
    }

    let (body, name, declaration) = rewrite_export(&body_lines, display_name)?;

    Ok(NormalizedSnippet {
        name,
        directive,
        import_lines,
        body,
        declaration,
    })
}

/// Rewrite the top-level export into a plain declaration and extract the
/// component identifier.
fn rewrite_export(
    body_lines: &[&str],
    display_name: &str,
) -> Result<(String, String, Option<DeclKind>), ComposeError> {
    let mut rewritten: Vec<String> = Vec::with_capacity(body_lines.len());
    let mut name: Option<String> = None;
    let mut declaration: Option<DeclKind> = None;

    for line in body_lines {
        if !export_anything_re().is_match(line) {
            rewritten.push((*line).to_string());
            continue;
        }
        if name.is_some() {
            // A second top-level export is outside the catalog's shape.
            return Err(ComposeError::UnsupportedExport(line.trim().to_string()));
        }
        if let Some(caps) = export_function_re().captures(line) {
            name = Some(caps[2].to_string());
            declaration = Some(DeclKind::Function);
        } else if let Some(caps) = export_const_re().captures(line) {
            name = Some(caps[2].to_string());
            declaration = Some(DeclKind::Const);
        } else {
            return Err(ComposeError::UnsupportedExport(line.trim().to_string()));
        }
        rewritten.push(line.replacen("export ", "", 1));
    }

    let name = name.unwrap_or_else(|| pascal_case(display_name));
    Ok((rewritten.join("\n"), name, declaration))
}

/// Rename the snippet's top-level declaration (and its recorded name).
/// No-op for snippets without a recognized declaration.
pub fn rename_declaration(snippet: &mut NormalizedSnippet, new_name: &str) {
    let needle = match snippet.declaration {
        Some(DeclKind::Function) => format!("function {}", snippet.name),
        Some(DeclKind::Const) => format!("const {}", snippet.name),
        None => return,
    };
    let replacement = match snippet.declaration {
        Some(DeclKind::Function) => format!("function {new_name}"),
        Some(DeclKind::Const) => format!("const {new_name}"),
        None => return,
    };
    snippet.body = snippet.body.replacen(&needle, &replacement, 1);
    snippet.name = new_name.to_string();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BUTTON: &str = r#""use client";

import { motion } from "framer-motion";

export function GlowButton() {
  return <motion.button whileHover={{ scale: 1.05 }}>Click me</motion.button>;
}
"#;

    #[test]
    fn splits_directive_imports_and_body() {
        let snippet = normalize_snippet(BUTTON, "Glow Button").unwrap();
        assert_eq!(snippet.directive.as_deref(), Some("\"use client\""));
        assert_eq!(
            snippet.import_lines,
            vec![r#"import { motion } from "framer-motion";"#]
        );
        assert_eq!(snippet.name, "GlowButton");
        assert_eq!(snippet.declaration, Some(DeclKind::Function));
        assert!(snippet.body.starts_with("function GlowButton()"));
        assert!(!snippet.body.contains("export"));
        assert!(!snippet.body.contains("use client"));
    }

    #[test]
    fn export_const_is_rewritten() {
        let source = "export const Spinner = () => <div className=\"spin\" />;\n";
        let snippet = normalize_snippet(source, "Spinner").unwrap();
        assert_eq!(snippet.name, "Spinner");
        assert_eq!(snippet.declaration, Some(DeclKind::Const));
        assert!(snippet.body.starts_with("const Spinner = "));
    }

    #[test]
    fn multiline_brace_import_is_one_logical_line() {
        let source = "\
import {
  motion,
  AnimatePresence,
} from \"framer-motion\";

export function Fader() {
  return <AnimatePresence />;
}
";
        let snippet = normalize_snippet(source, "Fader").unwrap();
        assert_eq!(
            snippet.import_lines,
            vec!["import { motion, AnimatePresence, } from \"framer-motion\";"]
        );
        assert!(snippet.body.starts_with("function Fader()"));
    }

    #[test]
    fn leading_comments_are_skipped() {
        let source = "\
// A spinning card.
/* multi
   line */
\"use client\";
import { cn } from \"@/lib/utils\";

export function Card() {
  return <div className={cn(\"card\")} />;
}
";
        let snippet = normalize_snippet(source, "Card").unwrap();
        assert_eq!(snippet.directive.as_deref(), Some("\"use client\""));
        assert_eq!(snippet.import_lines.len(), 1);
        assert_eq!(snippet.name, "Card");
    }

    #[test]
    fn mid_body_directive_is_dropped() {
        let source = "\
export function Late() {
  return <p>late</p>;
}
\"use client\";
";
        let snippet = normalize_snippet(source, "Late").unwrap();
        assert!(!snippet.body.contains("use client"));
    }

    #[test]
    fn identifier_derived_when_no_export() {
        let source = "const markup = <div>static</div>;\n";
        let snippet = normalize_snippet(source, "hero banner").unwrap();
        assert_eq!(snippet.name, "HeroBanner");
        assert_eq!(snippet.declaration, None);
        assert_eq!(snippet.body, "const markup = <div>static</div>;");
    }

    #[test]
    fn empty_snippet_is_no_renderable_content() {
        let err = normalize_snippet("\"use client\";\n\n", "Empty").unwrap_err();
        assert!(matches!(err, ComposeError::NoRenderableContent));

        let err = normalize_snippet("import { x } from \"y\";\n", "Empty").unwrap_err();
        assert!(matches!(err, ComposeError::NoRenderableContent));
    }

    #[test]
    fn export_default_is_unsupported() {
        let source = "export default function Widget() { return null; }\n";
        let err = normalize_snippet(source, "Widget").unwrap_err();
        assert!(matches!(err, ComposeError::UnsupportedExport(_)));
    }

    #[test]
    fn second_export_is_unsupported() {
        let source = "\
export function One() { return null; }
export function Two() { return null; }
";
        let err = normalize_snippet(source, "One").unwrap_err();
        assert!(matches!(err, ComposeError::UnsupportedExport(_)));
    }

    #[test]
    fn crlf_and_lf_normalize_identically() {
        let lf = normalize_snippet(BUTTON, "Glow Button").unwrap();
        let crlf = normalize_snippet(&BUTTON.replace('\n', "\r\n"), "Glow Button").unwrap();
        assert_eq!(lf.body, crlf.body);
        assert_eq!(lf.import_lines, crlf.import_lines);
    }

    #[test]
    fn rename_declaration_updates_body_and_name() {
        let mut snippet = normalize_snippet(BUTTON, "Glow Button").unwrap();
        rename_declaration(&mut snippet, "GlowButton2");
        assert_eq!(snippet.name, "GlowButton2");
        assert!(snippet.body.starts_with("function GlowButton2()"));
    }
}
