//! Import statement merging across independently authored snippets.
//!
//! Every page concatenates the import blocks of all of its snippets; this
//! module collapses that block into one import per distinct source module:
//! - named bindings from the same module are unioned, source order kept
//! - the first default/namespace binding per module wins; a conflicting
//!   second default is passed through as an additional import, never dropped
//! - a leading module directive is retained exactly once
//! - anything the recognizer cannot parse passes through unchanged
//!
//! The recognizer is line-oriented and scoped to the import shapes catalog
//! snippets are guaranteed to follow. It is not a general ES parser.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::utils::{is_directive_line, is_import_line};

// ---------------------------------------------------------------------------
// Import Records
// ---------------------------------------------------------------------------

/// One parsed import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// The module specifier (`"framer-motion"` without quotes).
    pub specifier: String,
    /// Default or namespace binding (`React`, `* as THREE`), verbatim.
    pub default_binding: Option<String>,
    /// Named bindings between braces, verbatim items (`motion`, `cn as cx`).
    pub named: Vec<String>,
    /// The original statement text.
    pub raw: String,
}

fn from_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^import\s+(.+?)\s+from\s+['"]([^'"]+)['"]\s*;?\s*$"#).unwrap()
    })
}

fn side_effect_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^import\s*['"]([^'"]+)['"]\s*;?\s*$"#).unwrap())
}

fn binding_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\*\s+as\s+[A-Za-z_$][\w$]*|[A-Za-z_$][\w$]*)$").unwrap()
    })
}

/// Parse one logical import line into a record.
/// Returns `None` for anything outside the recognized shapes.
pub fn parse_import_line(line: &str) -> Option<ImportRecord> {
    let trimmed = line.trim();

    if let Some(caps) = side_effect_import_re().captures(trimmed) {
        return Some(ImportRecord {
            specifier: caps[1].to_string(),
            default_binding: None,
            named: Vec::new(),
            raw: trimmed.to_string(),
        });
    }

    let caps = from_import_re().captures(trimmed)?;
    let clause = caps[1].trim().to_string();
    let specifier = caps[2].to_string();

    let (default_binding, named) = parse_import_clause(&clause)?;

    Some(ImportRecord {
        specifier,
        default_binding,
        named,
        raw: trimmed.to_string(),
    })
}

/// Split an import clause into (default/namespace binding, named bindings).
fn parse_import_clause(clause: &str) -> Option<(Option<String>, Vec<String>)> {
    if let Some(open) = clause.find('{') {
        let close = clause.rfind('}')?;
        if close < open {
            return None;
        }
        let head = clause[..open].trim().trim_end_matches(',').trim();
        let tail = clause[close + 1..].trim();
        if !tail.is_empty() {
            return None;
        }
        let default_binding = if head.is_empty() {
            None
        } else {
            if !binding_re().is_match(head) {
                return None;
            }
            Some(head.to_string())
        };
        let named = clause[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        // A brace group containing quotes or nested braces is outside the
        // closed world; pass the whole line through instead.
        if named
            .iter()
            .any(|item| item.contains(['{', '}', '"', '\'']))
        {
            return None;
        }
        Some((default_binding, named))
    } else {
        if !binding_re().is_match(clause) {
            return None;
        }
        Some((Some(clause.to_string()), Vec::new()))
    }
}

// ---------------------------------------------------------------------------
// Logical Lines
// ---------------------------------------------------------------------------

/// Split an import block into logical lines, joining brace imports whose
/// named bindings span multiple physical lines. A spanning import ends at
/// the first line containing both `}` and `from`.
pub fn logical_import_lines(block: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut buffer: Option<String> = None;

    for line in block.lines() {
        if let Some(buffered) = buffer.as_mut() {
            buffered.push(' ');
            buffered.push_str(line.trim());
            if line.contains('}') && line.contains("from") {
                out.push(buffer.take().unwrap_or_default());
            }
            continue;
        }

        let spans_lines = is_import_line(line)
            && line.contains('{')
            && !(line.contains('}') && line.contains("from"));
        if spans_lines {
            buffer = Some(line.trim().to_string());
        } else {
            out.push(line.to_string());
        }
    }

    // Unterminated brace import: emit what was buffered so it still
    // passes through rather than vanishing.
    if let Some(rest) = buffer {
        out.push(rest);
    }

    out
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ModuleGroup {
    specifier: String,
    defaults: Vec<String>,
    named: Vec<String>,
}

#[derive(Debug)]
enum MergeUnit {
    Group(usize),
    Raw(String),
}

/// Merge an import block into one import per distinct source module,
/// modules in first-seen order, with at most one leading directive line.
pub fn merge_imports(block: &str) -> String {
    let mut directive: Option<String> = None;
    let mut groups: Vec<ModuleGroup> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut units: Vec<MergeUnit> = Vec::new();

    for line in logical_import_lines(block) {
        if line.trim().is_empty() {
            continue;
        }
        if is_directive_line(&line) {
            if directive.is_none() {
                directive = Some(line.trim().trim_end_matches(';').to_string());
            }
            continue;
        }

        let Some(record) = parse_import_line(&line) else {
            units.push(MergeUnit::Raw(line.trim().to_string()));
            continue;
        };

        let idx = match group_index.get(&record.specifier) {
            Some(&idx) => idx,
            None => {
                let idx = groups.len();
                groups.push(ModuleGroup {
                    specifier: record.specifier.clone(),
                    defaults: Vec::new(),
                    named: Vec::new(),
                });
                group_index.insert(record.specifier.clone(), idx);
                units.push(MergeUnit::Group(idx));
                idx
            }
        };

        let group = &mut groups[idx];
        if let Some(default_binding) = record.default_binding {
            if !group.defaults.contains(&default_binding) {
                group.defaults.push(default_binding);
            }
        }
        for name in record.named {
            if !group.named.contains(&name) {
                group.named.push(name);
            }
        }
    }

    let mut lines: Vec<String> = Vec::new();
    if let Some(directive) = directive {
        lines.push(format!("{directive};"));
        lines.push(String::new());
    }

    for unit in units {
        match unit {
            MergeUnit::Raw(raw) => lines.push(raw),
            MergeUnit::Group(idx) => {
                let group = &groups[idx];
                lines.extend(emit_group(group));
                // A second, conflicting default binding is not expected from
                // catalog snippets; keep it as its own import rather than
                // silently dropping it.
                for extra in group.defaults.iter().skip(1) {
                    lines.push(format!("import {} from \"{}\";", extra, group.specifier));
                }
            }
        }
    }

    lines.join("\n")
}

fn emit_group(group: &ModuleGroup) -> Vec<String> {
    let default_binding = group.defaults.first();
    // A namespace binding cannot share a statement with named bindings.
    if let Some(default_binding) = default_binding {
        if default_binding.starts_with('*') && !group.named.is_empty() {
            return vec![
                format!("import {} from \"{}\";", default_binding, group.specifier),
                format!(
                    "import {{ {} }} from \"{}\";",
                    group.named.join(", "),
                    group.specifier
                ),
            ];
        }
    }
    let line = match (default_binding, group.named.is_empty()) {
        (None, true) => format!("import \"{}\";", group.specifier),
        (Some(default_binding), true) => {
            format!("import {} from \"{}\";", default_binding, group.specifier)
        }
        (None, false) => format!(
            "import {{ {} }} from \"{}\";",
            group.named.join(", "),
            group.specifier
        ),
        (Some(default_binding), false) => format!(
            "import {}, {{ {} }} from \"{}\";",
            default_binding,
            group.named.join(", "),
            group.specifier
        ),
    };
    vec![line]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
