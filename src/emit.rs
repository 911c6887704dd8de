//! Module emission.
//!
//! Composed modules are built from an ordered list of typed fragments and
//! joined once at the end. Keeping emission out of the assembler makes the
//! ordering and spacing invariants checkable on their own, without running
//! a full composition.

use crate::utils::comment_safe;

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// What a fragment contributes to the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Merged import block (directive included, when present).
    Imports,
    /// `// --- <label> ---` above a component body.
    SectionComment,
    /// One component's de-exported declaration(s).
    ComponentBody,
    /// The default-exported page entry.
    PageEntry,
}

/// One ordered piece of a composed module.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub text: String,
}

/// Ordered fragment collector. `finish` is the only place fragments are
/// joined into text.
#[derive(Debug, Default)]
pub struct ModuleBuilder {
    fragments: Vec<Fragment>,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: FragmentKind, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.fragments.push(Fragment { kind, text });
    }

    /// Join fragments: a section comment sits directly above its body,
    /// everything else is separated by one blank line. Output ends with a
    /// single newline.
    pub fn finish(self) -> String {
        let mut out = String::new();
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                let prev = &self.fragments[i - 1];
                if prev.kind == FragmentKind::SectionComment {
                    out.push('\n');
                } else {
                    out.push_str("\n\n");
                }
            }
            out.push_str(fragment.text.trim_end_matches('\n'));
        }
        out.push('\n');
        out
    }
}

// ---------------------------------------------------------------------------
// Page Entry
// ---------------------------------------------------------------------------

/// One rendered component reference in the page entry.
#[derive(Debug, Clone)]
pub struct ComponentUsage {
    /// Declaration identifier, used as the JSX tag.
    pub identifier: String,
    /// Source label for the section comment (the catalog id).
    pub label: String,
}

/// Section comment placed above a component body.
pub fn section_comment(label: &str) -> String {
    format!("// --- {} ---", comment_safe(label))
}

/// Generate the default page entry. Renders every usage, in order, inside
/// a vertical layout wrapper; with no usages, renders a placeholder notice.
pub fn page_entry(usages: &[ComponentUsage]) -> String {
    if usages.is_empty() {
        return placeholder_entry();
    }

    let mut body = String::new();
    for usage in usages {
        body.push_str(&format!(
            "      {{/* {} */}}\n      <{} />\n",
            comment_safe(&usage.label),
            usage.identifier
        ));
    }

    format!(
        "export default function Page() {{\n  return (\n    <main className=\"flex min-h-screen w-full flex-col items-center gap-10 px-6 py-16\">\n{body}    </main>\n  );\n}}"
    )
}

/// The "no content" notice rendered when a page resolves zero components.
fn placeholder_entry() -> String {
    "export default function Page() {\n  return (\n    <main className=\"flex min-h-screen w-full flex-col items-center justify-center py-24\">\n      <p className=\"text-sm text-neutral-500\">Nothing here yet. Add components to this page.</p>\n    </main>\n  );\n}"
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
