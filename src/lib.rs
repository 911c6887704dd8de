//! # Vitrine Composer
//!
//! Code-synthesis engine for the Vitrine component studio. Takes the
//! component instances a user placed on their pages and mechanically
//! assembles valid, deduplicated, ready-to-export page modules plus a
//! shared layout shell.
//!
//! The composer is a pure string transformer over a closed world of
//! catalog snippets. It resolves snippet sources and packages bundles only
//! through collaborator traits — never the network or storage directly.

pub mod compose;
pub mod emit;
pub mod export;
pub mod layout;
pub mod merge;
pub mod normalize;
pub mod overrides;
pub mod registry;
pub mod store;
pub mod utils;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use compose::{compose_page, compose_project, ComposedPage};
pub use export::{
    build_export_payload, export_project, run_export, ExportBundle, ExportFile, ExportOutcome,
    ExportPayload, Packager, APP_ROOT,
};
pub use layout::generate_layout;
pub use registry::{InMemoryRegistry, SnippetResolver, SourceCache};
pub use store::{save_project, InMemoryStore, ProjectStore};

// ---------------------------------------------------------------------------
// Data Model
// ---------------------------------------------------------------------------

/// One recorded text substitution, keyed externally by
/// `"<fieldId>-<ordinal>"`. The ordinal fixes application order so repeated
/// identical originals are consumed left-to-right, matching capture order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOverride {
    pub original: String,
    /// `None` means the field was touched in the editor but never given a
    /// value; such overrides are skipped.
    #[serde(default)]
    pub value: Option<String>,
}

/// One placed occurrence of a catalog component on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInstance {
    /// Stable instance id, unique within the page.
    pub id: String,
    /// Catalog animation id this instance renders.
    #[serde(rename = "animationId")]
    pub animation_id: String,
    /// Cached source text; when present the resolver is never consulted.
    #[serde(default)]
    pub source: Option<String>,
    /// Text overrides keyed by `"<fieldId>-<ordinal>"`.
    #[serde(default)]
    pub overrides: BTreeMap<String, TextOverride>,
}

/// An ordered collection of component instances with page identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub name: String,
    /// URL-safe slug; empty means "derive one at export time".
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub components: Vec<ComponentInstance>,
}

/// A named, ordered collection of pages. Saving always writes a complete
/// replacement snapshot; `id` and `share_id` are generated on first save
/// and used for deployment addressing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "shareId")]
    pub share_id: String,
    pub name: String,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// Derived module text for one page. Never persisted, never patched —
/// always fully regenerated from its page, so it is always consistent with
/// current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageArtifact {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub code: String,
    /// Components actually rendered into the module.
    #[serde(rename = "componentCount")]
    pub component_count: usize,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// A structured diagnostic emitted during composition or export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub context: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures inside the synthesis pipeline. Per-instance variants are
/// recovered locally by the assembler (skip + warn); only export and I/O
/// failures reach the caller.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("snippet has no renderable content")]
    NoRenderableContent,

    #[error("unsupported export syntax: `{0}`")]
    UnsupportedExport(String),

    #[error("could not resolve snippet '{id}': {reason}")]
    ResolutionFailed { id: String, reason: String },

    #[error("export failed: {0}")]
    ExportFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
