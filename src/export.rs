//! Project export.
//!
//! Builds the packaging payload out of regenerated page artifacts plus the
//! layout module, hands it to the packaging collaborator, and surfaces a
//! single terminal error when packaging fails. The orchestrator itself
//! performs no I/O beyond that call; `write_payload_to_dir` exists for the
//! CLI, which materializes the same payload as files instead of a bundle.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compose::compose_project;
use crate::layout::generate_layout;
use crate::registry::SnippetResolver;
use crate::utils::slugify;
use crate::{ComposeError, Diagnostic, PageArtifact, Project};

/// Root directory of exported page modules.
pub const APP_ROOT: &str = "app";

// ---------------------------------------------------------------------------
// Payload Types
// ---------------------------------------------------------------------------

/// One exported module: extensionless path plus source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFile {
    pub path: String,
    pub code: String,
}

/// The request handed to the packaging collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPayload {
    #[serde(rename = "projectName")]
    pub project_name: String,
    pub pages: Vec<ExportFile>,
    pub layout: String,
}

/// The downloadable bundle the packaging collaborator returns.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Packaging collaborator: exactly two outcomes, bytes or a message.
#[async_trait]
pub trait Packager: Send + Sync {
    async fn package(&self, payload: &ExportPayload) -> anyhow::Result<ExportBundle>;
}

// ---------------------------------------------------------------------------
// Slug Resolution
// ---------------------------------------------------------------------------

/// Resolve a usable slug per page from `(name, slug)` pairs, in page order.
/// A page's stored slug wins when it sanitizes to something non-empty, then
/// the slugified name; pages with neither get `page-<n>` where `n` counts
/// 1-based across the slugless pages only.
pub fn resolve_slugs(pairs: &[(&str, &str)]) -> Vec<String> {
    let mut fallback = 0usize;
    pairs
        .iter()
        .map(|(name, slug)| {
            let stored = slugify(slug);
            if !stored.is_empty() {
                return stored;
            }
            let derived = slugify(name);
            if !derived.is_empty() {
                return derived;
            }
            fallback += 1;
            format!("page-{fallback}")
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Payload Build
// ---------------------------------------------------------------------------

/// Build the export payload: first page at `<root>/page`, every later page
/// at `<root>/<slug>/page`.
pub fn build_export_payload(
    project_name: &str,
    artifacts: &[PageArtifact],
    layout: &str,
) -> ExportPayload {
    let pairs: Vec<(&str, &str)> = artifacts
        .iter()
        .map(|artifact| (artifact.name.as_str(), artifact.slug.as_str()))
        .collect();
    let slugs = resolve_slugs(&pairs);

    let pages = artifacts
        .iter()
        .zip(slugs)
        .enumerate()
        .map(|(index, (artifact, slug))| ExportFile {
            path: if index == 0 {
                format!("{APP_ROOT}/page")
            } else {
                format!("{APP_ROOT}/{slug}/page")
            },
            code: artifact.code.clone(),
        })
        .collect();

    ExportPayload {
        project_name: project_name.to_string(),
        pages,
        layout: layout.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// A completed export.
#[derive(Debug)]
pub struct ExportOutcome {
    pub bundle: ExportBundle,
    pub diagnostics: Vec<Diagnostic>,
}

/// Hand a payload to the packaging collaborator. A non-success outcome is
/// surfaced as one terminal error; nothing partial is produced and no
/// in-memory state is touched, so the caller may simply retry.
pub async fn run_export(
    payload: &ExportPayload,
    packager: &dyn Packager,
) -> Result<ExportBundle, ComposeError> {
    packager
        .package(payload)
        .await
        .map_err(|err| ComposeError::ExportFailed(err.to_string()))
}

/// Full export pipeline: regenerate every page artifact, generate the
/// layout, build the payload, package it.
pub async fn export_project(
    project: &Project,
    resolver: &dyn SnippetResolver,
    packager: &dyn Packager,
) -> Result<ExportOutcome, ComposeError> {
    let composed = compose_project(project, resolver).await;
    let mut diagnostics = Vec::new();
    let mut artifacts = Vec::with_capacity(composed.len());
    for page in composed {
        diagnostics.extend(page.diagnostics);
        artifacts.push(page.artifact);
    }

    let layout = generate_layout(&project.pages, &project.name);
    let payload = build_export_payload(&project.name, &artifacts, &layout);
    debug!(
        pages = payload.pages.len(),
        project = %project.name,
        "export payload built"
    );

    let bundle = run_export(&payload, packager).await?;
    Ok(ExportOutcome {
        bundle,
        diagnostics,
    })
}

// ---------------------------------------------------------------------------
// Disk Materialization (CLI)
// ---------------------------------------------------------------------------

/// Write a payload's modules under `out_dir` as `.tsx` files, returning the
/// written paths. The layout lands next to the first page at
/// `<root>/layout.tsx`.
pub async fn write_payload_to_dir(
    payload: &ExportPayload,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ComposeError> {
    let mut written = Vec::with_capacity(payload.pages.len() + 1);

    let layout_path = out_dir.join(APP_ROOT).join("layout.tsx");
    if let Some(parent) = layout_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&layout_path, &payload.layout).await?;
    written.push(layout_path);

    for file in &payload.pages {
        let path = out_dir.join(format!("{}.tsx", file.path));
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &file.code).await?;
        written.push(path);
    }

    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
