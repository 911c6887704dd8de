//! Page composition.
//!
//! This module orchestrates the full per-page pipeline:
//! 1. Resolve each placed instance's source (cached text, else registry)
//! 2. Apply the instance's text overrides
//! 3. Normalize the snippet into imports + a de-exported body
//! 4. Merge all import lines once across the page
//! 5. Emit bodies plus a default page entry, in instance order
//!
//! Every per-instance failure is soft: the instance is skipped with a
//! warning diagnostic and the page still assembles from what remains.
//! Given identical page state the composer is a pure function, so an
//! artifact can always be regenerated from scratch instead of patched.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::emit::{page_entry, section_comment, ComponentUsage, FragmentKind, ModuleBuilder};
use crate::merge::merge_imports;
use crate::normalize::{normalize_snippet, rename_declaration, NormalizedSnippet};
use crate::overrides::apply_text_overrides;
use crate::registry::SnippetResolver;
use crate::{ComponentInstance, ComposeError, Diagnostic, DiagnosticLevel, Page, PageArtifact, Project};

// ---------------------------------------------------------------------------
// Composition Result
// ---------------------------------------------------------------------------

/// A composed page: the regenerated artifact plus everything worth
/// reporting about how it was produced.
#[derive(Debug, Clone)]
pub struct ComposedPage {
    pub artifact: PageArtifact,
    pub diagnostics: Vec<Diagnostic>,
}

// ---------------------------------------------------------------------------
// Per-Instance Pipeline
// ---------------------------------------------------------------------------

/// Resolve, override, and normalize one instance.
async fn prepare_instance(
    instance: &ComponentInstance,
    resolver: &dyn SnippetResolver,
) -> Result<NormalizedSnippet, ComposeError> {
    let source = match instance.source {
        Some(ref cached) => cached.clone(),
        None => resolver
            .resolve(&instance.animation_id)
            .await
            .map_err(|err| ComposeError::ResolutionFailed {
                id: instance.animation_id.clone(),
                reason: err.to_string(),
            })?
            .ok_or_else(|| ComposeError::ResolutionFailed {
                id: instance.animation_id.clone(),
                reason: "not found in catalog".to_string(),
            })?,
    };

    let overridden = apply_text_overrides(&source, &instance.overrides);
    normalize_snippet(&overridden, &instance.animation_id)
}

// ---------------------------------------------------------------------------
// Page Composition
// ---------------------------------------------------------------------------

/// Compose one page into its artifact. Never fails: unresolvable or
/// unnormalizable instances degrade to a smaller page, and a page with
/// nothing left renders the placeholder notice.
pub async fn compose_page(page: &Page, resolver: &dyn SnippetResolver) -> ComposedPage {
    let mut diagnostics = Vec::new();

    // Instances are independent; resolve them concurrently and let each
    // failure stay isolated from its siblings.
    let prepared = join_all(
        page.components
            .iter()
            .map(|instance| prepare_instance(instance, resolver)),
    )
    .await;

    let mut snippets: Vec<(String, NormalizedSnippet)> = Vec::new();
    for (instance, outcome) in page.components.iter().zip(prepared) {
        match outcome {
            Ok(snippet) => snippets.push((instance.animation_id.clone(), snippet)),
            Err(err) => {
                warn!(
                    instance = %instance.id,
                    animation = %instance.animation_id,
                    error = %err,
                    "skipping instance"
                );
                diagnostics.push(Diagnostic {
                    level: DiagnosticLevel::Warning,
                    message: format!("skipped component '{}': {}", instance.animation_id, err),
                    context: Some(format!("instance {}", instance.id)),
                });
            }
        }
    }

    // Duplicate identifiers would collide in one module; later instances
    // get a numeric suffix on both declaration and usage.
    let mut used_names: Vec<String> = Vec::new();
    for (_, snippet) in snippets.iter_mut() {
        if used_names.contains(&snippet.name) {
            let mut counter = 2;
            let mut candidate = format!("{}{}", snippet.name, counter);
            while used_names.contains(&candidate) {
                counter += 1;
                candidate = format!("{}{}", snippet.name, counter);
            }
            rename_declaration(snippet, &candidate);
        }
        used_names.push(snippet.name.clone());
    }

    // One merge pass over every contributed import line. Snippet directives
    // are re-hoisted here so the merger can retain exactly one.
    let mut import_block = String::new();
    for (_, snippet) in &snippets {
        if let Some(ref directive) = snippet.directive {
            import_block.push_str(directive);
            import_block.push('\n');
        }
        for line in &snippet.import_lines {
            import_block.push_str(line);
            import_block.push('\n');
        }
    }
    let merged_imports = merge_imports(&import_block);

    let usages: Vec<ComponentUsage> = snippets
        .iter()
        .map(|(label, snippet)| ComponentUsage {
            identifier: snippet.name.clone(),
            label: label.clone(),
        })
        .collect();

    let mut builder = ModuleBuilder::new();
    builder.push(FragmentKind::Imports, merged_imports);
    for (label, snippet) in &snippets {
        builder.push(FragmentKind::SectionComment, section_comment(label));
        builder.push(FragmentKind::ComponentBody, snippet.body.clone());
    }
    builder.push(FragmentKind::PageEntry, page_entry(&usages));
    let code = builder.finish();

    debug!(
        page = %page.id,
        components = usages.len(),
        bytes = code.len(),
        "composed page"
    );
    diagnostics.push(Diagnostic {
        level: DiagnosticLevel::Info,
        message: format!(
            "composed page '{}': {} of {} components, {} bytes",
            page.name,
            usages.len(),
            page.components.len(),
            code.len()
        ),
        context: None,
    });

    ComposedPage {
        artifact: PageArtifact {
            id: page.id.clone(),
            name: page.name.clone(),
            slug: page.slug.clone(),
            code,
            component_count: usages.len(),
        },
        diagnostics,
    }
}

// ---------------------------------------------------------------------------
// Project Composition
// ---------------------------------------------------------------------------

/// Regenerate every page artifact of a project. Pages are independent and
/// fan out concurrently; artifacts come back in page order.
pub async fn compose_project(project: &Project, resolver: &dyn SnippetResolver) -> Vec<ComposedPage> {
    join_all(
        project
            .pages
            .iter()
            .map(|page| compose_page(page, resolver)),
    )
    .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
