use std::collections::{HashMap, HashSet};
use std::env;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use vitrine_composer::{
    build_export_payload, compose_project, generate_layout, export::write_payload_to_dir,
    DiagnosticLevel, InMemoryRegistry, Project,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComposerInput {
    project: Project,
    /// Snippet sources keyed by catalog animation id. Instances carrying
    /// cached source text don't need an entry here.
    #[serde(default)]
    snippets: HashMap<String, String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("[vitrine-composer] {err}");
        process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let out_dir = parse_out_dir()?;

    let mut stdin_payload = String::new();
    io::stdin()
        .read_to_string(&mut stdin_payload)
        .map_err(|e| format!("failed to read stdin: {e}"))?;

    if stdin_payload.trim().is_empty() {
        return Err("stdin payload is empty".into());
    }

    let input: ComposerInput =
        serde_json::from_str(&stdin_payload).map_err(|e| format!("invalid input JSON: {e}"))?;
    validate_input(&input)?;

    let registry = InMemoryRegistry::new();
    for (animation_id, source) in &input.snippets {
        registry.insert(animation_id.clone(), source.clone());
    }

    let composed = compose_project(&input.project, &registry).await;
    let mut artifacts = Vec::with_capacity(composed.len());
    for page in composed {
        for diagnostic in &page.diagnostics {
            match diagnostic.level {
                DiagnosticLevel::Info => {}
                _ => eprintln!("[vitrine-composer] {}", diagnostic.message),
            }
        }
        artifacts.push(page.artifact);
    }

    let layout = generate_layout(&input.project.pages, &input.project.name);
    let payload = build_export_payload(&input.project.name, &artifacts, &layout);

    let written = write_payload_to_dir(&payload, &out_dir)
        .await
        .map_err(|e| format!("failed to write output: {e}"))?;

    eprintln!(
        "[vitrine-composer] wrote {} files to {}",
        written.len(),
        out_dir.display()
    );
    Ok(())
}

fn parse_out_dir() -> Result<PathBuf, String> {
    let mut out_dir: Option<PathBuf> = None;
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out-dir" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --out-dir".to_string())?;
                out_dir = Some(PathBuf::from(value));
            }
            _ => {
                return Err(format!(
                    "unknown argument '{arg}'. usage: vitrine-composer --out-dir <path>"
                ));
            }
        }
    }

    out_dir.ok_or_else(|| "required flag missing: --out-dir <path>".to_string())
}

fn validate_input(input: &ComposerInput) -> Result<(), String> {
    if input.project.name.trim().is_empty() {
        return Err("project.name must be a non-empty string".into());
    }

    let mut page_ids = HashSet::new();
    for page in &input.project.pages {
        if page.id.trim().is_empty() {
            return Err("project.pages[].id must be non-empty".into());
        }
        if !page_ids.insert(page.id.as_str()) {
            return Err(format!("duplicate page id '{}'", page.id));
        }

        let mut instance_ids = HashSet::new();
        for instance in &page.components {
            if instance.id.trim().is_empty() {
                return Err(format!(
                    "page '{}' contains a component with an empty id",
                    page.id
                ));
            }
            if !instance_ids.insert(instance.id.as_str()) {
                return Err(format!(
                    "page '{}' contains duplicate component id '{}'",
                    page.id, instance.id
                ));
            }
            if instance.animation_id.trim().is_empty() {
                return Err(format!(
                    "component '{}' on page '{}' has an empty animationId",
                    instance.id, page.id
                ));
            }
        }
    }

    Ok(())
}
