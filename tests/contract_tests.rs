//! Output contract freeze tests.
//!
//! Downstream tooling (the packaging service, the preview deployer, and
//! projects users already exported) depends on the exact shape of composed
//! modules and payloads. Any structural change here is a breaking change.

use std::collections::BTreeMap;

use vitrine_composer::{
    build_export_payload, compose_page, generate_layout, ComponentInstance, InMemoryRegistry, Page,
    PageArtifact,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const BUTTON: &str = "\"use client\";\n\nimport { motion } from \"framer-motion\";\n\nexport function GlowButton() {\n  return <motion.button>Click me</motion.button>;\n}\n";

fn registry() -> InMemoryRegistry {
    let registry = InMemoryRegistry::new();
    registry.insert("glow-button", BUTTON);
    registry
}

fn one_button_page() -> Page {
    Page {
        id: "p1".to_string(),
        name: "Landing".to_string(),
        slug: "landing".to_string(),
        components: vec![ComponentInstance {
            id: "i1".to_string(),
            animation_id: "glow-button".to_string(),
            source: None,
            overrides: BTreeMap::new(),
        }],
    }
}

// ---------------------------------------------------------------------------
// Composed Module Shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn module_structure_snapshot() {
    let composed = compose_page(&one_button_page(), &registry()).await;
    let code = &composed.artifact.code;

    // FROZEN: directive is the first line, terminated with a semicolon.
    assert!(
        code.starts_with("\"use client\";\n"),
        "FROZEN: directive must open the module"
    );

    // FROZEN: section comment format.
    assert!(
        code.contains("// --- glow-button ---"),
        "FROZEN: section comment must name the source component"
    );

    // FROZEN: entry symbol and wrapper.
    assert!(
        code.contains("export default function Page()"),
        "FROZEN: page entry must be the default-exported Page function"
    );
    assert!(
        code.contains("{/* glow-button */}"),
        "FROZEN: usage fragments carry a labelled comment"
    );

    // FROZEN: ordering — imports, body, entry.
    let imports_pos = code.find("import { motion }").unwrap();
    let body_pos = code.find("function GlowButton()").unwrap();
    let entry_pos = code.find("export default function Page()").unwrap();
    assert!(imports_pos < body_pos, "imports must precede bodies");
    assert!(body_pos < entry_pos, "bodies must precede the page entry");

    // FROZEN: exactly one export in the module (the page entry).
    assert_eq!(code.matches("export").count(), 1);
}

#[tokio::test]
async fn module_ends_with_single_newline() {
    let composed = compose_page(&one_button_page(), &registry()).await;
    let code = &composed.artifact.code;
    assert!(code.ends_with('\n'));
    assert!(!code.ends_with("\n\n"));
}

// ---------------------------------------------------------------------------
// Layout Shape
// ---------------------------------------------------------------------------

#[test]
fn layout_structure_snapshot() {
    let layout = generate_layout(&[one_button_page()], "Demo Studio");

    assert!(
        layout.starts_with("import Link from \"next/link\";\n"),
        "FROZEN: layout opens with the Link import"
    );
    assert!(
        layout.contains("export const metadata = {"),
        "FROZEN: metadata block"
    );
    assert!(
        layout.contains("title: \"Demo Studio\""),
        "FROZEN: metadata carries the project name"
    );
    assert!(
        layout.contains("export default function RootLayout"),
        "FROZEN: RootLayout is the default export"
    );
    assert!(layout.contains("<header"), "FROZEN: header present");
    assert!(layout.contains("<footer"), "FROZEN: footer present");
    assert!(layout.contains("{children}"), "FROZEN: children slot");
}

#[test]
fn zero_page_layout_links_root_with_project_name() {
    let layout = generate_layout(&[], "Solo Project");
    assert!(layout.contains("<Link href=\"/\""));
    assert!(layout.contains(">Solo Project</Link>"));
}

// ---------------------------------------------------------------------------
// Payload Shape
// ---------------------------------------------------------------------------

fn artifact(name: &str, slug: &str) -> PageArtifact {
    PageArtifact {
        id: format!("id-{name}"),
        name: name.to_string(),
        slug: slug.to_string(),
        code: String::from("// code\n"),
        component_count: 1,
    }
}

#[test]
fn payload_field_names_are_frozen() {
    let payload = build_export_payload(
        "Demo",
        &[artifact("Home", "home"), artifact("About", "about")],
        "// layout\n",
    );
    let json = serde_json::to_value(&payload).unwrap();

    assert!(json.get("projectName").is_some(), "FROZEN: projectName");
    assert!(json.get("pages").is_some(), "FROZEN: pages");
    assert!(json.get("layout").is_some(), "FROZEN: layout");

    let first = &json["pages"][0];
    assert!(first.get("path").is_some(), "FROZEN: pages[].path");
    assert!(first.get("code").is_some(), "FROZEN: pages[].code");
}

#[test]
fn export_path_scheme_is_frozen() {
    let payload = build_export_payload(
        "Demo",
        &[
            artifact("Home", "home"),
            artifact("About", "about"),
            artifact("", ""),
        ],
        "// layout\n",
    );
    assert_eq!(payload.pages[0].path, "app/page");
    assert_eq!(payload.pages[1].path, "app/about/page");
    assert_eq!(payload.pages[2].path, "app/page-1/page");
}
