//! Shared layout shell generation.
//!
//! Every exported project gets one layout module: header and footer
//! navigation over the project's pages plus a metadata block carrying the
//! project name. The first page maps to the project root, every later page
//! to `/<slug>`. A project with no pages still gets a deterministic shell
//! with a single root link labelled by the project name.

use crate::export::resolve_slugs;
use crate::utils::{escape_js_string, escape_text_content};
use crate::Page;

/// One navigation target in the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: String,
    pub href: String,
}

/// Navigation entries for a page list, in page order.
pub fn nav_entries(pages: &[Page], project_name: &str) -> Vec<NavEntry> {
    if pages.is_empty() {
        return vec![NavEntry {
            label: project_name.to_string(),
            href: "/".to_string(),
        }];
    }

    let pairs: Vec<(&str, &str)> = pages
        .iter()
        .map(|page| (page.name.as_str(), page.slug.as_str()))
        .collect();
    let slugs = resolve_slugs(&pairs);

    pages
        .iter()
        .zip(slugs)
        .enumerate()
        .map(|(index, (page, slug))| NavEntry {
            label: if page.name.is_empty() {
                slug.clone()
            } else {
                page.name.clone()
            },
            href: if index == 0 {
                "/".to_string()
            } else {
                format!("/{slug}")
            },
        })
        .collect()
}

/// Generate the layout module for a project. Pure function of its inputs.
pub fn generate_layout(pages: &[Page], project_name: &str) -> String {
    let entries = nav_entries(pages, project_name);

    let mut links = String::new();
    for entry in &entries {
        links.push_str(&format!(
            "            <Link href=\"{}\" className=\"text-sm text-neutral-400 transition-colors hover:text-neutral-50\">{}</Link>\n",
            entry.href,
            escape_text_content(&entry.label)
        ));
    }

    let mut footer_links = String::new();
    for entry in &entries {
        footer_links.push_str(&format!(
            "            <Link href=\"{}\" className=\"text-xs text-neutral-500 hover:text-neutral-300\">{}</Link>\n",
            entry.href,
            escape_text_content(&entry.label)
        ));
    }

    let title = escape_js_string(project_name);
    let brand = escape_text_content(project_name);

    format!(
        r#"import Link from "next/link";

export const metadata = {{
  title: "{title}",
}};

export default function RootLayout({{ children }}: {{ children: React.ReactNode }}) {{
  return (
    <html lang="en">
      <body className="min-h-screen bg-neutral-950 text-neutral-50 antialiased">
        <header className="flex items-center justify-between border-b border-neutral-800 px-6 py-4">
          <span className="text-sm font-semibold tracking-wide">{brand}</span>
          <nav className="flex items-center gap-4">
{links}          </nav>
        </header>
        {{children}}
        <footer className="flex items-center justify-between border-t border-neutral-800 px-6 py-4">
          <span className="text-xs text-neutral-500">{brand}</span>
          <nav className="flex items-center gap-4">
{footer_links}          </nav>
        </footer>
      </body>
    </html>
  );
}}
"#
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
