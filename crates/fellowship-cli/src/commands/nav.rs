//! Navigation menu command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fellowship_config::ConfigLoader;
use fellowship_rbac::views::display_roles;
use fellowship_rbac::{NavNode, ViewMatrix, ViewRole, filter_nav, portal};
use serde::Deserialize;
use tracing::debug;

use super::cli_subject;
use crate::style::colors::SemanticStyle;

/// Where the unfiltered tree comes from.
pub enum TreeSource {
    /// Configured tree file, or the built-in main menu.
    Main,
    Footer,
    File(PathBuf),
}

/// TOML tree files hold the top-level nodes as `[[item]]` tables.
#[derive(Deserialize)]
struct TomlTree {
    #[serde(default, rename = "item")]
    items: Vec<NavNode>,
}

/// Reads a navigation tree from a JSON (`.json`) or TOML (`.toml`) file.
pub fn load_tree(path: &Path) -> Result<Vec<NavNode>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tree file {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON tree {}", path.display())),
        Some("toml") => {
            let tree: TomlTree = toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML tree {}", path.display()))?;
            Ok(tree.items)
        }
        _ => bail!(
            "Unsupported tree file {} (expected .json or .toml)",
            path.display()
        ),
    }
}

fn resolve_tree(source: TreeSource) -> Result<Vec<NavNode>> {
    match source {
        TreeSource::File(path) => load_tree(&path),
        TreeSource::Footer => Ok(portal::footer_nav()),
        TreeSource::Main => {
            let config = ConfigLoader::new()
                .load()
                .context("Failed to load configuration")?;
            match config.navigation.tree_file {
                Some(path) => {
                    debug!(path = %path.display(), "Using configured navigation tree");
                    load_tree(&path)
                }
                None => Ok(portal::main_nav()),
            }
        }
    }
}

/// Renders nodes as an indented outline.
pub fn render_outline(nodes: &[NavNode]) -> String {
    let mut out = String::new();
    write_outline(&mut out, nodes, 0);
    out
}

fn write_outline(out: &mut String, nodes: &[NavNode], depth: usize) {
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        match &node.href {
            Some(href) => {
                out.push_str(&node.label);
                out.push_str("  ");
                out.push_str(&href.muted());
                if node.external {
                    out.push_str(" ↗");
                }
            }
            None => out.push_str(&node.label.header()),
        }
        out.push('\n');
        write_outline(out, &node.children, depth + 1);
    }
}

pub fn run(roles: &str, view: Option<&str>, source: TreeSource, json: bool) -> Result<()> {
    let subject = cli_subject(roles)?;
    let view: Option<ViewRole> = view
        .map(str::parse)
        .transpose()
        .context("Invalid --view value")?;

    let shown = display_roles(&subject, view, &ViewMatrix::standard());
    let tree = resolve_tree(source)?;
    let filtered = filter_nav(&tree, &shown);

    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
    } else if filtered.is_empty() {
        println!("{}", "(no visible navigation)".muted());
    } else {
        print!("{}", render_outline(&filtered));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fellowship_rbac::Role;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_json_tree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nav.json");
        fs::write(
            &path,
            r#"[{"label": "Home", "href": "/", "minRole": "viewer"}]"#,
        )
        .unwrap();

        let tree = load_tree(&path).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].min_role, Some(Role::Viewer));
    }

    #[test]
    fn test_load_toml_tree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nav.toml");
        fs::write(
            &path,
            r#"
[[item]]
label = "Pathways"
minRole = "student"

[[item.children]]
label = "Journey"
href = "/portal/pathways/journey"
"#,
        )
        .unwrap();

        let tree = load_tree(&path).unwrap();
        assert_eq!(tree[0].label, "Pathways");
        assert_eq!(tree[0].children[0].label, "Journey");
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nav.yaml");
        fs::write(&path, "").unwrap();
        assert!(load_tree(&path).is_err());
    }

    #[test]
    fn test_render_outline_indents_children() {
        let tree = vec![
            NavNode::section("Overview").children([NavNode::link("Journal", "/journal")]),
        ];
        let out = render_outline(&tree);
        assert!(out.contains("Overview\n"));
        assert!(out.contains("  Journal  /journal\n"));
    }
}
