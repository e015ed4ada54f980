//! Configuration management commands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use fellowship_config::{ConfigLoader, Paths, PortalConfig};

use crate::style::colors::SemanticStyle;
use crate::style::table::info_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Toml,
}

/// Show the merged configuration.
pub fn show(project: &Path, format: Format) -> Result<()> {
    let config = PortalConfig::load_from_dir(project).context("Failed to load configuration")?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        Format::Toml => println!("{}", toml::to_string_pretty(&config)?),
        Format::Text => {
            println!("{}", "Fellowship Configuration".header());
            println!();

            let sources = Paths::new().existing_sources(project);
            let sources = if sources.is_empty() {
                "(defaults only)".to_string()
            } else {
                sources
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            let tree_file = config
                .navigation
                .tree_file
                .as_ref()
                .map_or_else(|| "(built-in)".to_string(), |p| p.display().to_string());

            println!(
                "{}",
                info_table(&[
                    ("Portal name", config.portal.name.clone()),
                    ("Admin route prefix", config.access.admin_route_prefix.clone()),
                    ("Member-editable fields", config.access.editable_fields().join(", ")),
                    ("View storage key", config.view.storage_key.clone()),
                    ("Navigation tree", tree_file),
                    ("Sources", sources),
                ])
            );
        }
    }

    Ok(())
}

/// Validate configuration files.
pub fn validate(project: &Path, file: Option<&Path>) -> Result<()> {
    let result = match file {
        Some(path) => {
            println!("Validating {}...", path.display());
            PortalConfig::from_file(path).map(|_| ()).map_err(anyhow::Error::from)
        }
        None => {
            println!("Validating configuration in {}...", project.display());
            ConfigLoader::new()
                .with_project_dir(project)
                .load()
                .map(|_| ())
        }
    };

    match result {
        Ok(()) => {
            println!("{} Configuration is valid", "✓".success());
            Ok(())
        }
        Err(e) => {
            println!("{} Configuration validation failed:", "✗".error());
            println!("  {e:#}");
            Err(e)
        }
    }
}
