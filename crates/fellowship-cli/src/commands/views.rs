//! View listing command.

use anyhow::{Context, Result};
use fellowship_config::ConfigLoader;
use fellowship_rbac::{MemoryStorage, ViewMatrix, ViewOverrideStore, ViewRole, ViewSwitcher};

use super::cli_subject;
use crate::style::colors::SemanticStyle;
use crate::style::table::styled_table;

pub fn run(roles: &str, active: Option<&str>) -> Result<()> {
    let subject = cli_subject(roles)?;
    let matrix = ViewMatrix::standard();
    let config = ConfigLoader::new()
        .load()
        .context("Failed to load configuration")?;
    let store = ViewOverrideStore::client_with_config(MemoryStorage::new(), &config.view);
    let switcher = ViewSwitcher::new(&subject, &matrix, &store);

    if let Some(name) = active {
        let view: ViewRole = name.parse().context("Invalid --active value")?;
        if let Err(err) = switcher.select(view) {
            println!("{} {err}; showing real roles", "⚠".warning());
        }
    }

    let options = switcher.options();
    if options.is_empty() {
        println!("{}", "(no views available)".muted());
        return Ok(());
    }

    let current = switcher.active();
    let rows: Vec<Vec<String>> = options
        .iter()
        .map(|view| {
            let marker = if Some(*view) == current { "●" } else { "" };
            vec![
                view.to_string(),
                view.rank().to_string(),
                marker.to_string(),
            ]
        })
        .collect();
    println!("{}", styled_table(&["View", "Rank", "Active"], &rows));

    let availability = if switcher.is_available() {
        "shown".success()
    } else {
        "hidden".muted()
    };
    println!("Switcher: {availability}");

    if switcher.is_previewing() {
        println!("{} previewing a lower-authority view", "Preview:".warning());
    }

    Ok(())
}
