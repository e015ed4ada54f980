//! CLI command implementations.

pub mod check;
pub mod config;
pub mod nav;
pub mod version;
pub mod views;

use anyhow::{Context, Result};
use fellowship_rbac::{RoleSet, Subject};

/// Parses a comma-separated role list. Blank entries are skipped.
pub fn parse_roles(csv: &str) -> Result<RoleSet> {
    RoleSet::parse_strict(csv.split(',').map(str::trim).filter(|name| !name.is_empty()))
        .with_context(|| format!("Invalid --roles value {csv:?}"))
}

/// Builds the subject the command evaluates for.
pub fn cli_subject(csv: &str) -> Result<Subject> {
    Ok(Subject::new("cli", parse_roles(csv)?))
}
