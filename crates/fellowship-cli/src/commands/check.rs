//! Gate evaluation command.

use std::process::ExitCode;

use anyhow::{Context, Result};
use fellowship_config::ConfigLoader;
use fellowship_rbac::{AccessEnforcer, AccessRules, Gate};

use super::cli_subject;
use crate::style::colors::SemanticStyle;

/// Prints `allow` or `deny`. Exits 0 on allow and 1 on deny.
pub fn run(gate: &str, roles: &str, path: Option<&str>, anonymous: bool) -> Result<ExitCode> {
    let gate: Gate = gate.parse().context("Invalid gate")?;
    let config = ConfigLoader::new()
        .load()
        .context("Failed to load configuration")?;
    let enforcer = AccessEnforcer::new(AccessRules::from(&config.access));

    let subject = if anonymous {
        None
    } else {
        Some(cli_subject(roles)?)
    };

    match enforcer.enforce(gate, subject.as_ref(), path) {
        Ok(()) => {
            println!("{}", "allow".success());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", "deny".error());
            tracing::debug!(error = %err, "Gate denied");
            Ok(ExitCode::FAILURE)
        }
    }
}
