//! Configuration management for the Fellowship portal
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (FWC_* prefix, highest precedence)
//! 2. fellowship.local.toml (gitignored, local overrides)
//! 3. fellowship.toml (git-tracked, project config)
//! 4. ~/.config/fellowship/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use paths::{LOCAL_CONFIG_FILE, PROJECT_CONFIG_FILE, Paths};

/// Default path prefix of the administrative area.
pub const DEFAULT_ADMIN_ROUTE_PREFIX: &str = "/portal/admin";

/// Default client storage key of the view-as override.
pub const DEFAULT_VIEW_STORAGE_KEY: &str = "fwc:view";

/// Profile fields members may edit on their own profile.
pub const MEMBER_EDITABLE_FIELDS: [&str; 9] = [
    "bio",
    "testimony",
    "phone",
    "address",
    "preferredContactMethod",
    "doNotContact",
    "volunteerInterests",
    "spiritualGifts",
    "skills",
];

/// Main portal configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub portal: PortalSection,
    pub access: AccessConfig,
    pub view: ViewConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSection {
    pub name: String,
}

impl Default for PortalSection {
    fn default() -> Self {
        Self {
            name: "Fellowship Portal".to_string(),
        }
    }
}

/// Access control settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Paths under this prefix pass the route-based gates.
    pub admin_route_prefix: String,

    /// Replaces [`MEMBER_EDITABLE_FIELDS`] when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_editable_fields: Option<Vec<String>>,
}

impl AccessConfig {
    /// Fields members may edit, falling back to the built-in list.
    pub fn editable_fields(&self) -> Vec<&str> {
        match &self.member_editable_fields {
            Some(fields) => fields.iter().map(String::as_str).collect(),
            None => MEMBER_EDITABLE_FIELDS.to_vec(),
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admin_route_prefix: DEFAULT_ADMIN_ROUTE_PREFIX.to_string(),
            member_editable_fields: None,
        }
    }
}

/// View-as override settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Client storage key the override lives under.
    pub storage_key: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_VIEW_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// JSON or TOML navigation tree replacing the built-in portal menu.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_file: Option<PathBuf>,
}

impl PortalConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Reads a single TOML file without merging other sources.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the portal cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.access.admin_route_prefix.starts_with('/') {
            return Err(ConfigError::ValidationError {
                section: "access",
                reason: format!(
                    "admin_route_prefix must start with '/', got {:?}",
                    self.access.admin_route_prefix
                ),
            });
        }

        if self.view.storage_key.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                section: "view",
                reason: "storage_key must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        if let Some(tree_file) = &self.navigation.tree_file {
            if tree_file.is_relative() {
                self.navigation.tree_file = Some(base_dir.as_ref().join(tree_file));
            }
        }
    }
}
