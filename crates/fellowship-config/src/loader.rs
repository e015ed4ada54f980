//! Configuration loader with multi-source merging

use crate::{Paths, PortalConfig};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "FWC";

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    include_user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            include_user_config: true,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "FWC")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Skip `~/.config/fellowship/config.toml`.
    pub fn without_user_config(mut self) -> Self {
        self.include_user_config = false;
        self
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<PortalConfig> {
        let toml_file = |path: PathBuf| {
            config::File::from(path)
                .required(false)
                .format(config::FileFormat::Toml)
        };
        let mut builder = config::Config::builder();

        // 1. Built-in defaults
        let defaults = PortalConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. User config (~/.config/fellowship/config.toml)
        if self.include_user_config {
            if let Ok(user_config_file) = Paths::new().user_config_file() {
                builder = builder.add_source(toml_file(user_config_file));
            }
        }

        // 3. Project config (fellowship.toml)
        builder = builder.add_source(toml_file(Paths::project_config_file(&self.project_dir)));

        // 4. Local config (fellowship.local.toml)
        builder = builder.add_source(toml_file(Paths::local_config_file(&self.project_dir)));

        // 5. Environment variables (FWC_SECTION__KEY)
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("access.member_editable_fields")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let mut portal_config: PortalConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        portal_config.resolve_paths(&self.project_dir);
        portal_config
            .validate()
            .context("Configuration failed validation")?;

        debug!(project_dir = %self.project_dir.display(), "Configuration loaded");
        Ok(portal_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
