//! Path utilities and XDG directory discovery

use crate::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "fellowship.toml";

/// Local, gitignored override file name.
pub const LOCAL_CONFIG_FILE: &str = "fellowship.local.toml";

/// XDG-compliant paths for the portal tooling
pub struct Paths {
    project_dirs: Option<ProjectDirs>,
}

impl Paths {
    /// Create a new Paths instance with XDG discovery
    pub fn new() -> Self {
        Self {
            project_dirs: ProjectDirs::from("org", "Fellowship", "fellowship"),
        }
    }

    /// Get user config directory (~/.config/fellowship/)
    pub fn user_config_dir(&self) -> Result<PathBuf, ConfigError> {
        self.project_dirs
            .as_ref()
            .map(|p| p.config_dir().to_path_buf())
            .ok_or_else(|| {
                ConfigError::XdgError("Failed to determine user config directory".to_string())
            })
    }

    /// Get user config file path (~/.config/fellowship/config.toml)
    pub fn user_config_file(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.user_config_dir()?.join("config.toml"))
    }

    /// Get project config file path (fellowship.toml)
    pub fn project_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join(PROJECT_CONFIG_FILE)
    }

    /// Get local config file path (fellowship.local.toml)
    pub fn local_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join(LOCAL_CONFIG_FILE)
    }

    /// Config files that exist, lowest precedence first.
    pub fn existing_sources(&self, project_dir: impl AsRef<Path>) -> Vec<PathBuf> {
        let project_dir = project_dir.as_ref();
        let user = self.user_config_file().ok();

        user.into_iter()
            .chain([
                Self::project_config_file(project_dir),
                Self::local_config_file(project_dir),
            ])
            .filter(|path| path.exists())
            .collect()
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}
