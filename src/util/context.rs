//! Global context for extforge operations.
//!
//! Provides centralized access to the working directory, the project
//! manifest and the configuration paths.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{find_manifest, Manifest, ManifestError};
use crate::util::config::{global_config_path, load_tools_config, ToolsConfig};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global config file (~/.extforge/config.toml), if a home exists
    config_path: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            config_path: global_config_path(),
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a specific global config file.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find `Extforge.toml` starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        find_manifest(&self.cwd)
    }

    /// Locate and load the project.
    pub fn load_project(&self) -> Result<Project> {
        let manifest_path = self.find_manifest()?;
        let manifest = Manifest::load(&manifest_path)?;
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone());
        let tools = load_tools_config(self.config_path(), &manifest.tools);

        tracing::debug!("loaded manifest {}", manifest_path.display());

        Ok(Project {
            root,
            manifest,
            tools,
        })
    }
}

/// A loaded project: its root directory, manifest and effective tools.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub manifest: Manifest,
    pub tools: ToolsConfig,
}

impl Project {
    /// Resolve a manifest-relative path against the project root.
    pub fn path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// The build temporary root.
    pub fn temp_dir(&self) -> PathBuf {
        self.path(&self.manifest.build.temp_dir)
    }

    /// Directory holding the `.po` sources.
    pub fn translations_dir(&self) -> PathBuf {
        self.path(&self.manifest.translations.source_dir)
    }
}
