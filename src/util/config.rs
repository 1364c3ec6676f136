//! Configuration file support for extforge.
//!
//! Tool locations can be set in two places:
//! - Global: `~/.extforge/config.toml` - User-wide defaults
//! - Project: the `[tools]` table of `Extforge.toml`
//!
//! Project settings take precedence over global ones. When neither names a
//! tool, the `PKG_CONFIG` / `MSGFMT` environment variables are consulted
//! before falling back to the plain executable name.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default dependency-query tool.
pub const DEFAULT_PKG_CONFIG: &str = "pkg-config";

/// Default catalog compiler.
pub const DEFAULT_MSGFMT: &str = "msgfmt";

/// Global extforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External tool overrides
    pub tools: ToolsConfig,
}

/// External tool locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolsConfig {
    /// Path to pkg-config (or pkgconf)
    pub pkg_config: Option<PathBuf>,

    /// Path to msgfmt
    pub msgfmt: Option<PathBuf>,
}

impl ToolsConfig {
    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: &ToolsConfig) {
        if other.pkg_config.is_some() {
            self.pkg_config = other.pkg_config.clone();
        }
        if other.msgfmt.is_some() {
            self.msgfmt = other.msgfmt.clone();
        }
    }

    /// The pkg-config program to run.
    pub fn pkg_config_program(&self) -> PathBuf {
        resolve_tool(self.pkg_config.as_deref(), "PKG_CONFIG", DEFAULT_PKG_CONFIG)
    }

    /// The msgfmt program to run.
    pub fn msgfmt_program(&self) -> PathBuf {
        resolve_tool(self.msgfmt.as_deref(), "MSGFMT", DEFAULT_MSGFMT)
    }
}

fn resolve_tool(configured: Option<&Path>, env_var: &str, default: &str) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
        _ => PathBuf::from(default),
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}

/// Effective tool configuration: global config overlaid with the project's
/// `[tools]` table.
pub fn load_tools_config(global_path: Option<&Path>, project: &ToolsConfig) -> ToolsConfig {
    let mut tools = match global_path {
        Some(path) => Config::load_or_default(path).tools,
        None => ToolsConfig::default(),
    };
    tools.merge(project);
    tools
}

/// Get the global extforge config directory (~/.extforge).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".extforge"))
}

/// Get the global config path (~/.extforge/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}
