//! Extforge.toml project manifest.
//!
//! The manifest describes the native extension, the generated header, the
//! translation catalogs and the host stage list. Every section is optional;
//! an empty manifest builds nothing but the (empty) translation stage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::flags::FlagSet;
use crate::core::stage::{default_stages, BuildStage};
use crate::util::config::ToolsConfig;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Extforge.toml";

/// Failure to locate a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `Extforge.toml` in `{}` or any parent directory", .dir.display())]
    NotFound { dir: PathBuf },
}

/// Parsed project manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Manifest {
    pub project: ProjectSection,
    pub header: Option<HeaderSection>,
    pub extension: Option<ExtensionSection>,
    pub translations: TranslationsSection,
    pub build: BuildSection,
    pub data_files: DataFilesSection,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProjectSection {
    /// Project name, used in status output
    pub name: Option<String>,
}

/// Generated constants header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HeaderSection {
    /// Definitions file (TOML), relative to the project root
    pub definitions: PathBuf,

    /// Header to generate, relative to the project root
    pub output: PathBuf,
}

/// Native extension module.
///
/// Unknown keys are rejected, so a misspelt flag bucket (such as
/// `extra_compile_args`) fails loudly instead of building without it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ExtensionSection {
    /// Module name, e.g. `_mypaintlib`
    pub name: String,

    /// Source files handed to the native toolchain
    pub sources: Vec<PathBuf>,

    /// pkg-config packages to query
    pub packages: Vec<String>,

    pub include_dirs: Vec<String>,
    pub library_dirs: Vec<String>,
    pub libraries: Vec<String>,
    pub extra_link_args: Vec<String>,
    pub extra_compile_args: Vec<String>,

    /// Wrapper-generator options; include dirs are appended as `-I` flags
    pub swig_opts: Vec<String>,

    /// Source language (`c` or `c++`)
    pub language: Option<String>,
}

impl ExtensionSection {
    /// Manually specified flags, merged ahead of pkg-config output.
    pub fn flags(&self) -> FlagSet {
        FlagSet {
            include_dirs: self.include_dirs.clone(),
            library_dirs: self.library_dirs.clone(),
            libraries: self.libraries.clone(),
            extra_link_args: self.extra_link_args.clone(),
            extra_compile_args: self.extra_compile_args.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TranslationsSection {
    /// Directory holding `<locale>.po` files
    pub source_dir: PathBuf,

    /// Text domain; compiled catalogs are named `<domain>.mo`
    pub domain: String,
}

impl Default for TranslationsSection {
    fn default() -> Self {
        TranslationsSection {
            source_dir: PathBuf::from("po"),
            domain: "mypaint".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildSection {
    /// Build temporary root, relative to the project root
    pub temp_dir: PathBuf,

    /// Stage list as the host build declares it
    pub stages: Vec<BuildStage>,

    /// External command per stage name
    pub commands: BTreeMap<String, Vec<String>>,
}

impl Default for BuildSection {
    fn default() -> Self {
        BuildSection {
            temp_dir: PathBuf::from("build").join("temp"),
            stages: default_stages(),
            commands: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DataFilesSection {
    /// Fixed (install dir, files) pairs
    pub fixed: Vec<FixedDataFiles>,

    /// Glob mappings from the source tree
    pub patterns: Vec<DataFilePattern>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FixedDataFiles {
    pub target_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DataFilePattern {
    /// Directory the pattern is relative to
    pub source_dir: PathBuf,

    /// Glob, e.g. `*/*.png`
    pub pattern: String,

    /// Install directory the source-relative layout is mirrored under
    pub target_dir: PathBuf,
}

impl Manifest {
    /// Parse a manifest from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid manifest")
    }

    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = crate::util::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Display name of the project.
    pub fn project_name(&self) -> &str {
        self.project.name.as_deref().unwrap_or("project")
    }
}

/// Find the manifest in `dir` (no upward search).
pub fn manifest_in(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(MANIFEST_NAME);
    path.is_file().then_some(path)
}

/// Find the manifest starting from `start` and searching upward.
pub fn find_manifest(start: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = start.to_path_buf();
    loop {
        if let Some(path) = manifest_in(&current) {
            return Ok(path);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: start.to_path_buf(),
            });
        }
    }
}
