//! Incremental message catalog compilation.
//!
//! Every `<locale>.po` source compiles to
//! `<temp>/locale/<locale>/LC_MESSAGES/<domain>.mo`, which installs under
//! `locale/<locale>/LC_MESSAGES`. A compiled catalog at least as new as its
//! source is reused as is.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::fs::{ensure_dir, glob_files, modified};
use crate::util::process::ProcessBuilder;

/// Catalog compilation went wrong in a way the compiler did not report.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("`{command}` reported success but `{}` does not exist", .target.display())]
    MissingOutput { command: String, target: PathBuf },

    #[error("cannot derive a locale from `{}`", .source_path.display())]
    NoLocale { source_path: PathBuf },
}

/// Files to install and where, relative to the data install root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallEntry {
    pub install_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl InstallEntry {
    pub fn new(install_dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        InstallEntry {
            install_dir: install_dir.into(),
            files,
        }
    }
}

/// Compiles one source catalog into one binary catalog.
pub trait CatalogCompiler {
    /// Compile `source` into `target`.
    fn compile(&self, source: &Path, target: &Path) -> Result<()>;

    /// Human-readable command line for announcements and errors.
    fn describe(&self, source: &Path, target: &Path) -> String;
}

/// Process-backed [`CatalogCompiler`] running GNU `msgfmt`.
#[derive(Debug, Clone)]
pub struct Msgfmt {
    program: PathBuf,
}

impl Msgfmt {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Msgfmt {
            program: program.as_ref().to_path_buf(),
        }
    }

    fn command(&self, source: &Path, target: &Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .arg(source)
            .arg("-o")
            .arg(target)
    }
}

impl Default for Msgfmt {
    fn default() -> Self {
        Msgfmt::new(crate::util::config::DEFAULT_MSGFMT)
    }
}

impl CatalogCompiler for Msgfmt {
    fn compile(&self, source: &Path, target: &Path) -> Result<()> {
        self.command(source, target).exec_and_check()?;
        Ok(())
    }

    fn describe(&self, source: &Path, target: &Path) -> String {
        self.command(source, target).display_command()
    }
}

/// Where one source catalog compiles to and installs under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub source: PathBuf,
    pub locale: String,
    pub target: PathBuf,
    pub install_dir: PathBuf,
}

impl CatalogEntry {
    /// Compute paths for `source` under `temp_root`.
    pub fn new(source: &Path, temp_root: &Path, domain: &str) -> Result<Self, CatalogError> {
        let locale = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CatalogError::NoLocale {
                source_path: source.to_path_buf(),
            })?;

        let install_dir = Path::new("locale").join(&locale).join("LC_MESSAGES");
        let target = temp_root
            .join(&install_dir)
            .join(format!("{}.mo", domain));

        Ok(CatalogEntry {
            source: source.to_path_buf(),
            locale,
            target,
            install_dir,
        })
    }

    /// Whether the compiled catalog is missing or older than its source.
    pub fn needs_update(&self) -> Result<bool> {
        let Some(target_mtime) = modified(&self.target)? else {
            return Ok(true);
        };
        let Some(source_mtime) = modified(&self.source)? else {
            bail!("source catalog not found: {}", self.source.display());
        };
        Ok(target_mtime < source_mtime)
    }

    fn install_entry(&self) -> InstallEntry {
        InstallEntry::new(self.install_dir.clone(), vec![self.target.clone()])
    }
}

/// What happened to one catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOutcome {
    /// Target was at least as new as the source.
    Fresh,
    /// Compiler ran and produced the target.
    Compiled,
    /// Dry run; this command would have been run.
    WouldCompile { command: String },
}

/// Per-catalog outcomes plus the install entries they produced.
#[derive(Debug, Clone, Default)]
pub struct CatalogReport {
    pub outcomes: Vec<(CatalogEntry, CatalogOutcome)>,
    pub install_entries: Vec<InstallEntry>,
}

impl CatalogReport {
    pub fn compiled_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == CatalogOutcome::Compiled)
            .count()
    }

    pub fn fresh_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == CatalogOutcome::Fresh)
            .count()
    }
}

/// Compiles source catalogs that are out of date.
#[derive(Debug, Clone)]
pub struct CatalogBuilder<C> {
    compiler: C,
    temp_root: PathBuf,
    domain: String,
    dry_run: bool,
}

impl<C: CatalogCompiler> CatalogBuilder<C> {
    pub fn new(compiler: C, temp_root: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
        CatalogBuilder {
            compiler,
            temp_root: temp_root.into(),
            domain: domain.into(),
            dry_run: false,
        }
    }

    /// Report intended work without touching the filesystem or running
    /// the compiler.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Bring one catalog up to date.
    ///
    /// Returns `None` for the install entry only in dry-run mode when the
    /// catalog would have been compiled, since nothing was produced.
    pub fn build(&self, source: &Path) -> Result<(CatalogEntry, CatalogOutcome, Option<InstallEntry>)> {
        let entry = CatalogEntry::new(source, &self.temp_root, &self.domain)?;

        if !entry.needs_update()? {
            tracing::debug!("{} is up to date", entry.target.display());
            let install = entry.install_entry();
            return Ok((entry, CatalogOutcome::Fresh, Some(install)));
        }

        let command = self.compiler.describe(&entry.source, &entry.target);
        if self.dry_run {
            tracing::debug!("would run {}", command);
            return Ok((entry, CatalogOutcome::WouldCompile { command }, None));
        }

        tracing::info!("running {}", command);
        if let Some(dir) = entry.target.parent() {
            ensure_dir(dir)?;
        }
        self.compiler
            .compile(&entry.source, &entry.target)
            .with_context(|| format!("failed to compile catalog for `{}`", entry.locale))?;

        if !entry.target.exists() {
            return Err(CatalogError::MissingOutput {
                command,
                target: entry.target.clone(),
            }
            .into());
        }

        let install = entry.install_entry();
        Ok((entry, CatalogOutcome::Compiled, Some(install)))
    }

    /// Bring every catalog up to date, collecting outcomes in source order.
    pub fn build_report(&self, sources: &[PathBuf]) -> Result<CatalogReport> {
        let mut report = CatalogReport::default();
        for source in sources {
            let (entry, outcome, install) = self.build(source)?;
            report.install_entries.extend(install);
            report.outcomes.push((entry, outcome));
        }
        Ok(report)
    }

    /// Bring every catalog up to date and return the install entries.
    pub fn build_all(&self, sources: &[PathBuf]) -> Result<Vec<InstallEntry>> {
        Ok(self.build_report(sources)?.install_entries)
    }
}

/// Source catalogs (`*.po`) directly inside `dir`, sorted by path.
pub fn discover_catalogs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        tracing::debug!("no translations directory at {}", dir.display());
        return Ok(Vec::new());
    }
    glob_files(dir, "*.po")
}
