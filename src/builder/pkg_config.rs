//! Build flag resolution through pkg-config.
//!
//! pkg-config is queried twice, once for link flags and once for compile
//! flags. Tokens with a recognised prefix (`-I`, `-L`, `-l`) are split into
//! their bucket; anything else is kept whole as an extra argument for the
//! side that produced it. The result is appended to caller-supplied flags
//! and every bucket is deduplicated in first-seen order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::flags::{FlagKind, FlagSet};
use crate::util::process::ProcessBuilder;

/// Which flags to ask the query tool for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// `--libs`
    Libs,
    /// `--cflags`
    Cflags,
}

impl QueryMode {
    /// Query order used by [`FlagResolver::resolve`].
    pub const ALL: [QueryMode; 2] = [QueryMode::Libs, QueryMode::Cflags];

    /// Command-line switch for this mode.
    pub fn flag(&self) -> &'static str {
        match self {
            QueryMode::Libs => "--libs",
            QueryMode::Cflags => "--cflags",
        }
    }

    /// Bucket for tokens without a recognised prefix.
    pub fn passthrough_kind(&self) -> FlagKind {
        match self {
            QueryMode::Libs => FlagKind::ExtraLinkArg,
            QueryMode::Cflags => FlagKind::ExtraCompileArg,
        }
    }
}

/// Source of raw pkg-config output.
pub trait FlagQuery {
    /// Run one query and return its standard output.
    fn query(&self, mode: QueryMode, packages: &[String]) -> Result<String>;
}

/// Process-backed [`FlagQuery`] running a pkg-config compatible executable.
#[derive(Debug, Clone)]
pub struct PkgConfig {
    program: PathBuf,
}

impl PkgConfig {
    pub fn new(program: impl AsRef<Path>) -> Self {
        PkgConfig {
            program: program.as_ref().to_path_buf(),
        }
    }

    /// The command a query would run, for dry-run announcements.
    pub fn command(&self, mode: QueryMode, packages: &[String]) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .arg(mode.flag())
            .args(packages)
    }
}

impl Default for PkgConfig {
    fn default() -> Self {
        PkgConfig::new(crate::util::config::DEFAULT_PKG_CONFIG)
    }
}

impl FlagQuery for PkgConfig {
    fn query(&self, mode: QueryMode, packages: &[String]) -> Result<String> {
        let output = self.command(mode, packages).exec_and_check()?;
        String::from_utf8(output.stdout)
            .with_context(|| format!("{} output is not valid UTF-8", self.program.display()))
    }
}

/// Split whitespace-separated query output into flag buckets.
pub fn classify(output: &str, mode: QueryMode) -> FlagSet {
    let mut flags = FlagSet::new();
    for token in output.split_whitespace() {
        let prefix_kind = token.get(..2).and_then(FlagKind::from_prefix);
        match prefix_kind {
            Some(kind) => flags.push(kind, &token[2..]),
            None => flags.push(mode.passthrough_kind(), token),
        }
    }
    flags
}

/// Resolves external library flags and merges them with manual options.
#[derive(Debug, Clone)]
pub struct FlagResolver<Q> {
    query: Q,
}

impl<Q: FlagQuery> FlagResolver<Q> {
    pub fn new(query: Q) -> Self {
        FlagResolver { query }
    }

    /// Query every mode for `packages` and merge the result into `base`.
    ///
    /// Query failures propagate; there is no fallback flag set.
    pub fn resolve(&self, packages: &[String], base: FlagSet) -> Result<FlagSet> {
        let mut merged = base;

        if !packages.is_empty() {
            for mode in QueryMode::ALL {
                let output = self.query.query(mode, packages).with_context(|| {
                    format!(
                        "failed to query {} for {}",
                        mode.flag(),
                        packages.join(" ")
                    )
                })?;
                let classified = classify(&output, mode);
                tracing::debug!(
                    "{} {}: {} include dirs, {} libraries",
                    mode.flag(),
                    packages.join(" "),
                    classified.include_dirs.len(),
                    classified.libraries.len()
                );
                merged.extend(classified);
            }
        }

        merged.dedup();
        Ok(merged)
    }
}

/// Target platform family for link-argument policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn host() -> Self {
        if cfg!(unix) {
            Platform::Posix
        } else {
            Platform::Windows
        }
    }
}

/// Append platform-conditional link arguments.
///
/// On POSIX targets the extension is linked with `-Wl,-z,origin` so an
/// `$ORIGIN`-relative runtime search path resolves.
pub fn apply_platform_link_args(flags: &mut FlagSet, platform: Platform) {
    if platform == Platform::Posix {
        flags.push(FlagKind::ExtraLinkArg, "-Wl,-z,origin");
        flags.dedup();
    }
}

/// `-I<dir>` for every include dir, for wrapper-generator options.
pub fn swig_include_args(flags: &FlagSet) -> Vec<String> {
    flags
        .include_dirs
        .iter()
        .map(|dir| format!("-I{}", dir))
        .collect()
}
