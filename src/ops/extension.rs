//! Extension preparation: header generation and flag resolution.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::builder::header::{generate_header, WriteOutcome};
use crate::builder::pkg_config::{
    apply_platform_link_args, swig_include_args, FlagQuery, FlagResolver, PkgConfig, Platform,
    QueryMode,
};
use crate::core::flags::FlagSet;
use crate::core::manifest::ExtensionSection;
use crate::util::context::Project;

/// Tool name recorded in generated file banners.
pub const GENERATOR_NAME: &str = "extforge";

/// Everything the native toolchain needs to build the extension.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionPlan {
    pub name: String,
    pub sources: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub flags: FlagSet,
    pub swig_opts: Vec<String>,
}

/// Regenerate the project's constants header, if it declares one.
pub fn prepare_header(project: &Project, dry_run: bool) -> Result<Option<(PathBuf, WriteOutcome)>> {
    let Some(header) = &project.manifest.header else {
        return Ok(None);
    };

    let output = project.path(&header.output);
    let outcome = generate_header(
        &project.path(&header.definitions),
        &output,
        GENERATOR_NAME,
        dry_run,
    )?;
    Ok(Some((output, outcome)))
}

/// Resolve the final flag set for an extension.
pub fn resolve_extension_flags<Q: FlagQuery>(
    extension: &ExtensionSection,
    query: Q,
    platform: Platform,
) -> Result<FlagSet> {
    let resolver = FlagResolver::new(query);
    let mut flags = resolver.resolve(&extension.packages, extension.flags())?;
    apply_platform_link_args(&mut flags, platform);
    Ok(flags)
}

/// Build the extension plan from resolved flags.
pub fn plan_extension(extension: &ExtensionSection, flags: FlagSet) -> ExtensionPlan {
    let mut swig_opts = extension.swig_opts.clone();
    swig_opts.extend(swig_include_args(&flags));

    ExtensionPlan {
        name: extension.name.clone(),
        sources: extension.sources.clone(),
        language: extension.language.clone(),
        flags,
        swig_opts,
    }
}

/// The pkg-config command lines a resolution would run.
pub fn describe_queries(pkg_config: &PkgConfig, packages: &[String]) -> Vec<String> {
    if packages.is_empty() {
        return Vec::new();
    }
    QueryMode::ALL
        .iter()
        .map(|mode| pkg_config.command(*mode, packages).display_command())
        .collect()
}

/// Where the extension plan is written inside the temp root.
pub fn plan_path(temp_root: &Path, extension: &ExtensionSection) -> PathBuf {
    let name = if extension.name.is_empty() {
        "extension"
    } else {
        extension.name.as_str()
    };
    temp_root.join(format!("{}.plan.json", name))
}
