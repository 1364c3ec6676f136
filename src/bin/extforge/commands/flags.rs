//! `extforge flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use extforge::builder::pkg_config::{apply_platform_link_args, FlagResolver, PkgConfig, Platform};
use extforge::core::flags::{FlagKind, FlagSet};
use extforge::core::manifest::ManifestError;
use extforge::util::config::load_tools_config;
use extforge::util::GlobalContext;

pub fn execute(args: FlagsArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    // Explicit packages work outside a project.
    let project = match ctx.find_manifest() {
        Ok(_) => Some(ctx.load_project()?),
        Err(ManifestError::NotFound { .. }) if !args.packages.is_empty() => None,
        Err(e) => return Err(e.into()),
    };

    let (packages, base, tools) = match &project {
        Some(project) => {
            let extension = project.manifest.extension.clone().unwrap_or_default();
            (extension.packages.clone(), extension.flags(), project.tools.clone())
        }
        None => (
            Vec::new(),
            FlagSet::default(),
            load_tools_config(ctx.config_path(), &Default::default()),
        ),
    };
    let packages = if args.packages.is_empty() {
        packages
    } else {
        args.packages
    };

    let resolver = FlagResolver::new(PkgConfig::new(tools.pkg_config_program()));
    let mut flags = resolver.resolve(&packages, base)?;
    if !args.no_platform {
        apply_platform_link_args(&mut flags, Platform::host());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&flags)?);
        return Ok(());
    }

    for kind in [
        FlagKind::IncludeDir,
        FlagKind::LibraryDir,
        FlagKind::Library,
        FlagKind::ExtraCompileArg,
        FlagKind::ExtraLinkArg,
    ] {
        let values = flags.bucket(kind);
        if !values.is_empty() {
            println!("{}: {}", kind, values.join(" "));
        }
    }

    Ok(())
}
