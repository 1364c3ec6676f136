//! `extforge doctor` command

use anyhow::Result;

use crate::cli::DoctorArgs;
use extforge::core::manifest::ManifestError;
use extforge::ops::{doctor, format_report};
use extforge::util::config::load_tools_config;
use extforge::util::GlobalContext;

pub fn execute(_args: DoctorArgs, verbose: bool) -> Result<()> {
    let ctx = GlobalContext::new()?;

    // Outside a project only the global config applies; a broken manifest
    // is still an error.
    let tools = match ctx.find_manifest() {
        Ok(_) => ctx.load_project()?.tools,
        Err(ManifestError::NotFound { .. }) => {
            load_tools_config(ctx.config_path(), &Default::default())
        }
    };

    let report = doctor(&tools);
    print!("{}", format_report(&report, verbose));

    if !report.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}
