//! `extforge clean` command

use anyhow::Result;

use super::status;
use crate::cli::CleanArgs;
use extforge::util::fs::remove_dir_all_if_exists;
use extforge::util::GlobalContext;

pub fn execute(_args: CleanArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let project = ctx.load_project()?;

    let temp_dir = project.temp_dir();
    if remove_dir_all_if_exists(&temp_dir)? {
        status("Removed", temp_dir.display());
    }

    Ok(())
}
