//! `extforge generate` command

use anyhow::{bail, Result};

use super::status;
use crate::cli::GenerateArgs;
use extforge::builder::header::{generate_header, WriteOutcome};
use extforge::ops::extension::GENERATOR_NAME;
use extforge::util::GlobalContext;

pub fn execute(args: GenerateArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let (definitions, output) = match (args.definitions, args.output) {
        (Some(definitions), Some(output)) => (ctx.cwd().join(definitions), ctx.cwd().join(output)),
        _ => {
            let project = ctx.load_project()?;
            let Some(header) = &project.manifest.header else {
                bail!(
                    "no [header] section in the manifest\n\
                     help: Add `[header]` with `definitions` and `output`, or pass --definitions and --output"
                );
            };
            (project.path(&header.definitions), project.path(&header.output))
        }
    };

    match generate_header(&definitions, &output, GENERATOR_NAME, args.dry_run)? {
        WriteOutcome::Written => status("Writing", output.display()),
        WriteOutcome::Unchanged => status("Checked", output.display()),
        WriteOutcome::WouldWrite => status("Would write", output.display()),
    }

    Ok(())
}
