//! `extforge build` command

use std::time::Instant;

use anyhow::Result;

use super::status;
use crate::cli::BuildArgs;
use extforge::builder::header::WriteOutcome;
use extforge::ops::{build, BuildOptions};
use extforge::util::GlobalContext;

pub fn execute(args: BuildArgs) -> Result<()> {
    let start = Instant::now();
    let ctx = GlobalContext::new()?;
    let project = ctx.load_project()?;

    status("Building", project.manifest.project_name());

    let opts = BuildOptions {
        dry_run: args.dry_run,
        ..BuildOptions::default()
    };
    let outcome = build(&project, &opts)?;

    if let Some((path, written)) = &outcome.header {
        match written {
            WriteOutcome::Written => status("Writing", path.display()),
            WriteOutcome::Unchanged => status("Checked", path.display()),
            WriteOutcome::WouldWrite => status("Would write", path.display()),
        }
    }
    for action in &outcome.announcements {
        status("Would run", action);
    }
    if let Some(path) = &outcome.install_manifest {
        status("Wrote", path.display());
    }

    let stages: Vec<String> = outcome.completed.iter().map(|s| s.to_string()).collect();
    status(
        "Finished",
        format!(
            "{} in {:.2}s",
            stages.join(", "),
            start.elapsed().as_secs_f64()
        ),
    );

    Ok(())
}
