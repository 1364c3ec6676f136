//! `extforge translations` command

use anyhow::Result;

use super::status;
use crate::cli::TranslationsArgs;
use extforge::builder::catalog::CatalogOutcome;
use extforge::ops::build_translations;
use extforge::util::GlobalContext;

pub fn execute(args: TranslationsArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let project = ctx.load_project()?;

    let report = build_translations(&project, args.dry_run)?;

    for (entry, outcome) in &report.outcomes {
        match outcome {
            CatalogOutcome::Fresh => status("Fresh", &entry.locale),
            CatalogOutcome::Compiled => status("Compiled", entry.target.display()),
            CatalogOutcome::WouldCompile { command } => status("Would run", command),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.install_entries)?);
    } else {
        status(
            "Finished",
            format!(
                "{} compiled, {} up to date",
                report.compiled_count(),
                report.fresh_count()
            ),
        );
    }

    Ok(())
}
