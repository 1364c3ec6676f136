//! `extforge order` command

use anyhow::{anyhow, Result};

use crate::cli::OrderArgs;
use extforge::core::manifest::ManifestError;
use extforge::core::stage::{compute_order, default_stages, BuildStage};
use extforge::util::GlobalContext;

pub fn execute(args: OrderArgs) -> Result<()> {
    let base: Vec<BuildStage> = if args.stages.is_empty() {
        let ctx = GlobalContext::new()?;
        match ctx.find_manifest() {
            Ok(_) => ctx.load_project()?.manifest.build.stages,
            Err(ManifestError::NotFound { .. }) => default_stages(),
        }
    } else {
        args.stages
            .iter()
            .map(|s| s.parse::<BuildStage>().map_err(|e| anyhow!("invalid stage: {}", e)))
            .collect::<Result<_>>()?
    };

    for stage in compute_order(&base) {
        println!("{}", stage);
    }

    Ok(())
}
