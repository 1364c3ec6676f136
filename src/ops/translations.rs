//! Translation catalog operation.

use anyhow::Result;

use crate::builder::catalog::{discover_catalogs, CatalogBuilder, CatalogReport, Msgfmt};
use crate::util::context::Project;

/// Compile the project's out-of-date catalogs with the configured msgfmt.
pub fn build_translations(project: &Project, dry_run: bool) -> Result<CatalogReport> {
    let sources = discover_catalogs(&project.translations_dir())?;
    tracing::debug!("found {} catalog(s)", sources.len());

    CatalogBuilder::new(
        Msgfmt::new(project.tools.msgfmt_program()),
        project.temp_dir(),
        project.manifest.translations.domain.clone(),
    )
    .dry_run(dry_run)
    .build_report(&sources)
}
