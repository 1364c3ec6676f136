//! Build steps: header generation, flag resolution, catalog compilation,
//! and stage orchestration.

pub mod catalog;
pub mod header;
pub mod orchestrator;
pub mod pkg_config;

pub use catalog::{CatalogBuilder, CatalogCompiler, CatalogEntry, InstallEntry, Msgfmt};
pub use header::{generate, write_if_changed, WriteOutcome};
pub use orchestrator::{BuildOrchestrator, StageOutput, StageRunner};
pub use pkg_config::{FlagQuery, FlagResolver, PkgConfig, Platform};
