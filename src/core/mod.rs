//! Core data structures for extforge.
//!
//! - Named definitions that drive the generated header
//! - Categorised build flags
//! - Build stages and their ordering
//! - The project manifest

pub mod definitions;
pub mod flags;
pub mod manifest;
pub mod stage;

pub use definitions::{DefinitionSet, NamedItem, Section};
pub use flags::{FlagKind, FlagSet};
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use stage::{compute_order, BuildStage};
