//! extforge - build preparation for native extension modules
//!
//! This crate generates constants headers from declarative definitions,
//! resolves pkg-config flags for the extension, compiles message catalogs
//! incrementally, and runs the build stages in a safe order.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test doubles for the external tools.
///
/// Only compiled for unit tests. Provides recording implementations of
/// the pkg-config and msgfmt seams.
#[cfg(test)]
pub mod test_support;

pub use core::{BuildStage, DefinitionSet, FlagSet, Manifest, NamedItem};
pub use util::context::GlobalContext;
