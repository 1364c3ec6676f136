//! High-level operations.
//!
//! Each operation works on a loaded [`Project`](crate::util::context::Project)
//! and returns what it did; printing is left to the CLI.

pub mod build;
pub mod data_files;
pub mod doctor;
pub mod extension;
pub mod translations;

pub use build::{build, BuildOptions, BuildOutcome};
pub use doctor::{doctor, format_report, DoctorReport};
pub use translations::build_translations;
