//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod doctor;
pub mod flags;
pub mod generate;
pub mod order;
pub mod translations;

/// Print a right-aligned status line to stderr.
pub fn status(label: &str, message: impl std::fmt::Display) {
    eprintln!("{:>12} {}", label, message);
}
