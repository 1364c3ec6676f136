//! Constants header generation.
//!
//! The header is a pure function of the definition set, which is what makes
//! [`write_if_changed`] sound: identical definitions produce identical
//! bytes, and an untouched file keeps its mtime so the native build does
//! not recompile everything that includes it.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;

use crate::core::definitions::{DefinitionSet, Section};
use crate::util::fs::{read_if_exists, write_atomic};

/// Result of an idempotent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Content differed (or the file was missing) and was written.
    Written,
    /// Content was already identical; nothing was touched.
    Unchanged,
    /// Content differs but this was a dry run.
    WouldWrite,
}

/// Banner placed at the top of every generated file.
pub fn banner(tool: &str) -> String {
    format!("// DO NOT EDIT - autogenerated by {}\n\n", tool)
}

/// Render the header text for a definition set.
///
/// ```text
/// // DO NOT EDIT - autogenerated by extforge
///
/// #define INPUT_PRESSURE 0
/// #define INPUT_COUNT 1
///
/// #define BRUSH_SETTINGS_COUNT 0
///
/// #define STATE_COUNT 0
/// ```
pub fn generate(definitions: &DefinitionSet, tool: &str) -> String {
    let mut out = banner(tool);

    for (i, section) in Section::ALL.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let items = definitions.section(*section);
        for item in items {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "#define {} {}", section.token(item), item.index);
        }
        let _ = writeln!(out, "#define {} {}", section.count_token(), items.len());
    }

    out
}

/// Write `text` to `path` unless the file already holds exactly `text`.
pub fn write_if_changed(path: &Path, text: &str) -> Result<WriteOutcome> {
    write_if_changed_with(path, text, false)
}

/// Like [`write_if_changed`], but never writes when `dry_run` is set.
pub fn write_if_changed_with(path: &Path, text: &str, dry_run: bool) -> Result<WriteOutcome> {
    // Byte comparison: an existing file that is not UTF-8 simply differs.
    if read_if_exists(path)?.as_deref() == Some(text.as_bytes()) {
        tracing::debug!("{} is up to date", path.display());
        return Ok(WriteOutcome::Unchanged);
    }

    if dry_run {
        return Ok(WriteOutcome::WouldWrite);
    }

    write_atomic(path, text)?;
    tracing::info!("wrote {}", path.display());
    Ok(WriteOutcome::Written)
}

/// Load definitions, render them and write the header if it changed.
pub fn generate_header(
    definitions_path: &Path,
    output: &Path,
    tool: &str,
    dry_run: bool,
) -> Result<WriteOutcome> {
    let definitions = DefinitionSet::load(definitions_path)?;
    let text = generate(&definitions, tool);
    write_if_changed_with(output, &text, dry_run)
}
