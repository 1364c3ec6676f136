//! Data file install mapping.
//!
//! Fixed entries are passed through; each glob pattern maps matching files
//! to `<target-dir>/<directory relative to source-dir>`, one entry per file.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::catalog::InstallEntry;
use crate::core::manifest::DataFilesSection;
use crate::util::fs::{glob_files, relative_path};

/// Collect install entries for the project's data files.
pub fn collect_data_files(root: &Path, section: &DataFilesSection) -> Result<Vec<InstallEntry>> {
    let mut entries: Vec<InstallEntry> = section
        .fixed
        .iter()
        .map(|fixed| InstallEntry::new(fixed.target_dir.clone(), fixed.files.clone()))
        .collect();

    for pattern in &section.patterns {
        let source_dir = root.join(&pattern.source_dir);
        for file in glob_files(&source_dir, &pattern.pattern)? {
            let rel = relative_path(&source_dir, &file);
            let rel_dir = rel.parent().map(Path::to_path_buf).unwrap_or_default();
            let target_dir = join_clean(&pattern.target_dir, &rel_dir);
            let file = relative_path(root, &file);
            entries.push(InstallEntry::new(target_dir, vec![file]));
        }
    }

    Ok(entries)
}

fn join_clean(base: &Path, rel: &Path) -> PathBuf {
    if rel.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(rel)
    }
}
