//! Categorised compiler and linker flags.
//!
//! A [`FlagSet`] keeps five ordered buckets. Order is significant (include
//! path precedence, link order), so deduplication keeps the first
//! occurrence of each value and never reorders what survives.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which bucket a flag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    IncludeDir,
    LibraryDir,
    Library,
    ExtraLinkArg,
    ExtraCompileArg,
}

impl FlagKind {
    /// Bucket for a recognised two-character pkg-config prefix.
    pub fn from_prefix(prefix: &str) -> Option<FlagKind> {
        match prefix {
            "-I" => Some(FlagKind::IncludeDir),
            "-L" => Some(FlagKind::LibraryDir),
            "-l" => Some(FlagKind::Library),
            _ => None,
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagKind::IncludeDir => write!(f, "include-dirs"),
            FlagKind::LibraryDir => write!(f, "library-dirs"),
            FlagKind::Library => write!(f, "libraries"),
            FlagKind::ExtraLinkArg => write!(f, "extra-link-args"),
            FlagKind::ExtraCompileArg => write!(f, "extra-compile-args"),
        }
    }
}

/// Build flags for one native extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FlagSet {
    /// Header search paths (`-I`)
    pub include_dirs: Vec<String>,

    /// Library search paths (`-L`)
    pub library_dirs: Vec<String>,

    /// Libraries to link (`-l`)
    pub libraries: Vec<String>,

    /// Linker arguments passed through verbatim
    pub extra_link_args: Vec<String>,

    /// Compiler arguments passed through verbatim
    pub extra_compile_args: Vec<String>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a flag set, deduplicating every bucket.
    pub fn from_buckets(
        include_dirs: Vec<String>,
        library_dirs: Vec<String>,
        libraries: Vec<String>,
        extra_link_args: Vec<String>,
        extra_compile_args: Vec<String>,
    ) -> Self {
        let mut set = FlagSet {
            include_dirs,
            library_dirs,
            libraries,
            extra_link_args,
            extra_compile_args,
        };
        set.dedup();
        set
    }

    /// Mutable access to one bucket.
    pub fn bucket_mut(&mut self, kind: FlagKind) -> &mut Vec<String> {
        match kind {
            FlagKind::IncludeDir => &mut self.include_dirs,
            FlagKind::LibraryDir => &mut self.library_dirs,
            FlagKind::Library => &mut self.libraries,
            FlagKind::ExtraLinkArg => &mut self.extra_link_args,
            FlagKind::ExtraCompileArg => &mut self.extra_compile_args,
        }
    }

    /// Read access to one bucket.
    pub fn bucket(&self, kind: FlagKind) -> &[String] {
        match kind {
            FlagKind::IncludeDir => &self.include_dirs,
            FlagKind::LibraryDir => &self.library_dirs,
            FlagKind::Library => &self.libraries,
            FlagKind::ExtraLinkArg => &self.extra_link_args,
            FlagKind::ExtraCompileArg => &self.extra_compile_args,
        }
    }

    /// Append a value to a bucket. Does not deduplicate.
    pub fn push(&mut self, kind: FlagKind, value: impl Into<String>) {
        self.bucket_mut(kind).push(value.into());
    }

    /// Append every bucket of `other` to the matching bucket of `self`.
    pub fn extend(&mut self, other: FlagSet) {
        self.include_dirs.extend(other.include_dirs);
        self.library_dirs.extend(other.library_dirs);
        self.libraries.extend(other.libraries);
        self.extra_link_args.extend(other.extra_link_args);
        self.extra_compile_args.extend(other.extra_compile_args);
    }

    /// Deduplicate every bucket independently, keeping first occurrences.
    pub fn dedup(&mut self) {
        for kind in [
            FlagKind::IncludeDir,
            FlagKind::LibraryDir,
            FlagKind::Library,
            FlagKind::ExtraLinkArg,
            FlagKind::ExtraCompileArg,
        ] {
            let bucket = self.bucket_mut(kind);
            *bucket = uniq(std::mem::take(bucket));
        }
    }
}

/// Order-preserving deduplication.
pub fn uniq(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
