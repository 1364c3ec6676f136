//! Build stages and their execution order.
//!
//! The host build declares a base list of stages. Extension compilation
//! produces generated wrapper sources that source packaging picks up, so it
//! must run first; translation compilation only reads static `.po` files
//! and always runs last.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named unit of the overall build sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildStage {
    /// Compile the native extension (`build_ext`)
    ExtensionCompile,
    /// Package pure sources (`build_py`)
    SourcePackage,
    /// Compile message catalogs (`build_translations`)
    TranslationCompile,
    /// Any other stage the host declares; not reordered
    Other(String),
}

impl BuildStage {
    /// Name of this stage as the host build knows it.
    pub fn name(&self) -> &str {
        match self {
            BuildStage::ExtensionCompile => "build_ext",
            BuildStage::SourcePackage => "build_py",
            BuildStage::TranslationCompile => "build_translations",
            BuildStage::Other(name) => name,
        }
    }
}

impl FromStr for BuildStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "" => Err("stage name cannot be empty".to_string()),
            "build_ext" => Ok(BuildStage::ExtensionCompile),
            "build_py" => Ok(BuildStage::SourcePackage),
            "build_translations" => Ok(BuildStage::TranslationCompile),
            other => Ok(BuildStage::Other(other.to_string())),
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for BuildStage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for BuildStage {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The stages a plain host build runs, in host order.
pub fn default_stages() -> Vec<BuildStage> {
    vec![
        BuildStage::SourcePackage,
        BuildStage::ExtensionCompile,
        BuildStage::Other("build_scripts".to_string()),
    ]
}

/// Compute the execution order from the host's base ordering.
///
/// Extension compilation moves to the front, everything else keeps its
/// relative order, and exactly one translation stage is appended at the
/// end whether or not the base list mentioned it.
pub fn compute_order(base: &[BuildStage]) -> Vec<BuildStage> {
    let extension = base
        .iter()
        .filter(|s| **s == BuildStage::ExtensionCompile);
    let rest = base.iter().filter(|s| {
        **s != BuildStage::ExtensionCompile && **s != BuildStage::TranslationCompile
    });

    extension
        .chain(rest)
        .cloned()
        .chain(std::iter::once(BuildStage::TranslationCompile))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn other(name: &str) -> BuildStage {
        BuildStage::Other(name.to_string())
    }

    #[test]
    fn test_extension_moves_to_front() {
        let base = vec![other("x"), BuildStage::ExtensionCompile, other("y")];
        assert_eq!(
            compute_order(&base),
            vec![
                BuildStage::ExtensionCompile,
                other("x"),
                other("y"),
                BuildStage::TranslationCompile,
            ]
        );
    }

    #[test]
    fn test_default_host_order() {
        let order: Vec<String> = compute_order(&default_stages())
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            order,
            vec!["build_ext", "build_py", "build_scripts", "build_translations"]
        );
    }

    #[test]
    fn test_translations_always_last_and_once() {
        let base = vec![
            BuildStage::TranslationCompile,
            BuildStage::SourcePackage,
            BuildStage::ExtensionCompile,
        ];
        assert_eq!(
            compute_order(&base),
            vec![
                BuildStage::ExtensionCompile,
                BuildStage::SourcePackage,
                BuildStage::TranslationCompile,
            ]
        );
    }

    #[test]
    fn test_without_extension_stage() {
        assert_eq!(compute_order(&[]), vec![BuildStage::TranslationCompile]);
        assert_eq!(
            compute_order(&[BuildStage::SourcePackage]),
            vec![BuildStage::SourcePackage, BuildStage::TranslationCompile]
        );
    }

    #[test]
    fn test_parse_stage_names() {
        assert_eq!("build_ext".parse::<BuildStage>(), Ok(BuildStage::ExtensionCompile));
        assert_eq!("build_py".parse::<BuildStage>(), Ok(BuildStage::SourcePackage));
        assert_eq!("install_data".parse::<BuildStage>(), Ok(other("install_data")));
        assert!("".parse::<BuildStage>().is_err());
    }
}
