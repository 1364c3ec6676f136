//! Named definitions that drive the generated constants header.
//!
//! A [`DefinitionSet`] holds three ordered sequences (inputs, settings,
//! states). Each item becomes one `#define` in the header, bound to its
//! index, so indices must be dense and in order.
//!
//! ```toml
//! [[inputs]]
//! name = "pressure"
//!
//! [[settings]]
//! name = "Opaque"
//! cname = "opaque"
//!
//! [[states]]
//! name = "x"
//! index = 0
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One definition: a stable display name bound to a zero-based index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedItem {
    /// Display name
    pub name: String,

    /// Position within its section
    pub index: usize,

    /// Identifier used for the constant, when it differs from `name`.
    /// Only settings and states have one; inputs are always named by `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
}

impl NamedItem {
    /// Create an item whose constant name equals its display name.
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        NamedItem {
            name: name.into(),
            index,
            cname: None,
        }
    }

    /// Use a separate identifier for the generated constant.
    pub fn with_cname(mut self, cname: impl Into<String>) -> Self {
        self.cname = Some(cname.into());
        self
    }

    /// The name the constant is derived from.
    pub fn const_name(&self) -> &str {
        self.cname.as_deref().unwrap_or(&self.name)
    }
}

/// The three sections of a definitions file, in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Inputs,
    Settings,
    States,
}

impl Section {
    /// All sections in the order they appear in the header.
    pub const ALL: [Section; 3] = [Section::Inputs, Section::Settings, Section::States];

    /// Token prefix for items of this section.
    pub fn tag(&self) -> &'static str {
        match self {
            Section::Inputs => "INPUT_",
            Section::Settings => "BRUSH_",
            Section::States => "STATE_",
        }
    }

    /// Token for the trailing count constant.
    pub fn count_token(&self) -> &'static str {
        match self {
            Section::Inputs => "INPUT_COUNT",
            Section::Settings => "BRUSH_SETTINGS_COUNT",
            Section::States => "STATE_COUNT",
        }
    }

    /// The name a constant in this section is derived from.
    pub fn item_name<'a>(&self, item: &'a NamedItem) -> &'a str {
        match self {
            Section::Inputs => &item.name,
            Section::Settings | Section::States => item.const_name(),
        }
    }

    /// Token for a single item.
    pub fn token(&self, item: &NamedItem) -> String {
        format!("{}{}", self.tag(), self.item_name(item).to_uppercase())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Inputs => write!(f, "inputs"),
            Section::Settings => write!(f, "settings"),
            Section::States => write!(f, "states"),
        }
    }
}

/// A definition set failed validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("{section}: `{name}` has index {found}, expected {expected}")]
    IndexMismatch {
        section: Section,
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("{section}: `{name}` is not a valid identifier fragment")]
    InvalidName { section: Section, name: String },

    #[error("generated constant `{token}` is defined more than once")]
    DuplicateToken { token: String },
}

/// Ordered definitions for the three header sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefinitionSet {
    inputs: Vec<NamedItem>,
    settings: Vec<NamedItem>,
    states: Vec<NamedItem>,
}

/// Definitions file as written on disk; indices are optional there.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawDefinitions {
    inputs: Vec<RawInput>,
    settings: Vec<RawItem>,
    states: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawItem {
    name: String,
    index: Option<usize>,
    cname: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInput {
    name: String,
    index: Option<usize>,
}

impl From<RawInput> for RawItem {
    fn from(raw: RawInput) -> Self {
        RawItem {
            name: raw.name,
            index: raw.index,
            cname: None,
        }
    }
}

fn from_raw(items: Vec<RawItem>) -> Vec<NamedItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(position, raw)| NamedItem {
            name: raw.name,
            index: raw.index.unwrap_or(position),
            cname: raw.cname,
        })
        .collect()
}

fn is_identifier_fragment(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl DefinitionSet {
    /// Build a validated definition set.
    pub fn new(
        inputs: Vec<NamedItem>,
        settings: Vec<NamedItem>,
        states: Vec<NamedItem>,
    ) -> Result<Self, DefinitionError> {
        let set = DefinitionSet {
            inputs,
            settings,
            states,
        };
        set.validate()?;
        Ok(set)
    }

    /// Parse a definitions file from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let raw: RawDefinitions = toml::from_str(contents).context("invalid definitions file")?;
        let set = DefinitionSet::new(
            from_raw(raw.inputs.into_iter().map(RawItem::from).collect()),
            from_raw(raw.settings),
            from_raw(raw.states),
        )?;
        Ok(set)
    }

    /// Load a definitions file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = crate::util::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to load definitions from {}", path.display()))
    }

    pub fn inputs(&self) -> &[NamedItem] {
        &self.inputs
    }

    pub fn settings(&self) -> &[NamedItem] {
        &self.settings
    }

    pub fn states(&self) -> &[NamedItem] {
        &self.states
    }

    /// Items of one section, in index order.
    pub fn section(&self, section: Section) -> &[NamedItem] {
        match section {
            Section::Inputs => &self.inputs,
            Section::Settings => &self.settings,
            Section::States => &self.states,
        }
    }

    /// Total number of items across all sections.
    pub fn len(&self) -> usize {
        self.inputs.len() + self.settings.len() + self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check index density, identifier shape, and token uniqueness.
    ///
    /// Tokens are checked across the whole header, including the `_COUNT`
    /// trailers: a setting named `settings_count` would otherwise shadow
    /// `BRUSH_SETTINGS_COUNT`.
    fn validate(&self) -> Result<(), DefinitionError> {
        let mut seen: HashSet<String> = HashSet::new();
        for section in Section::ALL {
            seen.insert(section.count_token().to_string());
        }

        for section in Section::ALL {
            for (expected, item) in self.section(section).iter().enumerate() {
                if item.index != expected {
                    return Err(DefinitionError::IndexMismatch {
                        section,
                        name: item.name.clone(),
                        expected,
                        found: item.index,
                    });
                }

                if !is_identifier_fragment(section.item_name(item)) {
                    return Err(DefinitionError::InvalidName {
                        section,
                        name: section.item_name(item).to_string(),
                    });
                }

                let token = section.token(item);
                if !seen.insert(token.clone()) {
                    return Err(DefinitionError::DuplicateToken { token });
                }
            }
        }

        Ok(())
    }
}
