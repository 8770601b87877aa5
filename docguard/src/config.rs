//! Requirement bundles: which headers, tables and link exclusions apply.
//!
//! Bundles are plain data so one engine serves every documentation layout;
//! they load from TOML:
//!
//! ```toml
//! [[headers]]
//! text = "## Usage"
//! min_count = 2
//! mode = "prefix"
//!
//! [[tables]]
//! section = "## Resources"
//! columns = ["Name", "Type"]
//!
//! [[links.exclude]]
//! marker = "registry.terraform.io/providers/"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::DocGuardError;

/// How a header line is compared against the required text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The whole line equals the header text.
    #[default]
    Exact,
    /// The line starts with the header text; trailing annotations allowed.
    Prefix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRequirement {
    pub text: String,
    #[serde(default = "default_min_count")]
    pub min_count: usize,
    #[serde(default)]
    pub mode: MatchMode,
}

fn default_min_count() -> usize {
    1
}

impl HeaderRequirement {
    pub fn new(text: impl Into<String>, min_count: usize) -> Self {
        Self {
            text: text.into(),
            min_count,
            mode: MatchMode::Exact,
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRequirement {
    pub section: String,
    pub columns: Vec<String>,
}

impl TableRequirement {
    pub fn new<I, S>(section: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            section: section.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// The header line to look for. A bare name means a level-2 header.
    pub fn header_line(&self) -> String {
        let section = self.section.trim();
        if section.starts_with('#') {
            section.to_string()
        } else {
            format!("## {}", section)
        }
    }
}

/// Substring marker for URLs that must not be liveness-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub marker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExclusionRule {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            reason: None,
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        url.contains(&self.marker)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPolicy {
    #[serde(default)]
    pub exclude: Vec<ExclusionRule>,
}

/// The full set of requirements evaluated against one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementBundle {
    #[serde(default = "default_require_non_empty")]
    pub require_non_empty: bool,
    #[serde(default)]
    pub headers: Vec<HeaderRequirement>,
    #[serde(default)]
    pub tables: Vec<TableRequirement>,
    #[serde(default)]
    pub links: LinkPolicy,
}

fn default_require_non_empty() -> bool {
    true
}

impl Default for RequirementBundle {
    /// Conventions of generated module READMEs.
    fn default() -> Self {
        Self {
            require_non_empty: true,
            headers: vec![
                HeaderRequirement::new("## Goals", 1),
                HeaderRequirement::new("## Features", 1),
                HeaderRequirement::new("## Usage", 2),
            ],
            tables: vec![
                TableRequirement::new("## Resources", ["Name", "Type"]),
                TableRequirement::new("## Inputs", ["Name", "Description", "Type", "Required"]),
                TableRequirement::new("## Outputs", ["Name", "Description"]),
            ],
            links: LinkPolicy {
                exclude: vec![ExclusionRule {
                    marker: "registry.terraform.io/providers/".to_string(),
                    reason: Some(
                        "registry answers 200 for provider pages that do not exist".to_string(),
                    ),
                }],
            },
        }
    }
}

impl RequirementBundle {
    /// An empty bundle: no headers, tables or exclusions.
    pub fn empty() -> Self {
        Self {
            require_non_empty: false,
            headers: Vec::new(),
            tables: Vec::new(),
            links: LinkPolicy::default(),
        }
    }

    /// Load and validate a bundle from a TOML file.
    pub fn load(path: &Path) -> Result<Self, DocGuardError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DocGuardError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, DocGuardError> {
        let bundle: Self = toml::from_str(content)?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn to_toml(&self) -> Result<String, DocGuardError> {
        toml::to_string_pretty(self).map_err(|e| DocGuardError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), DocGuardError> {
        let mut seen = HashSet::new();
        for header in &self.headers {
            if header.text.trim().is_empty() {
                return Err(DocGuardError::Config("header text must not be empty".into()));
            }
            if !seen.insert(header.text.as_str()) {
                return Err(DocGuardError::Config(format!(
                    "duplicate header requirement '{}'",
                    header.text
                )));
            }
            if header.min_count == 0 {
                return Err(DocGuardError::Config(format!(
                    "header '{}' must require at least one occurrence",
                    header.text
                )));
            }
        }
        for table in &self.tables {
            if table.section.trim().is_empty() {
                return Err(DocGuardError::Config("table section must not be empty".into()));
            }
            if table.columns.is_empty() {
                return Err(DocGuardError::Config(format!(
                    "table '{}' must list at least one column",
                    table.section
                )));
            }
        }
        if self.links.exclude.iter().any(|r| r.marker.is_empty()) {
            return Err(DocGuardError::Config("exclusion marker must not be empty".into()));
        }
        Ok(())
    }
}
