//! Required section headers with minimum occurrence counts.
//!
//! Matching is line-anchored: the header must start at column 0. Fenced code
//! blocks are not tracked, so a header-like line inside a code fence counts.

use crate::config::{HeaderRequirement, MatchMode};
use crate::core::Finding;
use crate::document::Document;
use crate::rules::Rule;

/// Count lines matching `text` under `mode`. Trailing whitespace is ignored.
pub fn count_header_occurrences(document: &Document, text: &str, mode: MatchMode) -> usize {
    let text = text.trim_end();
    document
        .lines()
        .filter(|line| match mode {
            MatchMode::Exact => *line == text,
            MatchMode::Prefix => line.starts_with(text),
        })
        .count()
}

pub struct HeaderRule {
    requirement: HeaderRequirement,
}

impl HeaderRule {
    pub fn new(requirement: HeaderRequirement) -> Self {
        Self { requirement }
    }
}

impl Rule for HeaderRule {
    fn id(&self) -> &str {
        "required_header"
    }

    fn name(&self) -> &str {
        "Required header"
    }

    fn check(&self, document: &Document) -> Finding {
        let req = &self.requirement;
        let found = count_header_occurrences(document, &req.text, req.mode);
        if found >= req.min_count {
            Finding::pass(
                self.id(),
                &req.text,
                format!(
                    "found {} occurrence(s) of '{}' (required at least {})",
                    found, req.text, req.min_count
                ),
            )
        } else {
            Finding::fail(
                self.id(),
                &req.text,
                format!(
                    "found {} occurrence(s) of '{}', required at least {}",
                    found, req.text, req.min_count
                ),
            )
        }
    }
}
