//! Structural rules evaluated synchronously over the document text.

pub mod headers;
pub mod tables;

use std::sync::Arc;

use crate::config::RequirementBundle;
use crate::core::Finding;
use crate::document::Document;

pub use headers::{count_header_occurrences, HeaderRule};
pub use tables::{find_table, TableBlock, TableRule};

/// A single structural requirement. Each rule yields exactly one finding.
pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn check(&self, document: &Document) -> Finding;
}

pub struct RulesEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Rules for a bundle: non-empty check, then headers, then tables, each
    /// in bundle order.
    pub fn from_bundle(bundle: &RequirementBundle) -> Self {
        let mut engine = Self::new();
        if bundle.require_non_empty {
            engine.add_rule(Arc::new(NonEmptyRule));
        }
        for header in &bundle.headers {
            engine.add_rule(Arc::new(HeaderRule::new(header.clone())));
        }
        for table in &bundle.tables {
            engine.add_rule(Arc::new(TableRule::new(table.clone())));
        }
        engine
    }

    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every rule runs; a failing rule never stops the others.
    pub fn analyze(&self, document: &Document) -> Vec<Finding> {
        self.rules.iter().map(|rule| rule.check(document)).collect()
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::from_bundle(&RequirementBundle::default())
    }
}

pub struct NonEmptyRule;

impl Rule for NonEmptyRule {
    fn id(&self) -> &str {
        "document_not_empty"
    }

    fn name(&self) -> &str {
        "Document is not empty"
    }

    fn check(&self, document: &Document) -> Finding {
        let subject = document
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<document>".to_string());
        if document.is_empty() {
            Finding::fail(self.id(), subject, "document is empty")
        } else {
            Finding::pass(
                self.id(),
                subject,
                format!("document has {} bytes", document.text().len()),
            )
        }
    }
}
