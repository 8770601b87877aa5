//! DocGuard - conformance checks for generated module README files
//!
//! This library verifies that a module README carries the required section
//! headers, that the tables following specific headers have the expected
//! columns, and that none of its links are dead.
//!
//! # Quick Start
//!
//! ```no_run
//! use docguard::{CheckOptions, DocGuardCore, RequirementBundle};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), docguard::DocGuardError> {
//! let bundle = RequirementBundle::default();
//! let report = DocGuardCore::check_file(
//!     Path::new("README.md"),
//!     &bundle,
//!     CheckOptions::default(),
//! ).await?;
//!
//! for finding in &report.findings {
//!     println!("{:?} {}: {}", finding.status, finding.subject, finding.detail);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Header checks**: required headers with minimum counts, exact or prefix
//! - **Table checks**: column schema of the table right after a header
//! - **Link checks**: concurrent liveness fetches with exclusion markers

pub mod config;
pub mod core;
pub mod document;
pub mod engine;
pub mod links;
pub mod rules;

// Re-export main types
pub use config::{
    ExclusionRule, HeaderRequirement, LinkPolicy, MatchMode, RequirementBundle, TableRequirement,
};
pub use crate::core::{
    discover_documents, ConformanceReport, DocGuardCore, DocGuardError, Finding, FindingStats,
    Status,
};
pub use document::Document;
pub use engine::{CheckOptions, ConformanceEngine};
pub use rules::{Rule, RulesEngine};

/// Load a document (convenience wrapper).
pub fn load_document(path: &std::path::Path) -> Result<Document, DocGuardError> {
    Document::load(path)
}

/// Run only the structural rules of `bundle` (no network).
pub fn check_structure(document: &Document, bundle: &RequirementBundle) -> Vec<Finding> {
    RulesEngine::from_bundle(bundle).analyze(document)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CheckOptions, ConformanceReport, DocGuardCore, DocGuardError, Document, Finding,
        RequirementBundle, Status,
    };
}
