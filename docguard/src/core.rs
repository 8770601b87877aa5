//! Core conformance API shared by the CLI and library callers.
//! Loading, running and aggregating; no output formatting.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RequirementBundle;
use crate::document::Document;
use crate::engine::{CheckOptions, ConformanceEngine};

#[derive(Debug, thiserror::Error)]
pub enum DocGuardError {
    #[error("Failed to load document {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config error: {0}")]
    Config(String),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for DocGuardError {
    fn from(e: toml::de::Error) -> Self {
        DocGuardError::Config(e.to_string())
    }
}

/// Outcome of a single evaluated requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    /// URL removed from liveness checking (only reported on request).
    Skipped,
}

/// One evaluated requirement: which rule, what it looked at, and the verdict.
///
/// `subject` carries the header text, table section or URL so results can be
/// attributed without relying on evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub subject: String,
    pub status: Status,
    pub detail: String,
}

impl Finding {
    pub fn pass(rule_id: &str, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(rule_id, subject, Status::Pass, detail)
    }

    pub fn fail(rule_id: &str, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(rule_id, subject, Status::Fail, detail)
    }

    pub fn skipped(rule_id: &str, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(rule_id, subject, Status::Skipped, detail)
    }

    fn new(
        rule_id: &str,
        subject: impl Into<String>,
        status: Status,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            subject: subject.into(),
            status,
            detail: detail.into(),
        }
    }

    pub fn is_fail(&self) -> bool {
        self.status == Status::Fail
    }
}

/// Per-document result with findings and counts.
#[derive(Debug, Clone, Serialize)]
pub struct ConformanceReport {
    pub file: Option<PathBuf>,
    pub findings: Vec<Finding>,
    pub stats: FindingStats,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FindingStats {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ConformanceReport {
    pub fn new(file: Option<PathBuf>, findings: Vec<Finding>) -> Self {
        let stats = findings_to_stats(&findings);
        Self {
            file,
            findings,
            stats,
            checked_at: Utc::now(),
        }
    }

    /// A document conforms iff no finding failed.
    pub fn is_conformant(&self) -> bool {
        self.stats.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_fail())
    }

    pub fn total_findings(&self) -> usize {
        self.stats.passed + self.stats.failed + self.stats.skipped
    }
}

fn findings_to_stats(findings: &[Finding]) -> FindingStats {
    let mut stats = FindingStats::default();
    for f in findings {
        match f.status {
            Status::Pass => stats.passed += 1,
            Status::Fail => stats.failed += 1,
            Status::Skipped => stats.skipped += 1,
        }
    }
    stats
}

const DOCUMENT_FILE_NAME: &str = "README.md";

/// Recursively discover module README files in a directory.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>, DocGuardError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), DocGuardError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "node_modules" || name == "target" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file()
            && path.file_name().and_then(|n| n.to_str()) == Some(DOCUMENT_FILE_NAME)
        {
            files.push(path);
        }
    }
    Ok(())
}

/// Facade used by the CLI: load, run the engine, wrap in a report.
pub struct DocGuardCore;

impl DocGuardCore {
    /// Check a single document file. Only a load failure is an `Err`.
    pub async fn check_file(
        path: &Path,
        bundle: &RequirementBundle,
        options: CheckOptions,
    ) -> Result<ConformanceReport, DocGuardError> {
        let document = Document::load(path)?;
        let engine = ConformanceEngine::new(bundle.clone(), options)?;
        let findings = engine.run(&document).await;
        Ok(ConformanceReport::new(Some(path.to_path_buf()), findings))
    }

    /// Check an in-memory document.
    pub async fn check_document(
        document: &Document,
        bundle: &RequirementBundle,
        options: CheckOptions,
    ) -> Result<ConformanceReport, DocGuardError> {
        let engine = ConformanceEngine::new(bundle.clone(), options)?;
        let findings = engine.run(document).await;
        Ok(ConformanceReport::new(
            document.path().map(Path::to_path_buf),
            findings,
        ))
    }

    /// Check every README.md below `dir`. The first load failure aborts.
    pub async fn check_project(
        dir: &Path,
        bundle: &RequirementBundle,
        options: CheckOptions,
    ) -> Result<Vec<ConformanceReport>, DocGuardError> {
        let files = discover_documents(dir)?;
        tracing::info!("Discovered {} document(s) under {}", files.len(), dir.display());

        let engine = ConformanceEngine::new(bundle.clone(), options)?;
        let mut reports = Vec::with_capacity(files.len());
        for path in files {
            let document = Document::load(&path)?;
            let findings = engine.run(&document).await;
            reports.push(ConformanceReport::new(Some(path), findings));
        }
        Ok(reports)
    }
}
