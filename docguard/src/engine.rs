//! Conformance engine: runs every rule against one document.
//!
//! Structural rules run first and synchronously; link liveness follows.
//! Every requirement is evaluated even when others fail.

use std::sync::Arc;
use std::time::Duration;

use crate::config::RequirementBundle;
use crate::core::{DocGuardError, Finding};
use crate::document::Document;
use crate::links::liveness::RULE_ID as LINK_RULE_ID;
use crate::links::{Decision, ExclusionFilter, Fetcher, HttpFetcher, LivenessChecker, UrlExtractor};
use crate::rules::RulesEngine;

/// Options for a check run (CLI or library).
#[derive(Clone, Debug)]
pub struct CheckOptions {
    /// Fetch extracted URLs. Off means structural checks only.
    pub check_links: bool,
    /// Emit a `Skipped` finding for every excluded or unparsable URL.
    pub report_skipped: bool,
    pub max_concurrency: Option<usize>,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            check_links: true,
            report_skipped: false,
            max_concurrency: None,
            timeout: None,
            user_agent: Some(concat!("docguard/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl CheckOptions {
    pub fn offline() -> Self {
        Self {
            check_links: false,
            ..Self::default()
        }
    }
}

pub struct ConformanceEngine {
    rules: RulesEngine,
    extractor: UrlExtractor,
    filter: ExclusionFilter,
    checker: LivenessChecker,
    options: CheckOptions,
}

impl ConformanceEngine {
    /// Engine with an HTTP fetcher built from `options`.
    pub fn new(bundle: RequirementBundle, options: CheckOptions) -> Result<Self, DocGuardError> {
        bundle.validate()?;
        let fetcher = HttpFetcher::new(options.timeout, options.user_agent.as_deref())?;
        Ok(Self::with_fetcher(bundle, options, Arc::new(fetcher)))
    }

    pub fn with_fetcher(
        bundle: RequirementBundle,
        options: CheckOptions,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            rules: RulesEngine::from_bundle(&bundle),
            extractor: UrlExtractor::new(),
            filter: ExclusionFilter::from_policy(&bundle.links),
            checker: LivenessChecker::new(fetcher).with_max_concurrency(options.max_concurrency),
            options,
        }
    }

    pub fn check_structure(&self, document: &Document) -> Vec<Finding> {
        self.rules.analyze(document)
    }

    /// Liveness findings in document order, plus skipped entries if requested.
    pub async fn check_links(&self, document: &Document) -> Vec<Finding> {
        if !self.options.check_links {
            return Vec::new();
        }

        // `None` marks a URL whose finding comes back from the checker.
        let mut slots: Vec<Option<Finding>> = Vec::new();
        let mut to_check = Vec::new();
        for url in self.extractor.extract(document.text()) {
            match self.filter.decide(&url) {
                Decision::Check => {
                    slots.push(None);
                    to_check.push(url.raw);
                }
                Decision::Skip(reason) => {
                    tracing::debug!("Skipping {}: {}", url.raw, reason);
                    if self.options.report_skipped {
                        slots.push(Some(Finding::skipped(
                            LINK_RULE_ID,
                            url.raw,
                            reason.to_string(),
                        )));
                    }
                }
            }
        }

        let mut checked = self.checker.check_all(to_check).await.into_iter();
        slots
            .into_iter()
            .filter_map(|slot| slot.or_else(|| checked.next()))
            .collect()
    }

    pub async fn run(&self, document: &Document) -> Vec<Finding> {
        let mut findings = self.check_structure(document);
        findings.extend(self.check_links(document).await);

        let failed = findings.iter().filter(|f| f.is_fail()).count();
        tracing::info!(
            "Evaluated {} finding(s) for {}: {} failed",
            findings.len(),
            document
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<document>".to_string()),
            failed
        );
        findings
    }
}
