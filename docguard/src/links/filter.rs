//! Decides which extracted URLs go to the liveness checker.

use reqwest::Url;

use crate::config::{ExclusionRule, LinkPolicy};
use crate::links::extract::ExtractedUrl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Matched an exclusion marker.
    Excluded { marker: String },
    /// Extracted text does not parse as a URL.
    Unparsable { error: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Excluded { marker } => write!(f, "excluded by marker '{}'", marker),
            SkipReason::Unparsable { error } => write!(f, "not a valid URL: {}", error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Check,
    Skip(SkipReason),
}

pub struct ExclusionFilter {
    rules: Vec<ExclusionRule>,
}

impl ExclusionFilter {
    pub fn new(rules: Vec<ExclusionRule>) -> Self {
        Self { rules }
    }

    pub fn from_policy(policy: &LinkPolicy) -> Self {
        Self::new(policy.exclude.clone())
    }

    /// Exclusion markers win over parse errors; parse errors are never failures.
    pub fn decide(&self, url: &ExtractedUrl) -> Decision {
        if let Some(rule) = self.rules.iter().find(|r| r.matches(&url.raw)) {
            return Decision::Skip(SkipReason::Excluded {
                marker: rule.marker.clone(),
            });
        }
        match Url::parse(&url.raw) {
            Ok(_) => Decision::Check,
            Err(e) => Decision::Skip(SkipReason::Unparsable {
                error: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RequirementBundle;

    fn url(raw: &str) -> ExtractedUrl {
        ExtractedUrl {
            raw: raw.to_string(),
            position: 0,
        }
    }

    #[test]
    fn test_registry_provider_pages_are_excluded() {
        let filter = ExclusionFilter::from_policy(&RequirementBundle::default().links);
        let decision = filter.decide(&url("https://registry.terraform.io/providers/foo/bar"));
        assert_eq!(
            decision,
            Decision::Skip(SkipReason::Excluded {
                marker: "registry.terraform.io/providers/".to_string()
            })
        );
    }

    #[test]
    fn test_registry_module_pages_are_checked() {
        let filter = ExclusionFilter::from_policy(&RequirementBundle::default().links);
        let decision = filter.decide(&url("https://registry.terraform.io/modules/foo/bar"));
        assert_eq!(decision, Decision::Check);
    }

    #[test]
    fn test_malformed_url_is_skipped() {
        let filter = ExclusionFilter::new(vec![]);
        let decision = filter.decide(&url("http://exa mple.com:99999"));
        assert!(matches!(decision, Decision::Skip(SkipReason::Unparsable { .. })));
    }

    #[test]
    fn test_invalid_port_is_unparsable() {
        let filter = ExclusionFilter::new(vec![]);
        assert!(matches!(
            filter.decide(&url("https://example.com:99999/")),
            Decision::Skip(SkipReason::Unparsable { .. })
        ));
    }

    #[test]
    fn test_plain_url_is_checked() {
        let filter = ExclusionFilter::new(vec![ExclusionRule::new("flaky.test")]);
        assert_eq!(filter.decide(&url("https://example.com/a")), Decision::Check);
        assert!(matches!(
            filter.decide(&url("https://flaky.test/a")),
            Decision::Skip(SkipReason::Excluded { .. })
        ));
    }
}
