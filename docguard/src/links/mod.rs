//! Dead-link detection: extract, filter, fetch.

pub mod extract;
pub mod filter;
pub mod liveness;

pub use extract::{extract_urls, ExtractedUrl, UrlExtractor};
pub use filter::{Decision, ExclusionFilter, SkipReason};
pub use liveness::{FetchError, Fetcher, HttpFetcher, LivenessChecker};
