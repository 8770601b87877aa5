//! Concurrent URL liveness checking.
//!
//! One task per URL, joined before returning. Findings come back in input
//! order and carry their URL as the subject, whatever order tasks finish in.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::{DocGuardError, Finding};

pub const RULE_ID: &str = "link_liveness";

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct FetchError(pub String);

/// Performs one fetch and reports the HTTP status code.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<u16, FetchError>;
}

/// `reqwest`-backed GET fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Without a timeout the transport default applies (no deadline).
    pub fn new(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self, DocGuardError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_string());
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<u16, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError(describe_reqwest_error(&e)))?;
        Ok(response.status().as_u16())
    }
}

fn describe_reqwest_error(e: &reqwest::Error) -> String {
    use std::error::Error;

    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn classify(url: &str, outcome: Result<u16, FetchError>) -> Finding {
    match outcome {
        Ok(code) if code == StatusCode::OK.as_u16() => {
            tracing::debug!("Success: URL: {}, status code: {}", url, code);
            Finding::pass(RULE_ID, url, format!("status code {}", code))
        }
        Ok(code) => {
            tracing::warn!("Failed: URL: {}, status code: {}", url, code);
            Finding::fail(RULE_ID, url, format!("unexpected status code {}", code))
        }
        Err(e) => {
            tracing::warn!("Failed: URL: {}, error: {}", url, e);
            Finding::fail(RULE_ID, url, format!("request failed: {}", e))
        }
    }
}

pub struct LivenessChecker {
    fetcher: Arc<dyn Fetcher>,
    max_concurrency: Option<usize>,
}

impl LivenessChecker {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            max_concurrency: None,
        }
    }

    /// Cap the number of in-flight fetches. `None` means one task per URL
    /// with no cap.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.filter(|n| *n > 0);
        self
    }

    /// Check every URL (duplicates included) and wait for all of them.
    pub async fn check_all(&self, urls: Vec<String>) -> Vec<Finding> {
        if urls.is_empty() {
            return Vec::new();
        }
        tracing::info!("Checking {} link(s)", urls.len());

        let permits = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();
        for (index, url) in urls.iter().cloned().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let permits = permits.clone();
            tasks.spawn(async move {
                let _permit = match permits {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let outcome = fetcher.fetch(&url).await;
                (index, classify(&url, outcome))
            });
        }

        let mut results: Vec<Option<Finding>> = vec![None; urls.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, finding)) => results[index] = Some(finding),
                Err(e) => tracing::error!("Link check task failed: {}", e),
            }
        }

        results
            .into_iter()
            .zip(urls)
            .map(|(finding, url)| {
                finding.unwrap_or_else(|| {
                    Finding::fail(RULE_ID, url, "link check aborted before completion")
                })
            })
            .collect()
    }
}
