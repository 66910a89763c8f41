//! HTTP client for the analyzer proxy.

use std::time::Duration;

use async_trait::async_trait;
use quizlens_protocols::normalize::parse_object_or_empty;
use quizlens_protocols::{AnalysisError, AnalyzeRequest, Analyzer, SuggestionResult};
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Stateless transport to `POST {proxy}/analyze` and `GET {proxy}/health`.
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl AnalysisClient {
    /// Create a client. A missing or blank proxy URL is accepted here and
    /// reported as [`AnalysisError::NotConfigured`] on every call.
    pub fn new(proxy_url: Option<String>) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let base_url = proxy_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn endpoint(&self, path: &str) -> Result<String, AnalysisError> {
        let base = self.base_url.as_deref().ok_or(AnalysisError::NotConfigured)?;
        Ok(format!("{}{}", base, path))
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, request: AnalyzeRequest) -> Result<SuggestionResult, AnalysisError> {
        let url = self.endpoint("/analyze")?;
        debug!(
            "Analyze request: mode={:?}, answers={}",
            request.mode,
            request.answers.len()
        );

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AnalysisError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let value = parse_object_or_empty(&body);
        Ok(SuggestionResult::from_value(
            &value,
            request.answers.len(),
            request.prior(),
        ))
    }

    async fn warm_up(&self) -> Result<(), AnalysisError> {
        let url = self.endpoint("/health")?;
        self.http
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
