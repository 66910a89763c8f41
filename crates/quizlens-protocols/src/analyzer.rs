//! Analyzer trait definition.

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::types::{AnalyzeRequest, SuggestionResult};

/// Remote analysis transport.
///
/// Implementations must return normalized results: the choice index is in
/// range, confidence is in `[0, 1]`, and every non-chosen index has a reason.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze a question in the requested mode.
    async fn analyze(&self, request: AnalyzeRequest) -> Result<SuggestionResult, AnalysisError>;

    /// Best-effort request that primes the remote service.
    async fn warm_up(&self) -> Result<(), AnalysisError> {
        Ok(())
    }
}
