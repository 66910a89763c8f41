//! Analysis and health handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use quizlens_protocols::normalize::{sanitize_choice_index, sanitize_confidence};
use quizlens_protocols::{AnalysisMode, AnalyzeRequest, SuggestionResult};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// POST /analyze
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SuggestionResult>, ApiError> {
    let request = parse_payload(&body)?;
    debug!(
        "Analyze request: mode={}, answers={}",
        request.mode.map_or("full", |mode| mode.as_str()),
        request.answers.len()
    );

    match state.pipeline.run(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            warn!("Analysis via {} failed: {}", state.pipeline.backend_id(), e);
            Err(e.into())
        }
    }
}

/// Read an analyze payload leniently.
///
/// An empty body counts as `{}`. Question and answers are coerced to
/// trimmed strings; unknown modes are ignored. A supplied `choiceIndex` is
/// clamped to the answers and paired with a sanitized confidence.
pub(crate) fn parse_payload(body: &[u8]) -> Result<AnalyzeRequest, ApiError> {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice::<Value>(body).map_err(|_| ApiError::InvalidJson)?
    };

    let question = payload.get("question").map(field_text).unwrap_or_default();
    let answers: Vec<String> = match payload.get("answers") {
        Some(Value::Array(items)) => items.iter().map(field_text).collect(),
        _ => Vec::new(),
    };
    if question.is_empty() || answers.is_empty() {
        return Err(ApiError::MissingInput);
    }

    let mode = payload
        .get("mode")
        .and_then(Value::as_str)
        .and_then(AnalysisMode::parse);
    let choice_index = payload
        .get("choiceIndex")
        .filter(|value| !value.is_null())
        .map(|value| sanitize_choice_index(Some(value), answers.len()));
    let confidence = choice_index.map(|_| sanitize_confidence(payload.get("confidence")));

    Ok(AnalyzeRequest {
        question,
        answers,
        mode,
        choice_index,
        confidence,
    })
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Null | Value::Bool(false) => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
