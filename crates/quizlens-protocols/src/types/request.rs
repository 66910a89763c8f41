//! Analyzer request types.

use serde::{Deserialize, Serialize};

/// Output budget for the fast phase.
pub const FAST_OUTPUT_TOKENS: u32 = 200;

/// Output budget for the deep phase.
pub const DEEP_OUTPUT_TOKENS: u32 = 700;

/// Prompt mode requested from the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Choice and confidence only.
    Fast,
    /// Choice, confidence, explanation and wrong-answer reasons.
    Deep,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Deep => "deep",
        }
    }

    pub fn max_output_tokens(&self) -> u32 {
        match self {
            Self::Fast => FAST_OUTPUT_TOKENS,
            Self::Deep => DEEP_OUTPUT_TOKENS,
        }
    }

    /// Lenient parse used on inbound payloads; unknown values mean "no mode".
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fast" => Some(Self::Fast),
            "deep" => Some(Self::Deep),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST {proxy}/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub question: String,
    pub answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AnalysisMode>,
    /// Fast-phase choice supplied as context for the deep phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl AnalyzeRequest {
    /// Fast-mode request.
    pub fn fast(question: impl Into<String>, answers: Vec<String>) -> Self {
        Self {
            question: question.into(),
            answers,
            mode: Some(AnalysisMode::Fast),
            choice_index: None,
            confidence: None,
        }
    }

    /// Deep-mode request carrying the fast-phase choice as context.
    pub fn deep(
        question: impl Into<String>,
        answers: Vec<String>,
        choice_index: usize,
        confidence: f64,
    ) -> Self {
        Self {
            question: question.into(),
            answers,
            mode: Some(AnalysisMode::Deep),
            choice_index: Some(choice_index),
            confidence: Some(confidence),
        }
    }

    /// The prior choice and confidence, when both were supplied.
    pub fn prior(&self) -> Option<(usize, f64)> {
        Some((self.choice_index?, self.confidence?))
    }
}
