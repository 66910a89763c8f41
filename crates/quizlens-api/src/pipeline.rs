//! Two-phase analysis over a model backend.

use std::sync::Arc;

use quizlens_protocols::normalize::{
    extract_explanation, extract_wrong_answers, normalize_wrong_answers, parse_object_or_empty,
    sanitize_choice_index, sanitize_confidence,
};
use quizlens_protocols::provider::DEFAULT_TEMPERATURE;
use quizlens_protocols::{
    AnalysisMode, AnalyzeRequest, GenerationRequest, ModelBackend, NO_EXPLANATION_PLACEHOLDER,
    ProviderError, SuggestionResult,
};
use tracing::debug;

use crate::prompt::{deep_prompt, fast_prompt};

/// Runs the fast and deep prompts against one backend and normalizes the
/// replies.
pub struct AnalysisPipeline {
    backend: Arc<dyn ModelBackend>,
    temperature: f32,
}

impl AnalysisPipeline {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            backend,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn backend_id(&self) -> &str {
        self.backend.id()
    }

    async fn generate(&self, prompt: String, mode: AnalysisMode) -> Result<String, ProviderError> {
        let mut request = GenerationRequest::new(prompt, mode.max_output_tokens());
        request.temperature = self.temperature;
        debug!(
            "Generating {} reply via {} (max {} tokens)",
            mode,
            self.backend.id(),
            request.max_output_tokens
        );
        self.backend.generate(request).await
    }

    /// Fast phase: sanitized choice index and confidence.
    pub async fn fast(&self, question: &str, answers: &[String]) -> Result<(usize, f64), ProviderError> {
        let text = self
            .generate(fast_prompt(question, answers), AnalysisMode::Fast)
            .await?;
        let parsed = parse_object_or_empty(&text);
        Ok((
            sanitize_choice_index(parsed.get("choiceIndex"), answers.len()),
            sanitize_confidence(parsed.get("confidence")),
        ))
    }

    /// Deep phase for an already chosen answer.
    ///
    /// The choice and confidence are kept as given; the model only supplies
    /// the explanation and the per-answer reasons.
    pub async fn deep(
        &self,
        question: &str,
        answers: &[String],
        choice_index: usize,
        confidence: f64,
    ) -> Result<SuggestionResult, ProviderError> {
        let text = self
            .generate(
                deep_prompt(question, answers, choice_index, confidence),
                AnalysisMode::Deep,
            )
            .await?;
        let parsed = parse_object_or_empty(&text);

        let mut explanation = extract_explanation(&parsed, &text);
        if explanation.is_empty() {
            explanation = NO_EXPLANATION_PLACEHOLDER.to_string();
        }
        let wrong_answers =
            normalize_wrong_answers(extract_wrong_answers(&parsed), choice_index, answers.len());

        Ok(SuggestionResult {
            choice_index,
            confidence,
            explanation,
            wrong_answers,
        })
    }

    /// Answer a validated request.
    ///
    /// `fast` returns the choice alone, `deep` explains the supplied choice
    /// (running the fast phase first when none was supplied), and no mode
    /// runs both phases in sequence.
    pub async fn run(&self, request: &AnalyzeRequest) -> Result<SuggestionResult, ProviderError> {
        let question = request.question.as_str();
        let answers = request.answers.as_slice();

        match request.mode {
            Some(AnalysisMode::Fast) => {
                let (choice_index, confidence) = self.fast(question, answers).await?;
                Ok(SuggestionResult::choice(choice_index, confidence))
            }
            Some(AnalysisMode::Deep) => {
                let (choice_index, confidence) = match request.prior() {
                    Some(prior) => prior,
                    None => self.fast(question, answers).await?,
                };
                self.deep(question, answers, choice_index, confidence).await
            }
            None => {
                let (choice_index, confidence) = self.fast(question, answers).await?;
                self.deep(question, answers, choice_index, confidence).await
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
