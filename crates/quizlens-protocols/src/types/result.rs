//! Suggestion result type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{normalize_wrong_answers, sanitize_choice_index, sanitize_confidence};

/// Placeholder explanation the proxy returns when the model gave none.
pub const NO_EXPLANATION_PLACEHOLDER: &str = "No explanation was provided by the AI.";

/// Placeholder reason for a non-chosen answer the model did not address.
pub const NO_RATIONALE_PLACEHOLDER: &str = "No specific rationale provided.";

/// Suggested answer for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResult {
    pub choice_index: usize,
    pub confidence: f64,
    /// Empty until the deep phase completes.
    #[serde(default)]
    pub explanation: String,
    /// Reason per non-chosen answer index.
    #[serde(default)]
    pub wrong_answers: BTreeMap<usize, String>,
}

impl SuggestionResult {
    /// Fast-phase result without explanation.
    pub fn choice(choice_index: usize, confidence: f64) -> Self {
        Self {
            choice_index,
            confidence,
            explanation: String::new(),
            wrong_answers: BTreeMap::new(),
        }
    }

    /// Normalize an arbitrary JSON value into a result for `answer_count`
    /// answers.
    ///
    /// `prior` is the fast-phase choice and confidence; it fills in whichever
    /// of the two the value lacks, so a deep response carrying only an
    /// explanation keeps the already-known choice.
    pub fn from_value(value: &Value, answer_count: usize, prior: Option<(usize, f64)>) -> Self {
        let choice_index = match (value.get("choiceIndex"), prior) {
            (None | Some(Value::Null), Some((choice, _))) => {
                choice.min(answer_count.saturating_sub(1))
            }
            (raw, _) => sanitize_choice_index(raw, answer_count),
        };
        let confidence = match (value.get("confidence"), prior) {
            (None | Some(Value::Null), Some((_, confidence))) => {
                sanitize_confidence(Some(&Value::from(confidence)))
            }
            (raw, _) => sanitize_confidence(raw),
        };
        let explanation = value
            .get("explanation")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let wrong_answers =
            normalize_wrong_answers(value.get("wrongAnswers"), choice_index, answer_count);

        Self {
            choice_index,
            confidence,
            explanation,
            wrong_answers,
        }
    }

    /// Whether the explanation is usable: non-empty and not the placeholder.
    pub fn is_explanation_complete(&self) -> bool {
        let explanation = self.explanation.trim();
        !explanation.is_empty() && explanation != NO_EXPLANATION_PLACEHOLDER
    }

    /// Merge a deep-phase result into this one.
    ///
    /// Choice and confidence are taken from `deep`. The explanation and each
    /// wrong-answer reason keep the existing value only when `deep` has none
    /// (or only a placeholder).
    pub fn merge(&self, deep: SuggestionResult, answer_count: usize) -> SuggestionResult {
        let explanation = if deep.explanation.trim().is_empty() {
            self.explanation.clone()
        } else {
            deep.explanation
        };

        let mut wrong_answers = BTreeMap::new();
        for index in 0..answer_count {
            if index == deep.choice_index {
                continue;
            }
            let reason = [deep.wrong_answers.get(&index), self.wrong_answers.get(&index)]
                .into_iter()
                .flatten()
                .find(|reason| {
                    let reason = reason.trim();
                    !reason.is_empty() && reason != NO_RATIONALE_PLACEHOLDER
                })
                .cloned()
                .unwrap_or_else(|| NO_RATIONALE_PLACEHOLDER.to_string());
            wrong_answers.insert(index, reason);
        }

        SuggestionResult {
            choice_index: deep.choice_index,
            confidence: deep.confidence,
            explanation,
            wrong_answers,
        }
    }

    /// Reason shown for a non-chosen answer.
    pub fn reason_for(&self, index: usize) -> &str {
        self.wrong_answers
            .get(&index)
            .map(String::as_str)
            .unwrap_or(NO_RATIONALE_PLACEHOLDER)
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
