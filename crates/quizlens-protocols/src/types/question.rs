//! Question snapshot types.

use serde::{Deserialize, Serialize};

/// Opaque handle to a page element, owned by the page collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef(pub u64);

/// Question text and answer texts scraped from a question element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuestion {
    pub question_text: String,
    pub answers: Vec<String>,
}

impl ParsedQuestion {
    pub fn new(question_text: impl Into<String>, answers: Vec<String>) -> Self {
        Self {
            question_text: question_text.into(),
            answers,
        }
    }

    /// A question without text or without answers cannot be analyzed.
    pub fn is_empty(&self) -> bool {
        self.question_text.trim().is_empty() || self.answers.is_empty()
    }
}

/// A single answer choice with the elements a marker attaches to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerItem {
    pub text: String,
    pub element: ElementRef,
    /// Row container that receives the highlight, when the page has one.
    #[serde(default)]
    pub container: Option<ElementRef>,
}

/// Ephemeral view of the current question, recreated on every observer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSnapshot {
    pub element: ElementRef,
    pub question_text: String,
    pub answers: Vec<String>,
}

impl QuestionSnapshot {
    pub fn new(element: ElementRef, parsed: ParsedQuestion) -> Self {
        Self {
            element,
            question_text: parsed.question_text,
            answers: parsed.answers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_question_empty() {
        assert!(ParsedQuestion::default().is_empty());
        assert!(ParsedQuestion::new("   ", vec!["a".to_string()]).is_empty());
        assert!(ParsedQuestion::new("2+2=?", vec![]).is_empty());
        assert!(!ParsedQuestion::new("2+2=?", vec!["4".to_string()]).is_empty());
    }

    #[test]
    fn test_snapshot_from_parsed() {
        let parsed = ParsedQuestion::new("Q", vec!["a".to_string(), "b".to_string()]);
        let snapshot = QuestionSnapshot::new(ElementRef(7), parsed);
        assert_eq!(snapshot.element, ElementRef(7));
        assert_eq!(snapshot.question_text, "Q");
        assert_eq!(snapshot.answers.len(), 2);
    }
}
