//! Rendering sink traits.
//!
//! The engine never inspects page structure itself; it hands value objects
//! to these sinks.

use crate::types::{AnswerItem, QuestionSnapshot, SuggestionResult};

/// Options for [`PanelSink::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// A deep request is in flight; show a loading affordance for the
    /// explanation while keeping the known choice visible.
    pub pending_explanation: bool,
}

/// Inline highlighting of the suggested answer.
pub trait MarkerSink: Send + Sync {
    /// Mark `items[choice_index]`, clearing any previous marker first.
    fn apply_marker(&self, items: &[AnswerItem], choice_index: usize);

    /// Remove every marker and highlight.
    fn clear_markers(&self);
}

/// Explanation panel.
pub trait PanelSink: Send + Sync {
    fn show(&self);

    fn hide(&self);

    fn toggle(&self);

    fn is_visible(&self) -> bool;

    /// Replace the panel body with a one-line message.
    fn show_message(&self, message: &str);

    /// Render the suggestion for the snapshot.
    fn update(&self, snapshot: &QuestionSnapshot, result: &SuggestionResult, options: UpdateOptions);
}
