//! Console rendering sinks.

use std::sync::Arc;

use parking_lot::Mutex;

use quizlens_protocols::{
    AnswerItem, MarkerSink, PanelSink, QuestionSnapshot, SuggestionResult, UpdateOptions,
};

use crate::page_file::JsonPageSource;

pub(crate) const DISCLAIMER: &str = "This is an AI suggestion, not guaranteed correct.";

const PANEL_TITLE: &str = "AI Assistant";
const LOADING_EXPLANATION: &str = "Loading explanation...";

/// `A`..`Z`, then `#27`, `#28`, ...
pub(crate) fn choice_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(offset) if offset < 26 => char::from(b'A' + offset).to_string(),
        _ => format!("#{}", index + 1),
    }
}

/// Panel body for a suggestion.
pub(crate) fn render_suggestion(
    snapshot: &QuestionSnapshot,
    result: &SuggestionResult,
    options: UpdateOptions,
) -> String {
    let mut lines = vec![DISCLAIMER.to_string()];
    if !snapshot.question_text.is_empty() {
        lines.push(snapshot.question_text.clone());
    }

    let choice_text = snapshot
        .answers
        .get(result.choice_index)
        .map_or("Unknown answer", String::as_str);
    let confidence_pct = (result.confidence * 100.0).round() as i64;
    lines.push(String::new());
    lines.push("Suggested Answer".to_string());
    lines.push(format!(
        "  {}. {} ({}% confidence)",
        choice_label(result.choice_index),
        choice_text,
        confidence_pct
    ));

    lines.push(String::new());
    lines.push("Why this is likely correct".to_string());
    let explanation = if options.pending_explanation && !result.is_explanation_complete() {
        LOADING_EXPLANATION
    } else {
        result.explanation.as_str()
    };
    lines.push(format!("  {}", explanation));

    lines.push(String::new());
    lines.push("Why other answers are likely incorrect".to_string());
    for (index, answer) in snapshot.answers.iter().enumerate() {
        if index == result.choice_index {
            continue;
        }
        lines.push(format!(
            "  {}. {} - {}",
            choice_label(index),
            answer,
            result.reason_for(index)
        ));
    }
    lines.join("\n")
}

/// Panel body for a one-line message.
pub(crate) fn render_message(message: &str) -> String {
    format!("{}\n{}", DISCLAIMER, message)
}

/// Prints the suggested answer and records the marker on the page host.
pub(crate) struct ConsoleMarkers {
    page: Arc<JsonPageSource>,
}

impl ConsoleMarkers {
    pub fn new(page: Arc<JsonPageSource>) -> Self {
        Self { page }
    }
}

impl MarkerSink for ConsoleMarkers {
    fn apply_marker(&self, items: &[AnswerItem], choice_index: usize) {
        self.page.clear_markers();
        let Some(item) = items.get(choice_index) else {
            return;
        };
        if let Some(container) = item.container {
            self.page.set_marker(container);
        }
        println!("⭐ AI  {}. {}", choice_label(choice_index), item.text);
    }

    fn clear_markers(&self) {
        self.page.clear_markers();
    }
}

#[derive(Debug, Default)]
struct PanelState {
    visible: bool,
    body: String,
}

/// Explanation panel printed to stdout.
///
/// The body is always kept current; it is printed when it changes while
/// the panel is visible and whenever the panel is shown.
pub(crate) struct ConsolePanel {
    footer: String,
    state: Mutex<PanelState>,
}

impl ConsolePanel {
    pub fn new(hotkey: &str) -> Self {
        Self {
            footer: format!("{} to toggle", hotkey.split('+').collect::<Vec<_>>().join(" + ")),
            state: Mutex::new(PanelState::default()),
        }
    }

    pub fn body(&self) -> String {
        self.state.lock().body.clone()
    }

    fn frame(&self, body: &str) -> String {
        format!("┌ {}\n{}\n└ {}", PANEL_TITLE, body, self.footer)
    }

    fn set_body(&self, body: String) {
        let mut state = self.state.lock();
        if state.visible {
            println!("{}", self.frame(&body));
        }
        state.body = body;
    }
}

impl PanelSink for ConsolePanel {
    fn show(&self) {
        let body = {
            let mut state = self.state.lock();
            state.visible = true;
            state.body.clone()
        };
        println!("{}", self.frame(&body));
    }

    fn hide(&self) {
        self.state.lock().visible = false;
    }

    fn toggle(&self) {
        if self.is_visible() {
            self.hide();
        } else {
            self.show();
        }
    }

    fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    fn show_message(&self, message: &str) {
        self.set_body(render_message(message));
    }

    fn update(&self, snapshot: &QuestionSnapshot, result: &SuggestionResult, options: UpdateOptions) {
        self.set_body(render_suggestion(snapshot, result, options));
    }
}
