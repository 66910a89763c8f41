use std::collections::{HashMap, HashSet, VecDeque};

use super::*;
use async_trait::async_trait;
use quizlens_protocols::{
    AnalysisError, AnalysisMode, AnswerItem, BoundingBox, CandidateElement, ParsedQuestion,
    Viewport, NO_RATIONALE_PLACEHOLDER,
};
use quizlens_store::MemoryStore;
use serde_json::json;
use tokio::sync::Notify;

// ---- page -------------------------------------------------------------

#[derive(Default)]
struct MockPage {
    questions: Mutex<HashMap<ElementRef, ParsedQuestion>>,
    visible: Mutex<Vec<ElementRef>>,
    marked: Arc<Mutex<HashSet<ElementRef>>>,
}

impl MockPage {
    fn add(&self, id: u64, question: &str, answers: &[&str]) -> ElementRef {
        let element = ElementRef(id);
        let answers = answers.iter().map(|a| a.to_string()).collect();
        self.questions
            .lock()
            .insert(element, ParsedQuestion::new(question, answers));
        element
    }
}

impl PageSource for MockPage {
    fn viewport(&self) -> Viewport {
        Viewport::default()
    }

    fn question_candidates(&self) -> Vec<CandidateElement> {
        self.visible
            .lock()
            .iter()
            .map(|element| CandidateElement {
                element: *element,
                bounds: BoundingBox::new(0.0, 0.0, 400.0, 300.0),
                display_none: false,
                visibility_hidden: false,
            })
            .collect()
    }

    fn parse_question(&self, element: ElementRef) -> ParsedQuestion {
        self.questions.lock().get(&element).cloned().unwrap_or_default()
    }

    fn extract_answer_items(&self, element: ElementRef) -> Vec<AnswerItem> {
        self.parse_question(element)
            .answers
            .into_iter()
            .enumerate()
            .map(|(i, text)| AnswerItem {
                text,
                element: ElementRef(element.0 * 100 + i as u64),
                container: Some(element),
            })
            .collect()
    }

    fn has_marker(&self, element: ElementRef) -> bool {
        self.marked.lock().contains(&element)
    }
}

// ---- sinks ------------------------------------------------------------

struct MockMarkers {
    marked: Arc<Mutex<HashSet<ElementRef>>>,
    applied: Mutex<Vec<(ElementRef, usize)>>,
    clears: Mutex<usize>,
}

impl MarkerSink for MockMarkers {
    fn apply_marker(&self, items: &[AnswerItem], choice_index: usize) {
        let Some(container) = items.first().and_then(|item| item.container) else {
            return;
        };
        self.marked.lock().insert(container);
        self.applied.lock().push((container, choice_index));
    }

    fn clear_markers(&self) {
        self.marked.lock().clear();
        *self.clears.lock() += 1;
    }
}

#[derive(Default)]
struct MockPanel {
    visible: Mutex<bool>,
    messages: Mutex<Vec<String>>,
    updates: Mutex<Vec<(SuggestionResult, bool)>>,
}

impl MockPanel {
    fn last_update(&self) -> Option<(SuggestionResult, bool)> {
        self.updates.lock().last().cloned()
    }
}

impl PanelSink for MockPanel {
    fn show(&self) {
        *self.visible.lock() = true;
    }

    fn hide(&self) {
        *self.visible.lock() = false;
    }

    fn toggle(&self) {
        let mut visible = self.visible.lock();
        *visible = !*visible;
    }

    fn is_visible(&self) -> bool {
        *self.visible.lock()
    }

    fn show_message(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }

    fn update(&self, _snapshot: &QuestionSnapshot, result: &SuggestionResult, options: UpdateOptions) {
        self.updates
            .lock()
            .push((result.clone(), options.pending_explanation));
    }
}

// ---- analyzer ---------------------------------------------------------

struct Scripted {
    outcome: Result<SuggestionResult, String>,
    gate: Option<Arc<Notify>>,
}

#[derive(Default)]
struct MockAnalyzer {
    scripts: Mutex<HashMap<(String, AnalysisMode), VecDeque<Scripted>>>,
    requests: Mutex<Vec<AnalyzeRequest>>,
    warm_ups: Mutex<usize>,
}

impl MockAnalyzer {
    fn respond(&self, question: &str, mode: AnalysisMode, result: SuggestionResult) {
        self.push(question, mode, Ok(result), None);
    }

    fn fail(&self, question: &str, mode: AnalysisMode, message: &str) {
        self.push(question, mode, Err(message.to_string()), None);
    }

    /// Respond only after the returned gate is notified.
    fn respond_gated(&self, question: &str, mode: AnalysisMode, result: SuggestionResult) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.push(question, mode, Ok(result), Some(gate.clone()));
        gate
    }

    fn push(
        &self,
        question: &str,
        mode: AnalysisMode,
        outcome: Result<SuggestionResult, String>,
        gate: Option<Arc<Notify>>,
    ) {
        self.scripts
            .lock()
            .entry((question.to_string(), mode))
            .or_default()
            .push_back(Scripted { outcome, gate });
    }

    fn count(&self, mode: AnalysisMode) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.mode == Some(mode))
            .count()
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, request: AnalyzeRequest) -> Result<SuggestionResult, AnalysisError> {
        let mode = request.mode.unwrap_or(AnalysisMode::Fast);
        self.requests.lock().push(request.clone());
        let scripted = self
            .scripts
            .lock()
            .get_mut(&(request.question.clone(), mode))
            .and_then(VecDeque::pop_front);
        let Some(scripted) = scripted else {
            return Ok(SuggestionResult::choice(0, 0.5));
        };
        if let Some(gate) = scripted.gate {
            gate.notified().await;
        }
        scripted.outcome.map_err(AnalysisError::Network)
    }

    async fn warm_up(&self) -> Result<(), AnalysisError> {
        *self.warm_ups.lock() += 1;
        Err(AnalysisError::Network("offline".to_string()))
    }
}

// ---- harness ----------------------------------------------------------

struct Harness {
    engine: SuggestionEngine,
    page: Arc<MockPage>,
    analyzer: Arc<MockAnalyzer>,
    markers: Arc<MockMarkers>,
    panel: Arc<MockPanel>,
    cache: ResultCache,
}

fn harness() -> Harness {
    let page = Arc::new(MockPage::default());
    let analyzer = Arc::new(MockAnalyzer::default());
    let markers = Arc::new(MockMarkers {
        marked: page.marked.clone(),
        applied: Mutex::new(Vec::new()),
        clears: Mutex::new(0),
    });
    let panel = Arc::new(MockPanel::default());
    let cache = ResultCache::new(Arc::new(MemoryStore::new()));
    let engine = SuggestionEngine::new(
        page.clone(),
        analyzer.clone(),
        cache.clone(),
        markers.clone(),
        panel.clone(),
        EngineOptions::default(),
    );
    Harness {
        engine,
        page,
        analyzer,
        markers,
        panel,
        cache,
    }
}

fn hash_of(question: &str, answers: &[&str]) -> String {
    let answers: Vec<String> = answers.iter().map(|a| a.to_string()).collect();
    compute_identity(IdentityAlgorithm::Sha256, question, &answers).to_string()
}

fn deep_response(answer_count: usize, prior: (usize, f64)) -> SuggestionResult {
    SuggestionResult::from_value(
        &json!({
            "explanation": "Basic arithmetic",
            "wrongAnswers": {"0": "too low", "2": "too high"}
        }),
        answer_count,
        Some(prior),
    )
}

async fn wait(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

const ANSWERS: [&str; 3] = ["3", "4", "5"];

// ---- tests ------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_two_plus_two_scenario() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);
    h.analyzer
        .respond("2+2=?", AnalysisMode::Fast, SuggestionResult::choice(1, 0.9));
    h.analyzer
        .respond("2+2=?", AnalysisMode::Deep, deep_response(3, (1, 0.9)));

    h.engine.handle_question(question).await;
    h.engine.settle().await;

    let fast = h.engine.current_result().unwrap();
    assert_eq!(fast.choice_index, 1);
    assert_eq!(*h.markers.applied.lock(), vec![(question, 1)]);
    assert_eq!(h.analyzer.count(AnalysisMode::Deep), 0);
    assert!(h.cache.get(&hash_of("2+2=?", &ANSWERS)).await.is_some());

    h.engine.toggle_panel();
    assert_eq!(h.panel.last_update().map(|(_, pending)| pending), Some(true));
    h.engine.settle().await;

    let deep_request = h.analyzer.requests.lock().last().cloned().unwrap();
    assert_eq!(deep_request.prior(), Some((1, 0.9)));

    let merged = h.engine.current_result().unwrap();
    assert_eq!(merged.choice_index, 1);
    assert_eq!(merged.explanation, "Basic arithmetic");
    assert_eq!(merged.reason_for(0), "too low");
    assert_eq!(merged.reason_for(2), "too high");
    assert_eq!(h.cache.get(&hash_of("2+2=?", &ANSWERS)).await, Some(merged.clone()));

    let (shown, pending) = h.panel.last_update().unwrap();
    assert_eq!(shown, merged);
    assert!(!pending);
    assert_eq!(h.markers.applied.lock().last(), Some(&(question, 1)));
}

#[tokio::test(start_paused = true)]
async fn test_cache_hit_publishes_without_network() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);
    let mut cached = SuggestionResult::choice(2, 0.7);
    cached.explanation = "Cached reasoning".to_string();
    h.cache.set(&hash_of("2+2=?", &ANSWERS), &cached).await.unwrap();

    h.engine.handle_question(question).await;
    h.engine.settle().await;

    assert!(h.analyzer.requests.lock().is_empty());
    assert_eq!(h.engine.current_result(), Some(cached));
    assert_eq!(*h.markers.applied.lock(), vec![(question, 2)]);
}

#[tokio::test(start_paused = true)]
async fn test_cached_empty_explanation_opening_panel_runs_one_deep() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);
    let hash = hash_of("2+2=?", &ANSWERS);
    h.cache
        .set(&hash, &SuggestionResult::choice(1, 0.9))
        .await
        .unwrap();
    h.analyzer
        .respond("2+2=?", AnalysisMode::Deep, deep_response(3, (1, 0.9)));

    h.engine.handle_question(question).await;
    h.engine.settle().await;
    assert!(h.analyzer.requests.lock().is_empty());

    h.engine.toggle_panel();
    h.engine.settle().await;

    assert_eq!(h.analyzer.count(AnalysisMode::Deep), 1);
    assert_eq!(h.analyzer.count(AnalysisMode::Fast), 0);
    let cached = h.cache.get(&hash).await.unwrap();
    assert_eq!(cached.explanation, "Basic arithmetic");
}

#[tokio::test(start_paused = true)]
async fn test_cache_hit_with_open_panel_fills_explanation() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);
    let mut cached = SuggestionResult::choice(1, 0.9);
    cached.explanation = quizlens_protocols::NO_EXPLANATION_PLACEHOLDER.to_string();
    h.cache.set(&hash_of("2+2=?", &ANSWERS), &cached).await.unwrap();
    h.analyzer
        .respond("2+2=?", AnalysisMode::Deep, deep_response(3, (1, 0.9)));
    h.panel.show();

    h.engine.handle_question(question).await;
    h.engine.settle().await;

    assert_eq!(h.analyzer.count(AnalysisMode::Deep), 1);
    assert_eq!(h.engine.current_result().unwrap().explanation, "Basic arithmetic");
}

#[tokio::test(start_paused = true)]
async fn test_rapid_switch_discards_stale_fast_result() {
    let h = harness();
    let first = h.page.add(1, "Q1", &["a", "b"]);
    let second = h.page.add(2, "Q2", &["c", "d"]);
    let gate = h
        .analyzer
        .respond_gated("Q1", AnalysisMode::Fast, SuggestionResult::choice(0, 0.8));
    h.analyzer
        .respond("Q2", AnalysisMode::Fast, SuggestionResult::choice(1, 0.6));

    h.engine.handle_question(first).await;
    wait(350).await;
    assert_eq!(h.analyzer.count(AnalysisMode::Fast), 1);

    h.engine.handle_question(second).await;
    wait(350).await;
    gate.notify_one();
    h.engine.settle().await;

    let result = h.engine.current_result().unwrap();
    assert_eq!(result.choice_index, 1);
    assert_eq!(result.confidence, 0.6);
    assert_eq!(*h.markers.applied.lock(), vec![(second, 1)]);
    assert!(h.cache.get(&hash_of("Q1", &["a", "b"])).await.is_none());
    assert!(h.cache.get(&hash_of("Q2", &["c", "d"])).await.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_switch_before_debounce_skips_first_request() {
    let h = harness();
    let first = h.page.add(1, "Q1", &["a", "b"]);
    let second = h.page.add(2, "Q2", &["c", "d"]);

    h.engine.handle_question(first).await;
    wait(100).await;
    h.engine.handle_question(second).await;
    h.engine.settle().await;

    let requests = h.analyzer.requests.lock().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].question, "Q2");
}

#[tokio::test(start_paused = true)]
async fn test_disable_mid_flight_never_marks() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);
    let gate = h
        .analyzer
        .respond_gated("2+2=?", AnalysisMode::Fast, SuggestionResult::choice(1, 0.9));
    h.panel.show();

    h.engine.handle_question(question).await;
    wait(350).await;
    assert_eq!(h.analyzer.count(AnalysisMode::Fast), 1);

    h.engine.set_enabled(false).await;
    gate.notify_one();
    h.engine.settle().await;

    assert!(h.markers.applied.lock().is_empty());
    assert_eq!(*h.markers.clears.lock(), 1);
    assert!(!h.panel.is_visible());
    assert!(h.engine.current_result().is_none());
    assert!(h.engine.active_hash().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_fast_failure_reports_once() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);
    h.analyzer.fail("2+2=?", AnalysisMode::Fast, "connection refused");
    h.panel.show();

    h.engine.handle_question(question).await;
    h.engine.settle().await;

    let messages = h.panel.messages.lock().clone();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], ANALYZING_MESSAGE);
    assert_eq!(messages[1], "AI analysis failed: Network error: connection refused");
    assert!(h.markers.applied.lock().is_empty());

    // Same question again: no automatic retry.
    h.engine.handle_question(question).await;
    h.engine.settle().await;
    assert_eq!(h.analyzer.count(AnalysisMode::Fast), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deep_failure_keeps_marker() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);
    h.analyzer
        .respond("2+2=?", AnalysisMode::Fast, SuggestionResult::choice(1, 0.9));
    h.analyzer.fail("2+2=?", AnalysisMode::Deep, "timeout");
    h.panel.show();

    h.engine.handle_question(question).await;
    h.engine.settle().await;

    assert_eq!(*h.markers.applied.lock(), vec![(question, 1)]);
    assert_eq!(*h.markers.clears.lock(), 0);
    assert_eq!(
        h.panel.messages.lock().last().map(String::as_str),
        Some("Detailed analysis failed: Network error: timeout")
    );
    assert_eq!(h.engine.current_result().unwrap().choice_index, 1);
}

#[tokio::test(start_paused = true)]
async fn test_deep_without_explanation_does_not_loop() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);
    h.analyzer
        .respond("2+2=?", AnalysisMode::Fast, SuggestionResult::choice(1, 0.9));
    h.analyzer
        .respond("2+2=?", AnalysisMode::Deep, SuggestionResult::choice(1, 0.9));
    h.panel.show();

    h.engine.handle_question(question).await;
    h.engine.settle().await;

    assert_eq!(h.analyzer.count(AnalysisMode::Deep), 1);
    let result = h.engine.current_result().unwrap();
    assert_eq!(result.explanation, "");
    assert_eq!(result.reason_for(0), NO_RATIONALE_PLACEHOLDER);
    assert_eq!(h.panel.last_update().map(|(_, pending)| pending), Some(false));
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_question_with_marker_is_noop() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);

    h.engine.handle_question(question).await;
    h.engine.settle().await;
    let hash = h.engine.active_hash();

    h.engine.handle_question(question).await;
    h.engine.settle().await;

    assert_eq!(h.analyzer.requests.lock().len(), 1);
    assert_eq!(h.markers.applied.lock().len(), 1);
    assert_eq!(h.engine.active_hash(), hash);
}

#[tokio::test(start_paused = true)]
async fn test_marker_removed_republishes_from_cache() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);

    h.engine.handle_question(question).await;
    h.engine.settle().await;
    h.page.marked.lock().clear();

    h.engine.handle_question(question).await;
    h.engine.settle().await;

    assert_eq!(h.analyzer.requests.lock().len(), 1);
    assert_eq!(h.markers.applied.lock().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_question_ignored() {
    let h = harness();
    let blank = h.page.add(1, "   ", &["a"]);
    let no_answers = h.page.add(2, "Q", &[]);

    h.engine.handle_question(blank).await;
    h.engine.handle_question(no_answers).await;
    h.engine.handle_question(ElementRef(99)).await;
    h.engine.settle().await;

    assert!(h.engine.active_hash().is_none());
    assert!(h.analyzer.requests.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_enable_warms_up_and_rescans() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);
    h.page.visible.lock().push(question);

    h.engine.set_enabled(false).await;
    h.engine.handle_question(question).await;
    assert!(h.engine.active_hash().is_none());

    h.engine.set_enabled(true).await;
    h.engine.settle().await;

    assert_eq!(*h.analyzer.warm_ups.lock(), 1);
    assert_eq!(h.analyzer.count(AnalysisMode::Fast), 1);
    assert_eq!(h.markers.applied.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_ignored_while_disabled() {
    let h = harness();
    h.engine.set_enabled(false).await;
    h.engine.toggle_panel();
    assert!(!h.panel.is_visible());
}

#[tokio::test(start_paused = true)]
async fn test_notify_question_runs_in_background() {
    let h = harness();
    let question = h.page.add(1, "2+2=?", &ANSWERS);
    h.analyzer
        .respond("2+2=?", AnalysisMode::Fast, SuggestionResult::choice(2, 0.4));

    h.engine.notify_question(question);
    h.engine.settle().await;

    assert_eq!(h.engine.current_result().unwrap().choice_index, 2);
}
