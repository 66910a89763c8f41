//! Two-phase suggestion engine.
//!
//! Each identified question goes `Identified -> (CacheHit | Pending) ->
//! FastResolved -> DeepPending -> DeepResolved`, with `Disabled` reachable
//! from anywhere. Async completions are fenced: the hash and request id are
//! captured when a request is issued and compared with the live session
//! state when it resolves, and stale completions are dropped. Timers are
//! cancelled, requests never are.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use quizlens_config::{Config, IdentityAlgorithm};
use quizlens_protocols::{
    AnalyzeRequest, Analyzer, ElementRef, MarkerSink, PageSource, PanelSink, QuestionSnapshot,
    SuggestionResult, UpdateOptions,
};
use quizlens_store::ResultCache;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, trace, warn};

use crate::identity::{IdentityHash, compute_identity};
use crate::observer::find_current_question;

/// Panel text while the fast request is pending.
pub const ANALYZING_MESSAGE: &str = "Analyzing the current question...";

/// Engine tuning.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub algorithm: IdentityAlgorithm,
    /// Delay before the fast request, absorbing rapid question switches.
    pub fast_debounce: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            algorithm: IdentityAlgorithm::Sha256,
            fast_debounce: Duration::from_millis(300),
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            algorithm: config.identity.algorithm,
            fast_debounce: Duration::from_millis(config.client.fast_debounce_ms),
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveQuestion {
    snapshot: QuestionSnapshot,
    hash: IdentityHash,
}

/// Identity of an issued request, captured before it suspends.
#[derive(Debug, Clone)]
struct Ticket {
    hash: IdentityHash,
    request_id: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    enabled: bool,
    /// Question currently displayed.
    active_hash: Option<IdentityHash>,
    /// Question whose fast result is still wanted.
    pending_hash: Option<IdentityHash>,
    current: Option<ActiveQuestion>,
    result: Option<SuggestionResult>,
    fast_request_id: u64,
    deep_request_id: u64,
    pending_timer: Option<CancellationToken>,
}

impl SessionState {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.pending_timer.take() {
            timer.cancel();
        }
    }

    /// Orphan every in-flight completion.
    fn invalidate(&mut self) {
        self.cancel_timer();
        self.fast_request_id += 1;
        self.deep_request_id += 1;
    }

    fn fast_is_current(&self, ticket: &Ticket) -> bool {
        self.enabled
            && self.fast_request_id == ticket.request_id
            && self.pending_hash.as_ref() == Some(&ticket.hash)
    }

    fn deep_is_current(&self, ticket: &Ticket) -> bool {
        self.enabled
            && self.deep_request_id == ticket.request_id
            && self.active_hash.as_ref() == Some(&ticket.hash)
    }

    /// The fast request for `hash` was issued and has not resolved.
    fn awaiting_fast(&self, hash: &IdentityHash) -> bool {
        self.pending_hash.as_ref() == Some(hash) && self.result.is_none()
    }
}

struct EngineInner {
    page: Arc<dyn PageSource>,
    analyzer: Arc<dyn Analyzer>,
    cache: ResultCache,
    markers: Arc<dyn MarkerSink>,
    panel: Arc<dyn PanelSink>,
    options: EngineOptions,
    state: Mutex<SessionState>,
    tasks: TaskTracker,
}

/// Orchestrates identity, cache, analysis and rendering for the current
/// question. Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct SuggestionEngine {
    inner: Arc<EngineInner>,
}

impl SuggestionEngine {
    /// Create an enabled engine with an empty session.
    pub fn new(
        page: Arc<dyn PageSource>,
        analyzer: Arc<dyn Analyzer>,
        cache: ResultCache,
        markers: Arc<dyn MarkerSink>,
        panel: Arc<dyn PanelSink>,
        options: EngineOptions,
    ) -> Self {
        let state = SessionState {
            enabled: true,
            ..Default::default()
        };
        Self {
            inner: Arc::new(EngineInner {
                page,
                analyzer,
                cache,
                markers,
                panel,
                options,
                state: Mutex::new(state),
                tasks: TaskTracker::new(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.state.lock().enabled
    }

    /// Result for the question on screen.
    pub fn current_result(&self) -> Option<SuggestionResult> {
        self.inner.state.lock().result.clone()
    }

    pub fn active_hash(&self) -> Option<IdentityHash> {
        self.inner.state.lock().active_hash.clone()
    }

    /// Run [`handle_question`](Self::handle_question) in the background.
    pub fn notify_question(&self, element: ElementRef) {
        let engine = self.clone();
        self.inner
            .tasks
            .spawn(async move { engine.handle_question(element).await });
    }

    /// React to an observer announcement for `element`.
    pub async fn handle_question(&self, element: ElementRef) {
        let inner = &self.inner;
        if !inner.state.lock().enabled {
            return;
        }

        let parsed = inner.page.parse_question(element);
        if parsed.is_empty() {
            trace!("Ignoring element {:?} without question text or answers", element);
            return;
        }
        let hash = compute_identity(inner.options.algorithm, &parsed.question_text, &parsed.answers);
        let has_marker = inner.page.has_marker(element);
        let snapshot = QuestionSnapshot::new(element, parsed);

        let ticket = {
            let mut state = inner.state.lock();
            if !state.enabled {
                return;
            }
            if state.active_hash.as_ref() == Some(&hash)
                && (has_marker || state.awaiting_fast(&hash))
            {
                trace!("Question {} unchanged", hash);
                return;
            }

            state.invalidate();
            state.active_hash = Some(hash.clone());
            state.pending_hash = Some(hash.clone());
            state.current = Some(ActiveQuestion {
                snapshot: snapshot.clone(),
                hash: hash.clone(),
            });
            state.result = None;
            Ticket {
                hash,
                request_id: state.fast_request_id,
            }
        };
        debug!("Question identified: {}", ticket.hash);

        if let Some(cached) = inner.cache.get(ticket.hash.as_str()).await {
            {
                let mut state = inner.state.lock();
                if !state.fast_is_current(&ticket) {
                    return;
                }
                state.result = Some(cached);
            }
            debug!("Using cached result for {}", ticket.hash);
            self.render_markers();
            if inner.panel.is_visible() {
                self.ensure_explanation();
            }
            return;
        }

        let timer = CancellationToken::new();
        {
            let mut state = inner.state.lock();
            if !state.fast_is_current(&ticket) {
                return;
            }
            state.cancel_timer();
            state.pending_timer = Some(timer.clone());
        }

        if inner.panel.is_visible() {
            inner.panel.show_message(ANALYZING_MESSAGE);
        }

        let engine = self.clone();
        inner
            .tasks
            .spawn(async move { engine.run_fast(snapshot, ticket, timer).await });
    }

    async fn run_fast(&self, snapshot: QuestionSnapshot, ticket: Ticket, timer: CancellationToken) {
        let inner = &self.inner;
        tokio::select! {
            _ = timer.cancelled() => {
                trace!("Fast request for {} superseded before issue", ticket.hash);
                return;
            }
            _ = tokio::time::sleep(inner.options.fast_debounce) => {}
        }

        {
            let mut state = inner.state.lock();
            if !state.fast_is_current(&ticket) {
                return;
            }
            state.pending_timer = None;
        }

        debug!("Issuing fast request for {}", ticket.hash);
        let request = AnalyzeRequest::fast(snapshot.question_text, snapshot.answers);
        let outcome = inner.analyzer.analyze(request).await;

        let result = {
            let mut state = inner.state.lock();
            if !state.fast_is_current(&ticket) {
                debug!("Discarding stale fast result for {}", ticket.hash);
                return;
            }
            match outcome {
                Ok(result) => {
                    state.result = Some(result.clone());
                    result
                }
                Err(e) => {
                    drop(state);
                    warn!("Fast analysis failed for {}: {}", ticket.hash, e);
                    inner.panel.show_message(&format!("AI analysis failed: {}", e));
                    return;
                }
            }
        };

        self.persist(&ticket.hash, &result).await;
        if !inner.state.lock().fast_is_current(&ticket) {
            return;
        }

        self.render_markers();
        if inner.panel.is_visible() {
            self.ensure_explanation();
        }
    }

    /// Make sure the panel shows a complete explanation, starting the deep
    /// phase when the current result lacks one.
    ///
    /// Deep requests have their own fencing counter, so a newer trigger
    /// (panel reopened, question changed) orphans an older one.
    pub fn ensure_explanation(&self) {
        let inner = &self.inner;
        let (ticket, request) = {
            let mut state = inner.state.lock();
            if !state.enabled {
                return;
            }
            let Some((hash, request, complete)) = state
                .current
                .as_ref()
                .zip(state.result.as_ref())
                .map(|(current, result)| {
                    (
                        current.hash.clone(),
                        AnalyzeRequest::deep(
                            current.snapshot.question_text.clone(),
                            current.snapshot.answers.clone(),
                            result.choice_index,
                            result.confidence,
                        ),
                        result.is_explanation_complete(),
                    )
                })
            else {
                return;
            };

            if complete {
                drop(state);
                self.render_panel(false);
                return;
            }

            state.deep_request_id += 1;
            let ticket = Ticket {
                hash,
                request_id: state.deep_request_id,
            };
            (ticket, request)
        };

        self.render_panel(true);

        let engine = self.clone();
        inner
            .tasks
            .spawn(async move { engine.run_deep(ticket, request).await });
    }

    async fn run_deep(&self, ticket: Ticket, request: AnalyzeRequest) {
        let inner = &self.inner;
        let answer_count = request.answers.len();
        debug!("Issuing deep request for {}", ticket.hash);
        let outcome = inner.analyzer.analyze(request).await;

        let merged = {
            let mut state = inner.state.lock();
            if !state.deep_is_current(&ticket) {
                debug!("Discarding stale deep result for {}", ticket.hash);
                return;
            }
            match outcome {
                Ok(deep) => {
                    let Some(existing) = state.result.as_ref() else {
                        return;
                    };
                    let merged = existing.merge(deep, answer_count);
                    state.result = Some(merged.clone());
                    merged
                }
                Err(e) => {
                    drop(state);
                    warn!("Deep analysis failed for {}: {}", ticket.hash, e);
                    inner
                        .panel
                        .show_message(&format!("Detailed analysis failed: {}", e));
                    return;
                }
            }
        };

        self.persist(&ticket.hash, &merged).await;
        if !inner.state.lock().deep_is_current(&ticket) {
            return;
        }

        // Published as-is even without an explanation; reopening the panel
        // is the retry path.
        self.render_markers();
        self.render_panel(false);
    }

    /// Turn suggestions on or off.
    ///
    /// Disabling orphans all in-flight work and clears every visual.
    /// Enabling fires a warm-up and re-detects the visible question without
    /// waiting for the observer.
    pub async fn set_enabled(&self, enabled: bool) {
        let inner = &self.inner;
        if !enabled {
            {
                let mut state = inner.state.lock();
                state.enabled = false;
                state.invalidate();
                state.active_hash = None;
                state.pending_hash = None;
                state.current = None;
                state.result = None;
            }
            inner.markers.clear_markers();
            inner.panel.hide();
            info!("Suggestions disabled");
            return;
        }

        inner.state.lock().enabled = true;
        info!("Suggestions enabled");

        // Fire and forget: the outcome of a warm-up is never shown.
        let analyzer = inner.analyzer.clone();
        inner.tasks.spawn(async move {
            if let Err(e) = analyzer.warm_up().await {
                debug!("Warm-up failed: {}", e);
            }
        });

        if let Some(element) = find_current_question(inner.page.as_ref()) {
            self.handle_question(element).await;
        }
    }

    /// Hotkey action: toggle the panel and fill in the explanation when it
    /// opens.
    pub fn toggle_panel(&self) {
        if !self.is_enabled() {
            return;
        }
        self.inner.panel.toggle();
        if self.inner.panel.is_visible() {
            self.ensure_explanation();
        }
    }

    /// Wait until all background work spawned so far has finished,
    /// including work it spawns in turn.
    pub async fn settle(&self) {
        let tasks = &self.inner.tasks;
        tasks.close();
        tasks.wait().await;
        tasks.reopen();
    }

    async fn persist(&self, hash: &IdentityHash, result: &SuggestionResult) {
        if let Err(e) = self.inner.cache.set(hash.as_str(), result).await {
            warn!("Failed to cache result for {}: {}", hash, e);
        }
    }

    fn render_markers(&self) {
        let inner = &self.inner;
        let target = {
            let state = inner.state.lock();
            match (&state.current, &state.result) {
                (Some(current), Some(result)) if state.active_hash.as_ref() == Some(&current.hash) => {
                    Some((current.snapshot.element, result.choice_index))
                }
                _ => None,
            }
        };
        if let Some((element, choice_index)) = target {
            let items = inner.page.extract_answer_items(element);
            inner.markers.apply_marker(&items, choice_index);
        }
    }

    fn render_panel(&self, pending_explanation: bool) {
        let inner = &self.inner;
        if !inner.panel.is_visible() {
            return;
        }
        let view = {
            let state = inner.state.lock();
            state
                .current
                .as_ref()
                .zip(state.result.as_ref())
                .map(|(current, result)| (current.snapshot.clone(), result.clone()))
        };
        if let Some((snapshot, result)) = view {
            inner
                .panel
                .update(&snapshot, &result, UpdateOptions { pending_explanation });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
