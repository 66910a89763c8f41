//! Current-question detection and page event debouncing.

use std::sync::Arc;
use std::time::Duration;

use quizlens_config::ClientConfig;
use quizlens_protocols::{ElementRef, PageEvent, PageSource};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Pick the current question element.
///
/// Among the visible candidates the one with the largest area inside the
/// viewport wins; on a tie the earliest candidate is kept.
pub fn find_current_question(page: &dyn PageSource) -> Option<ElementRef> {
    let viewport = page.viewport();
    let mut best: Option<(ElementRef, f64)> = None;

    for candidate in page.question_candidates() {
        if !candidate.is_visible(&viewport) {
            continue;
        }
        let area = candidate.bounds.visible_area(&viewport);
        if best.is_none_or(|(_, best_area)| area > best_area) {
            best = Some((candidate.element, area));
        }
    }

    best.map(|(element, _)| element)
}

/// Observer timing parameters.
#[derive(Debug, Clone, Copy)]
pub struct ObserverTimings {
    /// Trailing window that coalesces bursts of page events.
    pub debounce: Duration,
    /// An unchanged element is announced again once this much time passed.
    pub renotify_after: Duration,
}

impl Default for ObserverTimings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
            renotify_after: Duration::from_millis(500),
        }
    }
}

impl From<&ClientConfig> for ObserverTimings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.observer_debounce_ms),
            renotify_after: Duration::from_millis(config.renotify_ms),
        }
    }
}

type Listener = Arc<dyn Fn(ElementRef) + Send + Sync>;

/// Watches page events and announces the current question.
pub struct QuestionObserver {
    page: Arc<dyn PageSource>,
    listener: Listener,
    timings: ObserverTimings,
    last: Option<(ElementRef, Instant)>,
}

impl QuestionObserver {
    /// Start observing. An initial check runs right away; later checks run
    /// once `events` has been quiet for the debounce window.
    ///
    /// Observation ends when the handle is disposed or dropped, or when the
    /// event sender is closed.
    pub fn spawn<F>(
        page: Arc<dyn PageSource>,
        events: mpsc::Receiver<PageEvent>,
        listener: F,
        timings: ObserverTimings,
    ) -> ObserverHandle
    where
        F: Fn(ElementRef) + Send + Sync + 'static,
    {
        let token = CancellationToken::new();
        let observer = Self {
            page,
            listener: Arc::new(listener),
            timings,
            last: None,
        };
        let task = tokio::spawn(observer.run(events, token.clone()));
        ObserverHandle { token, task }
    }

    async fn run(mut self, mut events: mpsc::Receiver<PageEvent>, token: CancellationToken) {
        self.check();

        loop {
            let event = tokio::select! {
                _ = token.cancelled() => break,
                event = events.recv() => event,
            };
            let Some(event) = event else { break };
            trace!("Page event {:?}", event);

            let mut deadline = Instant::now() + self.timings.debounce;
            let mut closed = false;
            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = sleep_until(deadline) => break,
                    event = events.recv() => match event {
                        Some(_) => deadline = Instant::now() + self.timings.debounce,
                        None => {
                            closed = true;
                            break;
                        }
                    },
                }
            }

            self.check();
            if closed {
                break;
            }
        }

        debug!("Question observer stopped");
    }

    fn check(&mut self) {
        let Some(current) = find_current_question(self.page.as_ref()) else {
            return;
        };
        let now = Instant::now();
        let changed = match self.last {
            Some((element, at)) => {
                element != current || now.duration_since(at) > self.timings.renotify_after
            }
            None => true,
        };
        if changed {
            self.last = Some((current, now));
            (self.listener)(current);
        }
    }
}

/// Stops the observer when disposed or dropped.
pub struct ObserverHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl ObserverHandle {
    /// Halt all observation.
    pub fn dispose(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
