//! Candidate model list for fallback.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Models tried when discovery yields nothing.
pub const DEFAULT_MODELS: [&str; 3] = ["gemini-1.5-flash-latest", "gemini-1.5-flash", "gemini-1.0-pro"];

/// How long a `models.list` result is reused.
pub const MODEL_LIST_TTL: Duration = Duration::from_secs(5 * 60);

/// Process-wide cache of the discovered model list.
pub struct ModelCatalog {
    ttl: Duration,
    cached: Mutex<Option<(Instant, Vec<String>)>>,
}

impl ModelCatalog {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            cached: Mutex::new(None),
        }
    }

    /// Cached list, if still fresh.
    pub fn fresh(&self) -> Option<Vec<String>> {
        let cached = self.cached.lock();
        cached
            .as_ref()
            .filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, models)| models.clone())
    }

    /// Remember a non-empty discovery result.
    pub fn store(&self, models: Vec<String>) {
        if models.is_empty() {
            return;
        }
        *self.cached.lock() = Some((Instant::now(), models));
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new(MODEL_LIST_TTL)
    }
}

/// Order candidates: preferred model, then the discovered list or the
/// defaults when discovery gave nothing. Duplicates are dropped.
pub(crate) fn order_candidates(preferred: Option<&str>, discovered: Option<Vec<String>>) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |model: String| {
        if !model.is_empty() && !candidates.contains(&model) {
            candidates.push(model);
        }
    };

    if let Some(preferred) = preferred {
        push(preferred.to_string());
    }
    match discovered {
        Some(models) if !models.is_empty() => models.into_iter().for_each(&mut push),
        _ => DEFAULT_MODELS.iter().for_each(|m| push(m.to_string())),
    }
    candidates
}
