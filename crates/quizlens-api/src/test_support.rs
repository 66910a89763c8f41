//! Scripted model backend shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quizlens_protocols::{GenerationRequest, ModelBackend, ProviderError};

/// Replies in order and records every request.
pub(crate) struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub(crate) fn new(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn replying(texts: &[&str]) -> Arc<Self> {
        Self::new(texts.iter().map(|text| Ok(text.to_string())).collect())
    }

    pub(crate) fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::InvalidResponse("no scripted reply".into())))
    }
}
