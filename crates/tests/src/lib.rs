//! Shared fixtures for the end-to-end tests.

use std::collections::VecDeque;
use std::sync::Arc;

use ariana_provider::{ChatProvider, ChatTurn, ProviderError, ProviderReply};
use parking_lot::Mutex;

/// In-process model that answers from a queue of scripted results and
/// records every history it was handed. An empty queue echoes the last turn.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    script: Arc<Mutex<VecDeque<Result<ProviderReply, ProviderError>>>>,
    calls: Arc<Mutex<Vec<Vec<ChatTurn>>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: Result<ProviderReply, ProviderError>) -> &Self {
        self.script.lock().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Vec<ChatTurn>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl ChatProvider for ScriptedProvider {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, history: &[ChatTurn]) -> Result<ProviderReply, ProviderError> {
        self.calls.lock().push(history.to_vec());
        let scripted = self.script.lock().pop_front();
        scripted.unwrap_or_else(|| {
            let last = history.last().map(|turn| turn.text.as_str()).unwrap_or_default();
            Ok(ProviderReply::text(format!("echo: {last}")))
        })
    }
}
