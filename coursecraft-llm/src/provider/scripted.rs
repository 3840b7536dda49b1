//! Offline provider that replays canned answers.
//!
//! Used by `coursecraft recommend --dry-run` and by tests that need to see
//! exactly which requests were sent.

use super::*;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Reply {
    Text(String),
    Fail(ProviderError),
}

/// Answers requests from a queue, falling back to a fixed reply once the
/// queue is empty. Every request is recorded.
pub struct ScriptedProvider {
    model: String,
    replies: Mutex<VecDeque<Reply>>,
    fallback: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            model: "scripted".to_string(),
            replies: Mutex::new(VecDeque::new()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that answers every request with the same text
    pub fn always(reply: impl Into<String>) -> Self {
        Self::new().with_fallback(reply)
    }

    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    /// Queue a successful reply
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Reply::Text(text.into()));
        self
    }

    /// Queue a failure
    pub fn fail(self, error: ProviderError) -> Self {
        self.push(Reply::Fail(error));
        self
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        let prompt_tokens: usize = request
            .messages
            .iter()
            .map(|m| m.content.split_whitespace().count())
            .sum();

        let call = {
            let mut requests = self
                .requests
                .lock()
                .map_err(|_| ProviderError::Other("request log poisoned".into()))?;
            requests.push(request);
            requests.len()
        };

        let next = self
            .replies
            .lock()
            .map_err(|_| ProviderError::Other("reply queue poisoned".into()))?
            .pop_front();

        let text = match next {
            Some(Reply::Text(text)) => text,
            Some(Reply::Fail(err)) => return Err(err),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| ProviderError::Other("no scripted reply left".into()))?,
        };

        let completion_tokens = text.split_whitespace().count();
        Ok(CompletionResponse {
            id: format!("scripted-{}", call),
            model,
            content: Some(text),
            finish_reason: FinishReason::Stop,
            usage: Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
        })
    }
}
