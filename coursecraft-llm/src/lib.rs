//! # coursecraft-llm
//!
//! Chat-completion plumbing for coursecraft.
//!
//! - **LlmProvider**: trait every backend implements
//! - **OpenAIProvider**: any OpenAI-compatible `/chat/completions` endpoint
//! - **ScriptedProvider**: offline backend that replays canned answers
//! - **UsageTracker**: token accounting across calls

pub mod provider;

pub use coursecraft_error::{Error, ErrorKind, ErrorStatus, Result};
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
    OpenAIProvider, ProviderConfig, ProviderError, Role, ScriptedProvider, Usage,
    UsageTracker,
};
