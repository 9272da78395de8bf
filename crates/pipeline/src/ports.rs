//! Provider port traits for the two external text-generation services.
//!
//! The stages depend only on these traits; the `llm` crate supplies the
//! HTTP implementations. Keeping the ports here means every stage can be
//! exercised in tests with a scripted double instead of a live provider,
//! and credentials stay an infrastructure concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::TokenBudget;

// ---------------------------------------------------------------------------
// Request records
// ---------------------------------------------------------------------------

/// Role of one message in a chat-style completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions framing the conversation.
    System,
    /// Content authored by the caller.
    User,
    /// Content authored by the model.
    Assistant,
}

/// One message in a chat-style completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: ChatRole,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a user-authored message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A chat-style completion request.
///
/// The model identifier is supplied by the provider adapter from its own
/// configuration; stages only choose the conversation, token budget, and
/// sampling temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Ordered conversation to complete.
    pub messages: Vec<ChatMessage>,
    /// Response-token cap.
    pub max_tokens: TokenBudget,
    /// Sampling temperature.
    pub temperature: f32,
}

/// A single-prompt text-generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// The prompt to complete.
    pub prompt: String,
    /// Response-token cap.
    pub max_tokens: TokenBudget,
    /// Sampling temperature.
    pub temperature: f32,
}

// ---------------------------------------------------------------------------
// Provider errors
// ---------------------------------------------------------------------------

/// A provider call failed.
///
/// Calls are never retried; the owning stage either absorbs the failure
/// into a fallback value or converts it into
/// [`crate::errors::PipelineError::Completion`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The request never produced an HTTP response.
    #[error("transport failure talking to {provider}: {message}")]
    Transport {
        /// Provider name for log context.
        provider: &'static str,
        /// The underlying client failure.
        message: String,
    },

    /// The provider answered with a non-success HTTP status.
    ///
    /// A missing API key surfaces here as a 401 on the first call; keys are
    /// deliberately not validated up front.
    #[error("{provider} returned HTTP {status}: {body}")]
    Http {
        /// Provider name for log context.
        provider: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The provider answered 200 but the body did not carry a completion.
    #[error("{provider} reply carried no completion: {detail}")]
    MalformedReply {
        /// Provider name for log context.
        provider: &'static str,
        /// What was missing from the body.
        detail: String,
    },
}

// ---------------------------------------------------------------------------
// Port traits
// ---------------------------------------------------------------------------

/// Chat-style completion service (used by four of the five stages).
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Sends one completion request and returns the reply text, trimmed.
    async fn complete(&self, request: ChatRequest) -> Result<String, CompletionError>;
}

/// Single-prompt generation service (used by the planning stage).
#[async_trait]
pub trait TextGeneration: Send + Sync {
    /// Sends one generation request and returns the reply text, trimmed.
    async fn generate(&self, request: GenerateRequest) -> Result<String, CompletionError>;
}
