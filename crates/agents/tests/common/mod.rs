//! Scripted provider doubles shared by the agent integration tests.
//!
//! Each double records every request it receives so tests can assert on
//! the exact configuration a stage dispatched (token budgets, temperature,
//! prompt text) independently of reply content.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pipeline::{ChatCompletion, ChatRequest, CompletionError, GenerateRequest, TextGeneration};

fn scripted_failure(provider: &'static str) -> CompletionError {
    CompletionError::Transport {
        provider,
        message: "scripted failure".to_string(),
    }
}

/// Chat double: pops one scripted reply per call, failing when empty.
pub struct ScriptedChat {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    /// A double that answers the given replies in order.
    pub fn with_replies<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// A double whose every call fails with a transport error.
    pub fn failing() -> Arc<Self> {
        Self::with_replies(Vec::<String>::new())
    }

    /// Every request received so far, in order.
    pub fn recorded(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
    async fn complete(&self, request: ChatRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => Ok(reply.trim().to_string()),
            None => Err(scripted_failure("scripted-chat")),
        }
    }
}

/// Generation double: answers one fixed reply, or always fails.
pub struct ScriptedGenerator {
    reply: Option<String>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedGenerator {
    /// A double that answers `reply` on every call.
    pub fn with_reply(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// A double whose every call fails with a transport error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Every request received so far, in order.
    pub fn recorded(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGeneration for ScriptedGenerator {
    async fn generate(&self, request: GenerateRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Some(reply) => Ok(reply.trim().to_string()),
            None => Err(scripted_failure("scripted-generator")),
        }
    }
}
