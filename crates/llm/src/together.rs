//! Chat-completions adapter for the Together AI API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pipeline::{ChatCompletion, ChatMessage, ChatRequest, CompletionError};

use crate::ProviderConfig;

const PROVIDER: &str = "together";

/// Chat-style completion client for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct TogetherClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionReply {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl TogetherClient {
    /// Creates a client from injected provider settings.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatCompletion for TogetherClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, CompletionError> {
        let body = ChatCompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens.as_u32(),
            temperature: request.temperature,
        };

        tracing::debug!(
            model = %self.config.model,
            max_tokens = %request.max_tokens,
            "sending chat completion request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| CompletionError::Transport {
                provider: PROVIDER,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(CompletionError::Http {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatCompletionReply =
            response
                .json()
                .await
                .map_err(|err| CompletionError::MalformedReply {
                    provider: PROVIDER,
                    detail: err.to_string(),
                })?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::MalformedReply {
                provider: PROVIDER,
                detail: "empty choices array".to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_shape_deserialises() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  hello  "}}
            ],
            "usage": {"total_tokens": 12}
        }"#;
        let reply: ChatCompletionReply = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.choices[0].message.content, "  hello  ");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = TogetherClient::new(ProviderConfig {
            api_key: String::new(),
            base_url: "https://api.together.xyz/v1/".to_string(),
            model: "test-model".to_string(),
        });
        assert_eq!(
            client.endpoint(),
            "https://api.together.xyz/v1/chat/completions"
        );
    }
}
