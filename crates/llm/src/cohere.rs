//! Single-prompt generation adapter for the Cohere API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pipeline::{CompletionError, GenerateRequest, TextGeneration};

use crate::ProviderConfig;

const PROVIDER: &str = "cohere";

/// Text-generation client for `POST {base_url}/generate`.
#[derive(Debug, Clone)]
pub struct CohereClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    return_likelihoods: &'a str,
}

#[derive(Deserialize)]
struct GenerateReply {
    generations: Vec<Generation>,
}

#[derive(Deserialize)]
struct Generation {
    text: String,
}

impl CohereClient {
    /// Creates a client from injected provider settings.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/generate", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextGeneration for CohereClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String, CompletionError> {
        let body = GenerateBody {
            model: &self.config.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens.as_u32(),
            temperature: request.temperature,
            return_likelihoods: "NONE",
        };

        tracing::debug!(
            model = %self.config.model,
            max_tokens = %request.max_tokens,
            "sending generation request"
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

        let reply: GenerateReply =
            response
                .json()
                .await
                .map_err(|err| CompletionError::MalformedReply {
                    provider: PROVIDER,
                    detail: err.to_string(),
                })?;

        let text = reply
            .generations
            .into_iter()
            .next()
            .map(|generation| generation.text)
            .ok_or_else(|| CompletionError::MalformedReply {
                provider: PROVIDER,
                detail: "empty generations array".to_string(),
            })?;

        Ok(text.trim().to_string())
    }
}
