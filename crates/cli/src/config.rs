//! Environment-sourced settings for the composition root.
//!
//! This is the only place in the workspace that touches the environment;
//! everything downstream receives explicit configuration. API keys are
//! deliberately not validated here: a missing key surfaces as an HTTP 401
//! on the first provider call.

use std::env;
use std::path::PathBuf;

use llm::ProviderConfig;

const DEFAULT_TOGETHER_BASE_URL: &str = "https://api.together.xyz/v1";
const DEFAULT_TOGETHER_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo-Free";
const DEFAULT_COHERE_BASE_URL: &str = "https://api.cohere.ai/v1";
const DEFAULT_COHERE_MODEL: &str = "command";
const DEFAULT_OUTPUT_DIR: &str = "output";

/// Everything the drivers need, resolved once at process start.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Chat-completions provider settings.
    pub together: ProviderConfig,
    /// Single-prompt generation provider settings.
    pub cohere: ProviderConfig,
    /// Directory all artifacts are written to.
    pub output_dir: PathBuf,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self {
            together: ProviderConfig {
                api_key: env::var("TOGETHER_API_KEY").unwrap_or_default(),
                base_url: env::var("DRAFTWORKS_TOGETHER_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_TOGETHER_BASE_URL.to_string()),
                model: env::var("DRAFTWORKS_TOGETHER_MODEL")
                    .unwrap_or_else(|_| DEFAULT_TOGETHER_MODEL.to_string()),
            },
            cohere: ProviderConfig {
                api_key: env::var("COHERE_API_KEY").unwrap_or_default(),
                base_url: env::var("DRAFTWORKS_COHERE_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_COHERE_BASE_URL.to_string()),
                model: env::var("DRAFTWORKS_COHERE_MODEL")
                    .unwrap_or_else(|_| DEFAULT_COHERE_MODEL.to_string()),
            },
            output_dir: env::var("DRAFTWORKS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        }
    }
}
