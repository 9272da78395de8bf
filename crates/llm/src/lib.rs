//! DraftWorks LLM provider infrastructure adapters.
//!
//! Implements the [`pipeline::ChatCompletion`] and
//! [`pipeline::TextGeneration`] traits over HTTP:
//!
//! - [`TogetherClient`] — chat-style completions (`POST …/chat/completions`),
//!   used by the research, content, SEO, and review stages.
//! - [`CohereClient`] — single-prompt generation (`POST …/generate`), used
//!   by the planning stage.
//!
//! Additional providers are added as new modules in this crate without any
//! changes to the `pipeline` crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All HTTP transport, request formatting, and response
//! parsing live here. The stages see only the port traits.
//!
//! Credentials arrive through [`ProviderConfig`] — constructed by the CLI
//! composition root, never read from ambient state here. A missing API key
//! is not validated up front; it surfaces as an HTTP 401 on the first call.
//! Calls are never retried and carry no timeout beyond the client default.

pub mod cohere;
pub mod together;

pub use cohere::CohereClient;
pub use together::TogetherClient;

/// Connection settings for one provider, injected at construction time.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Bearer token for the provider API.
    pub api_key: String,
    /// Base URL of the provider API, without a trailing slash.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
}
