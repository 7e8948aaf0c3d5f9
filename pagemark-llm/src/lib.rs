//! Provider-agnostic generation backend for Pagemark.
//!
//! This crate exposes a common [`traits::LlmClient`] interface, the
//! [`prompt`] builder for reader-style instruction prompts, and concrete
//! provider implementations for Ollama (local inference, the default) and
//! OpenAI-compatible chat endpoints. [`client_from_config`] builds a client
//! from a [`pagemark_config::LlmProvider`].
//!
//! Generation follows the reader decoding discipline throughout: greedy
//! (temperature 0), bounded output, and a fixed repetition penalty.
//!
//! # Examples
//! ```no_run
//! use pagemark_config::LlmProvider;
//! use pagemark_llm::client_from_config;
//!
//! # #[tokio::main]
//! # async fn main() -> pagemark_common::Result<()> {
//! let client = client_from_config(&LlmProvider::default()).await?;
//! assert!(!client.model_name().is_empty());
//! # Ok(())
//! # }
//! ```
pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod traits;

use ollama::OllamaClient;
use openai::OpenAiChatClient;
use pagemark_config::LlmProvider;
use std::sync::Arc;
use traits::LlmClient;

/// Greedy decoding: no sampling.
pub const READER_TEMPERATURE: f32 = 0.0;
/// Bound on generated output length.
pub const READER_MAX_NEW_TOKENS: u32 = 1024;
/// Fixed repetition penalty applied to every reader generation.
pub const READER_REPETITION_PENALTY: f64 = 1.08;

/// Build a ready-to-use client from typed provider configuration.
///
/// For Ollama this also verifies the server is reachable and pulls the
/// configured checkpoint when it is missing locally.
pub async fn client_from_config(
    provider: &LlmProvider,
) -> pagemark_common::Result<Arc<dyn LlmClient + Send + Sync + 'static>> {
    match provider {
        LlmProvider::Ollama { endpoint, model } => {
            let client = OllamaClient::new(endpoint.clone(), model.clone()).await?;
            Ok(Arc::new(client))
        }
        LlmProvider::Openai {
            endpoint,
            auth_token,
            model,
        } => {
            let client =
                OpenAiChatClient::new(endpoint.clone(), auth_token.clone(), model.clone())?;
            Ok(Arc::new(client))
        }
    }
}
