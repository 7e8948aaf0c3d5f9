use crate::prompt::build_prompt;
use crate::{READER_MAX_NEW_TOKENS, READER_TEMPERATURE};
use async_trait::async_trait;
use pagemark_common::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Check if the generation backend is available
    async fn health_check(&self) -> Result<bool>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Render cleaned page HTML with the reader decoding defaults.
    ///
    /// Builds the instruction prompt around `cleaned_html` and runs one
    /// greedy, length-bounded generation. The output is Markdown, or JSON
    /// when `schema` is supplied.
    async fn render(
        &self,
        cleaned_html: &str,
        instruction: Option<&str>,
        schema: Option<&str>,
    ) -> Result<String> {
        let prompt = build_prompt(cleaned_html, instruction, schema);
        tracing::debug!(prompt_len = prompt.len(), "invoking reader model");

        let response = self
            .generate(
                &prompt,
                None,
                Some(READER_MAX_NEW_TOKENS),
                Some(READER_TEMPERATURE),
            )
            .await?;

        Ok(response.text)
    }
}
