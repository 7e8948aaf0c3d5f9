use crate::traits::{LlmClient, LlmResponse};
use crate::READER_REPETITION_PENALTY;
use async_trait::async_trait;
use pagemark_common::{PagemarkError, Result};
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

const OLLAMA_CONNECTION_ERROR: &str = "No running Ollama server detected. Start it with: `ollama serve` (after installing). Install instructions: https://github.com/ollama/ollama";

/// Ollama client for local reader-model inference.
///
/// Expects a running Ollama server (see https://github.com/ollama/ollama);
/// the configured checkpoint is pulled on first use when absent.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a new client and verify server/model availability.
    pub async fn new(base_url: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PagemarkError::Llm(format!("Failed to create HTTP client: {}", e)))?;

        let ollama_client = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        };

        // Verify server is reachable
        ollama_client.probe_server().await?;

        // Ensure the checkpoint is available locally
        ollama_client.ensure_model_available().await?;

        Ok(ollama_client)
    }

    async fn probe_server(&self) -> Result<()> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|_| PagemarkError::Llm(OLLAMA_CONNECTION_ERROR.to_string()))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(PagemarkError::Llm(OLLAMA_CONNECTION_ERROR.to_string()))
        }
    }

    async fn ensure_model_available(&self) -> Result<()> {
        let models = self.fetch_available_models().await?;

        if !models.contains(&self.model) {
            tracing::info!("Model {} not found locally, pulling...", self.model);
            self.pull_model(&self.model).await?;
        }

        Ok(())
    }

    async fn fetch_available_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PagemarkError::Llm(format!("Failed to fetch models: {}", e)))?;

        if !resp.status().is_success() {
            return Ok(Vec::new());
        }

        let val: JsonValue = resp
            .json()
            .await
            .map_err(|e| PagemarkError::Llm(format!("Failed to parse models response: {}", e)))?;

        let models = val
            .get("models")
            .and_then(|m| m.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.get("name").and_then(|n| n.as_str()))
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }

    async fn pull_model(&self, model: &str) -> Result<()> {
        let url = format!("{}/api/pull", self.base_url);
        let payload = json!({
            "model": model,
            "stream": false
        });

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PagemarkError::Llm(format!("Failed to pull model: {}", e)))?;

        if resp.status().is_success() {
            tracing::info!("Successfully pulled model: {}", model);
            Ok(())
        } else {
            Err(PagemarkError::Llm(format!(
                "Failed to pull model: HTTP {}",
                resp.status()
            )))
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let url = format!("{}/api/generate", self.base_url);

        // Repetition penalty is part of the reader decoding discipline and
        // applies to every request.
        let mut options = serde_json::Map::new();
        options.insert(
            "repeat_penalty".to_string(),
            json!(READER_REPETITION_PENALTY),
        );
        if let Some(temp) = temperature {
            options.insert("temperature".to_string(), json!(temp));
        }
        if let Some(max_tok) = max_tokens {
            options.insert("num_predict".to_string(), json!(max_tok));
        }

        let mut payload = serde_json::Map::new();
        payload.insert("model".to_string(), json!(self.model));
        payload.insert("prompt".to_string(), json!(prompt));
        if let Some(sys) = system_prompt {
            payload.insert("system".to_string(), json!(sys));
        }
        payload.insert("stream".to_string(), json!(false));
        payload.insert("options".to_string(), JsonValue::Object(options));
        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PagemarkError::Llm(format!("Generate request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(PagemarkError::Llm(format!(
                "Generate failed: HTTP {}",
                resp.status()
            )));
        }

        let val: JsonValue = resp
            .json()
            .await
            .map_err(|e| PagemarkError::Llm(format!("Failed to parse response: {}", e)))?;

        let text = val
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .to_string();

        let tokens_used = val
            .get("eval_count")
            .and_then(|c| c.as_u64())
            .map(|c| c as u32);

        Ok(LlmResponse {
            text,
            model: Some(self.model.clone()),
            tokens_used,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        self.probe_server().await.map(|_| true).or(Ok(false))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
