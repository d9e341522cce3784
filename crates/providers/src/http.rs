//! OpenAI-compatible inference provider.
//!
//! Works with any endpoint exposing `/chat/completions` — OpenAI,
//! OpenRouter, Ollama, vLLM, and the rest. Non-streaming only: the runtime
//! makes exactly one call per query and surfaces failures verbatim.

use async_trait::async_trait;
use polymath_core::InferenceProvider;
use polymath_core::error::InferenceError;
use serde::Deserialize;
use tracing::{debug, warn};

/// A minimal OpenAI-compatible chat-completions client.
///
/// The assembled context rides as the system message; the prompt is the
/// single user message.
pub struct HttpProvider {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl InferenceProvider for HttpProvider {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn infer(&self, prompt: &str, context: &str) -> Result<String, InferenceError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut messages = Vec::new();
        if !context.is_empty() {
            messages.push(serde_json::json!({"role": "system", "content": context}));
        }
        messages.push(serde_json::json!({"role": "user", "content": prompt}));

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });

        debug!(model = %self.model, "Sending inference request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(InferenceError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(InferenceError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Network(format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| InferenceError::ApiError {
                status_code: 200,
                message: "response contained no choices".into(),
            })
    }
}
