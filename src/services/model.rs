use crate::config::ModelSettings;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the text-generation API
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Chat-completions client for the external model API
///
/// One configured endpoint, fixed sampling parameters, bounded timeout.
/// Timeout expiry surfaces as a transport error and routes through the
/// same failure branch as any other upstream error.
pub struct ModelClient {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

impl ModelClient {
    /// Create a new model client from configuration
    pub fn new(settings: ModelSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: settings.endpoint,
            api_key: settings.api_key,
            model: settings.name,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            client,
        }
    }

    /// Whether an API key has been injected from the environment
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Send one completion request and return the raw reply text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ModelError> {
        let url = format!(
            "{}/chat/completions",
            self.endpoint.trim_end_matches('/')
        );

        tracing::debug!("Calling model API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": user },
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Model API error: {} - {}", status, body);
            return Err(ModelError::ApiError(format!("Model API error: {}", status)));
        }

        let payload: Value = response.json().await?;

        let content = payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                ModelError::InvalidResponse("Missing choices[0].message.content".into())
            })?;

        Ok(content.to_string())
    }
}
