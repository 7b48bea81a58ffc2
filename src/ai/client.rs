//! Ollama HTTP client
//!
//! Thin async client for the local completion endpoint. Each call is a
//! synchronous request/response from the caller's perspective: bounded
//! timeout, a few retries on transient failure, no cancellation path.

use std::time::Duration;

use url::Url;

use crate::config::AiConfig;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Knobs for a single completion call.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub system: String,
    pub template: String,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 150,
            system: String::new(),
            template: String::new(),
        }
    }
}

/// HTTP client for the Ollama `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: Url,
    model: String,
    retry: RetryPolicy,
}

impl OllamaClient {
    /// Create a client from the AI section of the config.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        if !config.enabled {
            return Err(Error::Ai("AI service is disabled".to_string()));
        }

        let base_url = Url::parse(&config.url)
            .map_err(|e| Error::Ai(format!("invalid AI service URL '{}': {e}", config.url)))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Ai(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            model: config.model.clone(),
            retry: RetryPolicy::default(),
        })
    }

    /// Generate a completion for the prompt.
    ///
    /// Fails with an AI error on non-success status, malformed JSON, or an
    /// `error` field in the response body. Transport failures and server
    /// errors are retried per the policy.
    pub async fn generate(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        let url = self
            .base_url
            .join("/api/generate")
            .map_err(|e| Error::Ai(format!("invalid endpoint path: {e}")))?;

        let payload = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "system": options.system,
            "template": options.template,
            "stream": false,
            "raw": false,
            "options": {
                "temperature": options.temperature,
                "num_predict": options.max_tokens,
                "top_k": 40,
                "top_p": 0.9,
                "stop": [],
            },
        });

        tracing::debug!(
            model = %self.model,
            temperature = options.temperature,
            max_tokens = options.max_tokens,
            "sending completion request"
        );

        let mut attempt = 0;
        loop {
            match self.request_completion(&url, &payload).await {
                Ok(text) => return Ok(text),
                Err((error, retryable)) => {
                    attempt += 1;
                    if !retryable || attempt >= self.retry.max_attempts {
                        return Err(error);
                    }
                    let delay = self.retry.delay(attempt - 1);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "completion request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One attempt. The boolean marks whether the failure is retryable.
    async fn request_completion(
        &self,
        url: &Url,
        payload: &serde_json::Value,
    ) -> std::result::Result<String, (Error, bool)> {
        let response = self
            .client
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| (Error::Ai(format!("failed to generate completion: {e}")), true))?;

        let status = response.status();
        if status.is_server_error() {
            return Err((
                Error::Ai(format!("AI request failed with status: {status}")),
                true,
            ));
        }
        if !status.is_success() {
            return Err((
                Error::Ai(format!("AI request failed with status: {status}")),
                false,
            ));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| (Error::Ai(format!("invalid response from Ollama: {e}")), false))?;

        if let Some(message) = data.get("error").and_then(|v| v.as_str()) {
            return Err((Error::Ai(format!("Ollama error: {message}")), false));
        }

        match data.get("response").and_then(|v| v.as_str()) {
            Some(text) => {
                tracing::debug!(response_length = text.len(), "completion success");
                Ok(text.to_string())
            }
            None => Err((
                Error::Ai("invalid response format from Ollama".to_string()),
                false,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AiConfig {
        AiConfig {
            enabled: true,
            url: "http://localhost:11434".to_string(),
            model: "llama3.2:latest".to_string(),
        }
    }

    #[test]
    fn test_disabled_service_is_an_error() {
        let config = AiConfig {
            enabled: false,
            ..test_config()
        };
        let err = OllamaClient::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::Ai(_)));
        assert!(err.to_string().contains("disabled"));
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let config = AiConfig {
            url: "not a url".to_string(),
            ..test_config()
        };
        assert!(OllamaClient::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_keeps_model() {
        let client = OllamaClient::from_config(&test_config()).unwrap();
        assert_eq!(client.model, "llama3.2:latest");
    }
}
