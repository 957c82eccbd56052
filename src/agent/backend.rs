use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::AppConfig;
use crate::error::ChainError;

/// Errors raised by an LLM backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Single prompt-in, text-out completion
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// Role description, sent as the system instruction
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }
}

/// Model provider used by the hosted agents
#[async_trait]
pub trait LlmBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &LlmRequest) -> Result<String, BackendError>;
}

/// Google Gemini `generateContent` REST API
pub struct GeminiBackend {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// `timeout` bounds each generateContent call, body included
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ChainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ChainError> {
        let api_key = config.require_api_key()?;
        Self::new(
            &config.gemini_base_url,
            &config.model,
            api_key,
            config.request_timeout(),
        )
    }

    fn payload(request: &LlmRequest) -> Value {
        let mut payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_tokens
            }
        });
        if let Some(system) = &request.system {
            payload["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        payload
    }

    fn extract_text(data: &Value) -> Result<String, BackendError> {
        let parts = data
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| BackendError::ParseError("No candidate content in response".into()))?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();
        Ok(text)
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<String, BackendError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::payload(request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                400 | 404 => BackendError::InvalidRequest(text),
                401 | 403 => BackendError::AuthenticationFailed(text),
                429 => BackendError::RateLimitExceeded,
                _ => BackendError::ProviderUnavailable(format!(
                    "Gemini API error ({status}): {text}"
                )),
            });
        }

        let data: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout
            } else {
                BackendError::ParseError(e.to_string())
            }
        })?;
        Self::extract_text(&data)
    }
}

fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::NetworkError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn backend(server: &MockServer) -> GeminiBackend {
        GeminiBackend::new(server.uri(), "gemini-2.0-flash", "test-key", Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_payload_includes_system_instruction() {
        let request = LlmRequest::new("Write a plan")
            .with_system("You are a strategist")
            .with_sampling(0.8, 8192);

        let payload = GeminiBackend::payload(&request);
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "Write a plan");
        assert_eq!(payload["systemInstruction"]["parts"][0]["text"], "You are a strategist");
        assert_eq!(payload["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn test_payload_without_system() {
        let payload = GeminiBackend::payload(&LlmRequest::new("hi"));
        assert!(payload.get("systemInstruction").is_none());
    }

    #[test]
    fn test_from_config_requires_key() {
        assert!(GeminiBackend::from_config(&AppConfig::default()).is_err());

        let config = AppConfig::default().with_api_key(Some("k".into()));
        assert!(GeminiBackend::from_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_complete_concatenates_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "Write a plan" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "# Plan\n" }, { "text": "Step 1" }] }
                }]
            })))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let text = backend.complete(&LlmRequest::new("Write a plan")).await.unwrap();
        assert_eq!(text, "# Plan\nStep 1");
    }

    #[tokio::test]
    async fn test_complete_maps_status_codes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let err = backend.complete(&LlmRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, BackendError::RateLimitExceeded));
    }

    #[tokio::test]
    async fn test_complete_rejects_missing_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let backend = backend(&server);
        let err = backend.complete(&LlmRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, BackendError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_configured_timeout_bounds_slow_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "candidates": [{ "content": { "parts": [{ "text": "late" }] } }]
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = AppConfig::default().with_api_key(Some("test-key".into()));
        config.gemini_base_url = server.uri();
        config.request_timeout_secs = 1;
        let backend = GeminiBackend::from_config(&config).unwrap();

        let started = std::time::Instant::now();
        let err = backend.complete(&LlmRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, BackendError::Timeout));
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
