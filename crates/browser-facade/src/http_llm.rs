//! Documented extension point for a real, HTTP-backed `LanguageModel`.
//!
//! The core never ships a concrete model backend (spec §1 keeps the
//! language-model implementation external); this module carries the
//! `reqwest` plumbing a real implementation would need, grounded in the
//! teacher's own `reqwest`-based HTTP client usage in `agent-core`. Behind
//! the `http-llm` feature so crates that only need the trait (and the
//! offline `MockLanguageModel`) don't pull in a TLS stack.

use crate::llm::{LanguageModel, LlmError};
use async_trait::async_trait;
use std::time::Duration;

/// Configuration for an OpenAI-style chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct HttpLlmConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Default for HttpLlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            model: String::new(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// `LanguageModel` over a chat-completions HTTP endpoint.
///
/// Construction never fails; an empty `endpoint` just means every call
/// returns `LlmError::NotConfigured` rather than attempting a request. Wiring
/// up a specific provider's request/response shape is left to whoever points
/// this at a real backend.
pub struct HttpLanguageModel {
    config: HttpLlmConfig,
    client: reqwest::Client,
}

impl HttpLanguageModel {
    pub fn new(config: HttpLlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    fn configured(&self) -> bool {
        !self.config.endpoint.is_empty()
    }
}

#[async_trait]
impl LanguageModel for HttpLanguageModel {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        if !self.configured() {
            return Err(LlmError::NotConfigured);
        }

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LlmError::AuthRequired(self.config.endpoint.clone()));
        }
        if !response.status().is_success() {
            return Err(LlmError::RequestFailed(format!("status {}", response.status())));
        }

        let value: serde_json::Value =
            response.json().await.map_err(|e| LlmError::RequestFailed(e.to_string()))?;
        value
            .pointer("/choices/0/message/content")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| LlmError::RequestFailed("response missing choices[0].message.content".into()))
    }

    async fn warmup(&self) -> Result<(), LlmError> {
        if !self.configured() {
            return Err(LlmError::NotConfigured);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_client_refuses_without_a_request() {
        let model = HttpLanguageModel::new(HttpLlmConfig::default());
        let err = model.generate("sys", "user").await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));
    }
}
