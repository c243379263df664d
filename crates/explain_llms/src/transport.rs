//! Transport: one POST per request, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{ChatConfig, ChatRequest, API_KEY_ENV};

/// Sends a chat request and returns the raw decoded response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable endpoint identifier for logs.
    fn endpoint(&self) -> String;

    async fn send(&self, request: &ChatRequest) -> Result<Value>;
}

/// reqwest-backed client for OpenAI-compatible `/chat/completions` endpoints.
pub struct ChatCompletionsClient {
    config: ChatConfig,
    client: Client,
}

impl ChatCompletionsClient {
    /// Create a new client. Fails without an API key.
    pub fn new(config: ChatConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey(API_KEY_ENV.to_string()));
        }
        if config.timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least one second".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Create client from environment
    pub fn from_env() -> Result<Self> {
        Self::new(ChatConfig::from_env()?)
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for ChatCompletionsClient {
    fn endpoint(&self) -> String {
        self.config.completions_url()
    }

    async fn send(&self, request: &ChatRequest) -> Result<Value> {
        let url = self.config.completions_url();
        tracing::debug!(
            url = %url,
            model = %request.model,
            max_tokens = request.max_tokens,
            "sending chat request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
