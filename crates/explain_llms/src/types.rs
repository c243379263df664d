//! Client configuration and wire types for the chat-completions API.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";
/// Environment variable overriding the endpoint base URL
pub const ENDPOINT_ENV: &str = "DEEPSEEK_ENDPOINT";
/// Environment variable overriding the model
pub const MODEL_ENV: &str = "DEEPSEEK_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-reasoner";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 1200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// How the structured-output schema is declared in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaStyle {
    /// Legacy top-level `functions` array
    #[default]
    Functions,
    /// `tools` array with a forced `tool_choice`
    Tools,
}

impl SchemaStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaStyle::Functions => "functions",
            SchemaStyle::Tools => "tools",
        }
    }
}

impl std::fmt::Display for SchemaStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Model parameters carried by every analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub schema_style: SchemaStyle,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            schema_style: SchemaStyle::default(),
        }
    }
}

/// Configuration for the chat-completions client.
///
/// Built once at startup and handed to the transport; nothing downstream
/// reads the environment.
#[derive(Clone)]
pub struct ChatConfig {
    /// Bearer token
    pub api_key: String,
    /// Base URL without the `/chat/completions` suffix
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Model parameters
    pub params: RequestParams,
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("params", &self.params)
            .finish()
    }
}

impl ChatConfig {
    /// Create new config with API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            params: RequestParams::default(),
        }
    }

    /// Build from the process environment.
    ///
    /// Required: `DEEPSEEK_API_KEY`
    /// Optional: `DEEPSEEK_ENDPOINT` (default: https://api.deepseek.com)
    /// Optional: `DEEPSEEK_MODEL` (default: deepseek-reasoner)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ChatConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::MissingApiKey(API_KEY_ENV.to_string()))?;

        let mut config = Self::new(api_key);
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(endpoint);
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.with_model(model);
        }
        Ok(config)
    }

    /// Set base URL. A full `/chat/completions` endpoint URL is accepted.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        let url = url.trim().trim_end_matches('/');
        let url = url.strip_suffix("/chat/completions").unwrap_or(url);
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.params.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.params.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.params.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_schema_style(mut self, style: SchemaStyle) -> Self {
        self.params.schema_style = style;
        self
    }

    /// Full chat-completions URL
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Function definition (structured-output schema)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Tool wrapper around a function definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub type_: String,
    pub function: FunctionDefinition,
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<serde_json::Value>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}
