//! Core types for chat-completion requests

use serde::{Deserialize, Serialize};

/// Default sampling temperature sent with every request
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Path appended to the configured base URL
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single conversation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Connection settings for one request.
///
/// Built fresh by the caller for every exchange and never mutated by the
/// client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub model_name: String,
    pub temperature: f32,
}

impl ClientConfig {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model_name: model_name.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Whether a non-blank API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Full URL of the streaming chat-completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }

    /// URL of the model listing endpoint
    pub fn models_url(&self) -> String {
        format!("{}/v1/models", self.base_url.trim_end_matches('/'))
    }
}

/// Body of a streaming chat-completions request
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
    pub temperature: f32,
}

impl<'a> ChatRequest<'a> {
    pub fn streaming(config: &'a ClientConfig, messages: &'a [Message]) -> Self {
        Self {
            model: &config.model_name,
            messages,
            stream: true,
            temperature: config.temperature,
        }
    }
}
