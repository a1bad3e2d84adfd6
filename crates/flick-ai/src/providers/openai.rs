//! OpenAI-compatible Chat Completions API provider
//!
//! DeepSeek, SiliconFlow and most self-hosted gateways speak this protocol;
//! switching between them is a matter of base URL and model name.

use futures::StreamExt;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    stream::ByteStream,
    types::{ChatRequest, ClientConfig, Message},
};

/// HTTP client for the chat-completions endpoint
#[derive(Debug, Clone, Default)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a streaming completion and return the raw response body.
    ///
    /// Resolves once response headers arrive. Non-2xx statuses become
    /// [`Error::Http`]; a JSON body where a stream was requested becomes
    /// [`Error::MalformedResponse`]. Dropping the returned stream closes the
    /// connection.
    pub async fn open_stream(
        &self,
        config: &ClientConfig,
        messages: &[Message],
    ) -> Result<ByteStream> {
        if !config.has_api_key() {
            return Err(Error::MissingApiKey);
        }

        let url = config.chat_completions_url();
        tracing::debug!(
            "POST {} (model={}, messages={})",
            url,
            config.model_name,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", config.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&ChatRequest::streaming(config, messages))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http(status.as_u16(), error_detail(&body)));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));
        if is_json {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::MalformedResponse(error_detail(&body)));
        }

        Ok(Box::pin(
            response.bytes_stream().map(|chunk| chunk.map_err(Error::from)),
        ))
    }

    /// List the models the endpoint serves
    pub async fn list_models(&self, config: &ClientConfig) -> Result<Vec<ModelInfo>> {
        if !config.has_api_key() {
            return Err(Error::MissingApiKey);
        }

        let response = self
            .client
            .get(config.models_url())
            .header(AUTHORIZATION, format!("Bearer {}", config.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::http(status.as_u16(), error_detail(&text)));
        }

        let text = response.text().await?;
        let list: ModelList = serde_json::from_str(&text)
            .map_err(|e| Error::MalformedResponse(format!("model list: {}", e)))?;
        Ok(list.data)
    }
}

/// Pull the human-readable message out of an `{"error": {...}}` envelope,
/// falling back to the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Model info returned from the `/v1/models` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub owned_by: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_from_envelope() {
        let body = r#"{"error":{"message":"Authentication Fails","type":"authentication_error"}}"#;
        assert_eq!(error_detail(body), "Authentication Fails");
    }

    #[test]
    fn test_error_detail_raw_fallback() {
        assert_eq!(error_detail("  Bad Gateway \n"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let client = ChatCompletionsClient::new();
        // Unroutable URL: would fail differently if a request were attempted
        let config = ClientConfig::new("", "http://127.0.0.1:9", "m");
        let err = match client.open_stream(&config, &[Message::user("hi")]).await {
            Err(e) => e,
            Ok(_) => panic!("expected missing key error"),
        };
        assert_eq!(err.kind(), "missing_api_key");
    }
}
