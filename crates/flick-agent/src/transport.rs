//! Transport abstraction for opening streaming exchanges

use async_trait::async_trait;
use flick_ai::{ByteStream, ChatCompletionsClient, ClientConfig, Message, Result};

/// Opens the raw response body of a streaming chat request.
///
/// The session decodes the body itself; implementations only deal with
/// connection setup and status handling.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn open(&self, config: &ClientConfig, messages: &[Message]) -> Result<ByteStream>;
}

/// Transport backed by the HTTP chat-completions client
#[derive(Debug, Clone, Default)]
pub struct ProviderTransport {
    client: ChatCompletionsClient,
}

impl ProviderTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for ProviderTransport {
    async fn open(&self, config: &ClientConfig, messages: &[Message]) -> Result<ByteStream> {
        self.client.open_stream(config, messages).await
    }
}
