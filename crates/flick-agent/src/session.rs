//! Chat session controller
//!
//! A [`ChatSession`] drives one streaming exchange at a time: it opens the
//! request through its [`Transport`], decodes the body, forwards deltas to a
//! [`SessionObserver`] and resolves exactly once with the accumulated answer
//! or the reason the exchange ended early.

use flick_ai::{ClientConfig, EventStream, Message, StreamEvent, decode_stream};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::{
    conversation::ConversationContext,
    error::{Error, Outcome, Result},
    events::{SessionObserver, StatusKind},
    handle::SessionHandle,
    transport::Transport,
};

/// Placed between a preset prompt and the user's text
pub const PRESET_SEPARATOR: &str = "\n\n用户问题：";

/// Build the outgoing user content, prefixing the preset prompt when one is
/// active.
pub fn compose_message(message: &str, preset_prompt: Option<&str>) -> String {
    match preset_prompt.filter(|p| !p.is_empty()) {
        Some(preset) => format!("{}{}{}", preset, PRESET_SEPARATOR, message),
        None => message.to_string(),
    }
}

/// The live streaming connection of an in-flight exchange.
///
/// Owns the decoded body; dropping it closes the connection.
pub struct RequestHandle {
    events: EventStream,
    cancel: CancellationToken,
}

impl RequestHandle {
    fn new(events: EventStream, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Next decoded event, `Ok(None)` once the body ends.
    ///
    /// Cancellation wins over a ready event.
    pub async fn next_event(&mut self) -> Result<Option<StreamEvent>> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            event = self.events.next() => match event {
                Some(Ok(event)) => Ok(Some(event)),
                Some(Err(e)) => Err(e.into()),
                None => Ok(None),
            },
        }
    }

    fn release(self) {
        tracing::debug!(
            "Releasing request (cancelled: {})",
            self.cancel.is_cancelled()
        );
    }
}

/// Owns the transport, the rolling conversation and at most one live
/// request.
pub struct ChatSession {
    transport: Arc<dyn Transport>,
    context: ConversationContext,
    handle: SessionHandle,
    active: Option<RequestHandle>,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_context(transport, ConversationContext::new())
    }

    pub fn with_context(transport: Arc<dyn Transport>, context: ConversationContext) -> Self {
        Self {
            transport,
            context,
            handle: SessionHandle::new(),
            active: None,
        }
    }

    /// Handle for cancelling from another task while `send` is pending
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Forget the conversation ("new chat")
    pub fn reset(&mut self) {
        self.context.reset();
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Cancel the in-flight request, if any
    pub fn cancel(&self) -> bool {
        self.handle.cancel()
    }

    /// Send a message using the session's own conversation as history.
    ///
    /// The user message is appended before the request and rolled back if
    /// the exchange does not succeed; on success the answer is appended.
    /// Both appends keep the context within capacity.
    pub async fn send(
        &mut self,
        config: &ClientConfig,
        message: &str,
        preset_prompt: Option<&str>,
        observer: &mut dyn SessionObserver,
    ) -> Outcome {
        if !config.has_api_key() {
            tracing::warn!("No API key configured, not sending");
            return Err(flick_ai::Error::MissingApiKey.into());
        }

        self.context
            .append(Message::user(compose_message(message, preset_prompt)));
        let messages = self.context.messages().to_vec();

        let outcome = self.exchange(config, &messages, observer).await;
        match &outcome {
            Ok(response) => {
                self.context.append(Message::assistant(response.clone()));
            }
            Err(_) => {
                self.context.rollback();
            }
        }
        outcome
    }

    /// Send a message with caller-supplied history; the session's own
    /// conversation is left untouched.
    pub async fn send_with_history(
        &mut self,
        config: &ClientConfig,
        message: &str,
        preset_prompt: Option<&str>,
        history: &[Message],
        observer: &mut dyn SessionObserver,
    ) -> Outcome {
        let mut messages = history.to_vec();
        messages.push(Message::user(compose_message(message, preset_prompt)));
        self.exchange(config, &messages, observer).await
    }

    /// Run one streaming exchange over `messages`.
    pub async fn exchange(
        &mut self,
        config: &ClientConfig,
        messages: &[Message],
        observer: &mut dyn SessionObserver,
    ) -> Outcome {
        if !config.has_api_key() {
            return Err(flick_ai::Error::MissingApiKey.into());
        }

        tracing::info!(
            "Starting exchange with {} ({} messages)",
            config.model_name,
            messages.len()
        );
        let cancel = self.handle.begin();
        let outcome = self.stream_response(config, messages, observer, cancel).await;

        if let Some(request) = self.active.take() {
            request.release();
        }
        self.handle.finish();

        match &outcome {
            Ok(response) => tracing::info!("Exchange complete ({} bytes)", response.len()),
            Err(Error::Cancelled) => tracing::info!("Exchange cancelled"),
            Err(e) => tracing::warn!("Exchange failed [{}]: {}", e.kind(), e),
        }
        outcome
    }

    async fn stream_response(
        &mut self,
        config: &ClientConfig,
        messages: &[Message],
        observer: &mut dyn SessionObserver,
        cancel: CancellationToken,
    ) -> Outcome {
        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            opened = self.transport.open(config, messages) => opened?,
        };
        let request = self
            .active
            .insert(RequestHandle::new(decode_stream(bytes), cancel));

        let mut response = String::new();
        let mut reasoning = false;

        // First terminal signal wins; nothing after it is read
        loop {
            match request.next_event().await? {
                Some(StreamEvent::ReasoningDelta(text)) => {
                    reasoning = true;
                    observer.on_status(StatusKind::Reasoning, Some(&text));
                }
                Some(StreamEvent::ContentDelta(text)) => {
                    if reasoning {
                        reasoning = false;
                        observer.on_status(StatusKind::Generating, None);
                    }
                    response.push_str(&text);
                    observer.on_content(&text);
                }
                Some(StreamEvent::ParseError(_)) => {}
                Some(StreamEvent::Done) | None => return Ok(response),
            }
        }
    }
}
