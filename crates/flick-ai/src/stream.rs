//! Streaming frame decoder
//!
//! Chat-completion providers answer a streaming request with a chunked body of
//! newline-delimited frames:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//! data: [DONE]
//! ```
//!
//! Transport chunks carry no alignment with those lines, so [`FrameDecoder`]
//! keeps the trailing partial line between chunks and only decodes complete
//! ones. [`decode_stream`] wraps it into a lazy event stream.

use async_stream::stream;
use bytes::Bytes;
use serde::Deserialize;
use std::pin::Pin;
use tokio_stream::{Stream, StreamExt};

use crate::error::Result;

/// Prefix that marks a frame line
pub const DATA_PREFIX: &str = "data: ";

/// Frame payload that terminates the stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Events decoded from the response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental answer text
    ContentDelta(String),
    /// Incremental reasoning text from thinking models
    ReasoningDelta(String),
    /// Termination sentinel received
    Done,
    /// A frame whose payload could not be parsed; skipped by consumers
    ParseError(String),
}

/// Raw response body chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Decoded events; an `Err` item is always the last one
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Incremental line decoder.
///
/// Buffers bytes rather than text so a UTF-8 sequence split between two
/// chunks is reassembled before it is interpreted.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    pending: Vec<u8>,
    done: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the events of every line it completes.
    ///
    /// Once `[DONE]` has been seen, further input is ignored.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.done {
            return events;
        }

        self.pending.extend_from_slice(chunk);

        let mut consumed = 0;
        while let Some(offset) = self.pending[consumed..].iter().position(|&b| b == b'\n') {
            let end = consumed + offset;
            let line = String::from_utf8_lossy(&self.pending[consumed..end]).into_owned();
            consumed = end + 1;

            if decode_line(&line, &mut events) {
                self.done = true;
                break;
            }
        }

        if self.done {
            self.pending.clear();
        } else {
            self.pending.drain(..consumed);
        }
        events
    }

    /// Whether the termination sentinel has been decoded
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Bytes of an incomplete trailing line still waiting for its newline
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Decode one complete line into `events`. Returns true on the termination
/// sentinel.
fn decode_line(line: &str, events: &mut Vec<StreamEvent>) -> bool {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return false;
    };
    let payload = payload.trim();

    if payload == DONE_SENTINEL {
        events.push(StreamEvent::Done);
        return true;
    }

    let chunk: StreamChunk = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::debug!("Skipping malformed frame: {}", e);
            events.push(StreamEvent::ParseError(e.to_string()));
            return false;
        }
    };

    // Only the first choice is ever rendered
    if let Some(choice) = chunk.choices.into_iter().next() {
        if let Some(reasoning) = choice.delta.reasoning_content.filter(|s| !s.is_empty()) {
            events.push(StreamEvent::ReasoningDelta(reasoning));
        }
        if let Some(content) = choice.delta.content.filter(|s| !s.is_empty()) {
            events.push(StreamEvent::ContentDelta(content));
        }
    }
    false
}

/// Turn a raw body into a lazy sequence of events.
///
/// The sequence ends after `Done`, when the body ends, or after yielding the
/// first transport error. An unterminated trailing line is dropped. Returning
/// early drops `bytes`, which releases the underlying connection.
pub fn decode_stream(mut bytes: ByteStream) -> EventStream {
    Box::pin(stream! {
        let mut decoder = FrameDecoder::new();

        while let Some(chunk) = bytes.next().await {
            match chunk {
                Ok(chunk) => {
                    for event in decoder.push(&chunk) {
                        yield Ok(event);
                    }
                    if decoder.is_done() {
                        return;
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }

        if decoder.pending_len() > 0 {
            tracing::debug!(
                "Stream ended with {} bytes of unterminated frame, discarding",
                decoder.pending_len()
            );
        }
    })
}

// Streaming response types

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    content: Option<String>,
    reasoning_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn decode_chunks<T: AsRef<[u8]>>(chunks: &[T]) -> Vec<StreamEvent> {
        let mut decoder = FrameDecoder::new();
        chunks.iter().flat_map(|c| decoder.push(c.as_ref())).collect()
    }

    fn content(s: &str) -> StreamEvent {
        StreamEvent::ContentDelta(s.to_string())
    }

    fn reasoning(s: &str) -> StreamEvent {
        StreamEvent::ReasoningDelta(s.to_string())
    }

    const SAMPLE: &str = concat!(
        ": keep-alive\n",
        "data: {\"choices\":[{\"delta\":{\"reasoning_content\":\"让我想想\"}}]}\n",
        "\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"你好\"}}]}\r\n",
        "data: {not json}\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\", world\"}}]}\n",
        "data: [DONE]\n",
    );

    #[test]
    fn test_frame_split_across_chunks() {
        let events = decode_chunks(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel",
            "lo\"}}]}\n",
            "data: [DONE]\n",
        ]);
        assert_eq!(events, vec![content("Hello"), StreamEvent::Done]);
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let events = decode_chunks(&[concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n",
        )]);
        assert_eq!(events, vec![content("a"), content("b")]);
    }

    #[test]
    fn test_chunk_boundary_invariance() {
        let whole = decode_chunks(&[SAMPLE.as_bytes()]);
        assert_eq!(whole.len(), 5);
        assert_eq!(whole[0], reasoning("让我想想"));
        assert_eq!(whole[1], content("你好"));
        assert!(matches!(whole[2], StreamEvent::ParseError(_)));
        assert_eq!(whole[3], content(", world"));
        assert_eq!(whole[4], StreamEvent::Done);

        let bytes = SAMPLE.as_bytes();
        for split in 0..=bytes.len() {
            let (a, b) = bytes.split_at(split);
            assert_eq!(decode_chunks(&[a, b]), whole, "split at byte {}", split);
        }

        let singles: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(decode_chunks(&singles), whole);

        let threes: Vec<&[u8]> = bytes.chunks(3).collect();
        assert_eq!(decode_chunks(&threes), whole);
    }

    #[test]
    fn test_malformed_frame_does_not_stop_stream() {
        let events = decode_chunks(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"one\"\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"two\"}}]}\n",
        ]);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], StreamEvent::ParseError(_)));
        assert_eq!(events[1], content("two"));
    }

    #[test]
    fn test_done_is_idempotent() {
        let mut decoder = FrameDecoder::new();
        let events = decoder.push(
            b"data: [DONE]\ndata: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n",
        );
        assert_eq!(events, vec![StreamEvent::Done]);
        assert!(decoder.is_done());
        assert!(decoder.push(b"data: [DONE]\n").is_empty());
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_non_frame_lines_ignored() {
        let events = decode_chunks(&[
            "event: message\n",
            "id: 7\n",
            "data:{\"choices\":[{\"delta\":{\"content\":\"no space\"}}]}\n",
            "\n",
        ]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_empty_and_missing_fields_emit_nothing() {
        let events = decode_chunks(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":null}}]}\n",
            "data: {\"choices\":[{\"finish_reason\":\"stop\"}]}\n",
            "data: {\"choices\":[]}\n",
        ]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_reasoning_precedes_content_in_same_frame() {
        let events = decode_chunks(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"answer\",\"reasoning_content\":\"why\"}}]}\n",
        ]);
        assert_eq!(events, vec![reasoning("why"), content("answer")]);
    }

    #[test]
    fn test_only_first_choice_read() {
        let events = decode_chunks(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"first\"}},{\"delta\":{\"content\":\"second\"}}]}\n",
        ]);
        assert_eq!(events, vec![content("first")]);
    }

    #[test]
    fn test_partial_line_is_held_back() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}").is_empty());
        assert!(decoder.pending_len() > 0);
        assert_eq!(decoder.push(b"\n"), vec![content("x")]);
        assert_eq!(decoder.pending_len(), 0);
    }

    fn byte_stream(items: Vec<Result<&'static str>>) -> ByteStream {
        Box::pin(futures::stream::iter(
            items
                .into_iter()
                .map(|item| item.map(|s| Bytes::from_static(s.as_bytes()))),
        ))
    }

    #[tokio::test]
    async fn test_decode_stream_stops_at_done() {
        let events: Vec<_> = decode_stream(byte_stream(vec![
            Ok("data: {\"choices\":[{\"delta\":{\"content\":\"Hel"),
            Ok("lo\"}}]}\ndata: [DONE]\n"),
            Ok("data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n"),
        ]))
        .collect()
        .await;

        let events: Vec<StreamEvent> = events.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(events, vec![content("Hello"), StreamEvent::Done]);
    }

    #[tokio::test]
    async fn test_decode_stream_natural_end_drops_fragment() {
        let events: Vec<_> = decode_stream(byte_stream(vec![
            Ok("data: {\"choices\":[{\"delta\":{\"content\":\"kept\"}}]}\n"),
            Ok("data: {\"choices\":[{\"delta\":{\"content\":\"lost\"}}]}"),
        ]))
        .collect()
        .await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap(), &content("kept"));
    }

    #[tokio::test]
    async fn test_decode_stream_error_is_last_item() {
        let mut events = decode_stream(byte_stream(vec![
            Ok("data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n"),
            Err(Error::Network("connection reset".into())),
            Ok("data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n"),
        ]));

        assert_eq!(events.next().await.unwrap().unwrap(), content("a"));
        let err = events.next().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), "network_error");
        assert!(events.next().await.is_none());
    }
}
