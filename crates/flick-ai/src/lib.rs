//! flick-ai: chat-completions provider layer
//!
//! Wire types for OpenAI-compatible chat completions, the streaming frame
//! decoder that turns a raw response body into [`StreamEvent`]s, and the HTTP
//! client that opens the stream.

pub mod error;
pub mod providers;
pub mod stream;
pub mod types;

pub use error::{Error, Result};
pub use providers::{ChatCompletionsClient, ModelInfo};
pub use stream::{ByteStream, EventStream, FrameDecoder, StreamEvent, decode_stream};
pub use types::*;
