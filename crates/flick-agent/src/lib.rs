//! flick-agent: chat session runtime
//!
//! Drives one streaming exchange at a time against a chat-completions
//! transport, forwards content and status deltas to an observer, supports
//! mid-flight cancellation, and keeps a bounded rolling conversation.

pub mod conversation;
pub mod error;
pub mod events;
pub mod handle;
pub mod session;
pub mod transport;

pub use conversation::{ConversationContext, MAX_CONTEXT_MESSAGES};
pub use error::{Error, Outcome, Result};
pub use events::{SessionEvent, SessionObserver, StatusKind};
pub use handle::SessionHandle;
pub use session::{ChatSession, PRESET_SEPARATOR, RequestHandle, compose_message};
pub use transport::{ProviderTransport, Transport};
