//! Session event types

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Model phase reported on the status channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Model is emitting reasoning text
    Reasoning,
    /// Model switched from reasoning to the answer
    Generating,
}

/// Events emitted while an exchange streams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Answer text delta
    Content { delta: String },
    /// Status change, with reasoning text when kind is `Reasoning`
    Status {
        kind: StatusKind,
        detail: Option<String>,
    },
}

/// Receives the two output channels of a session.
///
/// Called inline from the streaming loop, in stream order.
pub trait SessionObserver: Send {
    fn on_content(&mut self, delta: &str);

    fn on_status(&mut self, kind: StatusKind, detail: Option<&str>);
}

/// Forward events to another task, e.g. a UI loop
impl SessionObserver for mpsc::UnboundedSender<SessionEvent> {
    fn on_content(&mut self, delta: &str) {
        let _ = self.send(SessionEvent::Content {
            delta: delta.to_string(),
        });
    }

    fn on_status(&mut self, kind: StatusKind, detail: Option<&str>) {
        let _ = self.send(SessionEvent::Status {
            kind,
            detail: detail.map(str::to_string),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer_forwards_in_order() {
        let (mut tx, mut rx) = mpsc::unbounded_channel::<SessionEvent>();
        tx.on_status(StatusKind::Reasoning, Some("hmm"));
        tx.on_status(StatusKind::Generating, None);
        tx.on_content("hi");

        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Status {
                kind: StatusKind::Reasoning,
                detail: Some("hmm".into())
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Status {
                kind: StatusKind::Generating,
                detail: None
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Content { delta: "hi".into() }
        );
    }
}
