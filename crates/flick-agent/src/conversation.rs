//! Rolling conversation history sent with every request.

use flick_ai::Message;

/// Ten user/assistant round-trips
pub const MAX_CONTEXT_MESSAGES: usize = 20;

/// Bounded, ordered message history.
///
/// Never holds more than `capacity` messages: an `append` on a full context
/// evicts the oldest entry. [`rollback`](Self::rollback) undoes the most
/// recent append, putting back whatever it evicted.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    messages: Vec<Message>,
    capacity: usize,
    /// Entries pushed out by the most recent append
    evicted: Vec<Message>,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::with_capacity(MAX_CONTEXT_MESSAGES)
    }
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: Vec::with_capacity(capacity),
            capacity,
            evicted: Vec::new(),
        }
    }

    /// Add a message to the end, evicting the oldest when full
    pub fn append(&mut self, message: Message) {
        self.evicted.clear();
        if self.capacity == 0 {
            return;
        }
        self.messages.push(message);
        self.evicted = self.evict_overflow();
    }

    /// Drop the oldest messages until at most `capacity` remain, returning
    /// them oldest first
    pub fn evict_overflow(&mut self) -> Vec<Message> {
        if self.messages.len() <= self.capacity {
            return Vec::new();
        }
        let excess = self.messages.len() - self.capacity;
        tracing::debug!("Evicting {} oldest context messages", excess);
        self.messages.drain(..excess).collect()
    }

    /// Remove and return the most recently appended message, restoring what
    /// that append evicted
    pub fn rollback(&mut self) -> Option<Message> {
        let message = self.messages.pop()?;
        let evicted = std::mem::take(&mut self.evicted);
        self.messages.splice(0..0, evicted);
        Some(message)
    }

    /// Start a new conversation
    pub fn reset(&mut self) {
        self.messages.clear();
        self.evicted.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
