pub mod history;

use crate::providers::{Message, Role};
use tracing::warn;

/// Ordered, append-only record of the exchanged messages.
///
/// The system instruction is configuration, not conversation: it is added at
/// request-build time and never stored here.
#[derive(Debug, Default, Clone)]
pub struct ConversationStore {
    transcript: Vec<Message>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        if message.role == Role::System {
            warn!("dropping system message; the system instruction is not part of the transcript");
            return;
        }
        self.transcript.push(message);
    }

    pub fn snapshot(&self) -> &[Message] {
        &self.transcript
    }

    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    /// Swap in a previously saved conversation.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.reset();
        for message in messages {
            self.append(message);
        }
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }
}
