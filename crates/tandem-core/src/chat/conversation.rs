//! Conversation state: the append-only turn list.

use chrono::{DateTime, Utc};
use tandem_types::chat::{ChatMessage, Feedback, Role};
use tandem_types::error::ConversationError;
use uuid::Uuid;

/// An in-progress conversation: session identity plus the ordered list of
/// turns.
///
/// Turns are append-only and strictly chronological. The single permitted
/// mutation of an existing turn is [`Conversation::attach_feedback`],
/// which touches only a trailing assistant turn.
#[derive(Debug, Clone)]
pub struct Conversation {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::now_v7(),
            started_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a turn after the current last one.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Attach feedback to the most recent turn, which must be an assistant
    /// turn.
    pub fn attach_feedback(&mut self, feedback: Feedback) -> Result<(), ConversationError> {
        match self.messages.last_mut() {
            Some(turn) if turn.role == Role::Assistant => {
                turn.feedback = Some(feedback);
                Ok(())
            }
            _ => Err(ConversationError::NoAssistantTurn),
        }
    }

    /// The most recent assistant turn, if any.
    pub fn last_assistant(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::Assistant)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
