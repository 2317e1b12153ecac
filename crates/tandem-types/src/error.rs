//! Error types shared across Tandem crates.
//!
//! Provider-call errors live in [`crate::llm::ProviderError`]; this module
//! holds the persistence and conversation error types.

use thiserror::Error;

/// Errors from the transcript persistence sink.
///
/// Implementations translate their backend's failures into these variants;
/// callers never see backend-specific error types.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from conversation-level operations.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// Feedback can only be attached when the latest turn is an assistant
    /// turn.
    #[error("no assistant turn to attach feedback to")]
    NoAssistantTurn,

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_display() {
        assert_eq!(
            SinkError::Connection.to_string(),
            "database connection error"
        );
        assert_eq!(
            SinkError::Query("no such table".to_string()).to_string(),
            "query error: no such table"
        );
        assert_eq!(
            SinkError::Serialization("bad json".to_string()).to_string(),
            "serialization error: bad json"
        );
    }

    #[test]
    fn test_conversation_error_display() {
        assert_eq!(
            ConversationError::NoAssistantTurn.to_string(),
            "no assistant turn to attach feedback to"
        );
    }

    #[test]
    fn test_conversation_error_from_sink_error() {
        let err: ConversationError = SinkError::Connection.into();
        assert_eq!(err.to_string(), "sink error: database connection error");
    }
}
