//! Chat turn, feedback, and transcript types for Tandem.
//!
//! These types model a conversation between a user and the orchestrated
//! assistant: individual turns, the reason each turn was produced, the
//! lightweight feedback signal, and the transcript record handed to the
//! persistence sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Author of a conversation turn.
///
/// Only user and assistant turns are stored. A provider-specific "system"
/// role is synthesized by each adapter from the system instruction and is
/// never part of the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// Why a transcript entry was recorded.
///
/// Maps to the interaction labels in the persisted store:
/// `INITIAL_QUERY`, `CLARIFICATION_REQUESTED`, `CLARIFICATION_RESPONSE`,
/// `UNDERSTOOD_FEEDBACK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionKind {
    /// A fresh user prompt and its reply.
    InitialQuery,
    /// The user flagged the last reply as unclear.
    ClarificationRequested,
    /// The follow-up reply produced after a clarification request.
    ClarificationResponse,
    /// The user confirmed the last reply was understood.
    UnderstoodFeedback,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionKind::InitialQuery => write!(f, "INITIAL_QUERY"),
            InteractionKind::ClarificationRequested => write!(f, "CLARIFICATION_REQUESTED"),
            InteractionKind::ClarificationResponse => write!(f, "CLARIFICATION_RESPONSE"),
            InteractionKind::UnderstoodFeedback => write!(f, "UNDERSTOOD_FEEDBACK"),
        }
    }
}

impl FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INITIAL_QUERY" => Ok(InteractionKind::InitialQuery),
            "CLARIFICATION_REQUESTED" => Ok(InteractionKind::ClarificationRequested),
            "CLARIFICATION_RESPONSE" => Ok(InteractionKind::ClarificationResponse),
            "UNDERSTOOD_FEEDBACK" => Ok(InteractionKind::UnderstoodFeedback),
            other => Err(format!("invalid interaction kind: '{other}'")),
        }
    }
}

/// Reader feedback on the most recent assistant turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Understood,
    NeedsClarification,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Understood => write!(f, "understood"),
            Feedback::NeedsClarification => write!(f, "needs_clarification"),
        }
    }
}

impl FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "understood" => Ok(Feedback::Understood),
            "needs_clarification" => Ok(Feedback::NeedsClarification),
            other => Err(format!("invalid feedback: '{other}'")),
        }
    }
}

/// One turn in a conversation.
///
/// Turns are append-only and strictly chronological. No turn is mutated
/// after a later one is appended, with a single exception: feedback may be
/// attached to the most recent assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Why this turn was produced (set on turns that trigger persistence).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_kind: Option<InteractionKind>,
    /// Label of the provider that generated an assistant turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produced_by: Option<String>,
    /// Feedback attached to an assistant turn after the fact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// A user-authored turn, timestamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            interaction_kind: None,
            produced_by: None,
            feedback: None,
            timestamp: Some(Utc::now()),
        }
    }

    /// An assistant turn, timestamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            interaction_kind: None,
            produced_by: None,
            feedback: None,
            timestamp: Some(Utc::now()),
        }
    }

    pub fn with_interaction_kind(mut self, kind: InteractionKind) -> Self {
        self.interaction_kind = Some(kind);
        self
    }

    pub fn with_produced_by(mut self, label: impl Into<String>) -> Self {
        self.produced_by = Some(label.into());
        self
    }
}

/// The transcript record handed to the persistence sink.
///
/// One entry captures the full message list at the moment an interaction
/// completes, keyed by `(user_id, session_id)`. Repeated records for the
/// same key replace the stored transcript rather than appending rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub user_id: String,
    pub session_id: String,
    /// Label of the provider that produced the latest assistant turn.
    pub model_label: String,
    pub interaction_kind: InteractionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    pub messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::User, Role::Assistant] {
            let s = role.to_string();
            let parsed: Role = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Role::Assistant);
    }

    #[test]
    fn test_interaction_kind_roundtrip() {
        for kind in [
            InteractionKind::InitialQuery,
            InteractionKind::ClarificationRequested,
            InteractionKind::ClarificationResponse,
            InteractionKind::UnderstoodFeedback,
        ] {
            let s = kind.to_string();
            let parsed: InteractionKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_interaction_kind_serde_wire_strings() {
        let json = serde_json::to_string(&InteractionKind::InitialQuery).unwrap();
        assert_eq!(json, "\"INITIAL_QUERY\"");
        let json = serde_json::to_string(&InteractionKind::ClarificationRequested).unwrap();
        assert_eq!(json, "\"CLARIFICATION_REQUESTED\"");
    }

    #[test]
    fn test_feedback_roundtrip() {
        for feedback in [Feedback::Understood, Feedback::NeedsClarification] {
            let s = feedback.to_string();
            let parsed: Feedback = s.parse().unwrap();
            assert_eq!(feedback, parsed);
        }
    }

    #[test]
    fn test_chat_message_constructors() {
        let msg = ChatMessage::user("hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "hello");
        assert!(msg.timestamp.is_some());
        assert!(msg.produced_by.is_none());

        let msg = ChatMessage::assistant("hi there")
            .with_interaction_kind(InteractionKind::InitialQuery)
            .with_produced_by("gemini-3-pro-preview");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.interaction_kind, Some(InteractionKind::InitialQuery));
        assert_eq!(msg.produced_by.as_deref(), Some("gemini-3-pro-preview"));
    }

    #[test]
    fn test_chat_message_serde_skips_empty_metadata() {
        let msg = ChatMessage {
            role: Role::User,
            content: "hello".to_string(),
            interaction_kind: None,
            produced_by: None,
            feedback: None,
            timestamp: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
        assert!(json.get("interaction_kind").is_none());
        assert!(json.get("produced_by").is_none());
        assert!(json.get("feedback").is_none());
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn test_chat_message_deserialize_without_metadata() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"reply"}"#).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "reply");
        assert!(msg.interaction_kind.is_none());
        assert!(msg.timestamp.is_none());
    }

    #[test]
    fn test_transcript_entry_serialize() {
        let entry = TranscriptEntry {
            user_id: "student42".to_string(),
            session_id: "0192d1f0-0000-7000-8000-000000000000".to_string(),
            model_label: "gemini-3-pro-preview".to_string(),
            interaction_kind: InteractionKind::InitialQuery,
            feedback: None,
            messages: vec![ChatMessage::user("hello")],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["interaction_kind"], "INITIAL_QUERY");
        assert_eq!(json["model_label"], "gemini-3-pro-preview");
        assert!(json.get("feedback").is_none());
    }
}
