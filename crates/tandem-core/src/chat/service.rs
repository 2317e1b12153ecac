//! Conversation service: the ask / feedback loop over the orchestrator.

use futures_util::StreamExt;
use tandem_types::chat::{ChatMessage, Feedback, InteractionKind, TranscriptEntry};
use tandem_types::error::{ConversationError, SinkError};
use tracing::info;

use crate::chat::conversation::Conversation;
use crate::chat::sink::TranscriptSink;
use crate::llm::orchestrator::FailoverOrchestrator;

/// Canned follow-up prompt appended when the user asks for clarification.
pub const CLARIFICATION_PROMPT: &str =
    "I don't understand the previous explanation. Please break it down further.";

/// Drives the conversation loop: prompt in, orchestrated reply out, and a
/// transcript record after every completed interaction.
///
/// Replies are generated through the streaming path even for full-reply
/// callers, so the service always knows which provider actually produced
/// the text it persists.
pub struct ConversationService<S: TranscriptSink> {
    orchestrator: FailoverOrchestrator,
    sink: S,
    system_instruction: String,
}

impl<S: TranscriptSink> ConversationService<S> {
    pub fn new(
        orchestrator: FailoverOrchestrator,
        sink: S,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            sink,
            system_instruction: system_instruction.into(),
        }
    }

    pub fn orchestrator(&self) -> &FailoverOrchestrator {
        &self.orchestrator
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Ask a fresh question.
    ///
    /// Appends the user turn, generates the reply with failover, appends
    /// the assistant turn tagged with the producing provider, records the
    /// transcript, and returns the reply text. Provider exhaustion shows
    /// up as the in-band failure text, not as an error.
    pub async fn ask(
        &self,
        conversation: &mut Conversation,
        user_id: &str,
        prompt: &str,
    ) -> Result<String, ConversationError> {
        conversation.push(
            ChatMessage::user(prompt).with_interaction_kind(InteractionKind::InitialQuery),
        );
        let (reply, producer) = self.generate(conversation).await;
        info!(
            session = %conversation.session_id(),
            provider = %producer,
            chars = reply.len(),
            "Reply generated"
        );
        conversation.push(
            ChatMessage::assistant(reply.clone())
                .with_interaction_kind(InteractionKind::InitialQuery)
                .with_produced_by(producer.clone()),
        );
        self.record(
            conversation,
            user_id,
            producer,
            InteractionKind::InitialQuery,
            None,
        )
        .await?;
        Ok(reply)
    }

    /// Apply reader feedback to the latest reply.
    ///
    /// `Understood` records the signal and returns `None`.
    /// `NeedsClarification` records the request, appends the canned
    /// clarification prompt as a user turn, generates a fresh reply, and
    /// returns it.
    pub async fn feedback(
        &self,
        conversation: &mut Conversation,
        user_id: &str,
        feedback: Feedback,
    ) -> Result<Option<String>, ConversationError> {
        conversation.attach_feedback(feedback)?;
        let producer = conversation
            .last_assistant()
            .and_then(|turn| turn.produced_by.clone())
            .unwrap_or_else(|| self.orchestrator.preferred_label().to_string());

        match feedback {
            Feedback::Understood => {
                self.record(
                    conversation,
                    user_id,
                    producer,
                    InteractionKind::UnderstoodFeedback,
                    Some(feedback),
                )
                .await?;
                info!(session = %conversation.session_id(), "Reply confirmed understood");
                Ok(None)
            }
            Feedback::NeedsClarification => {
                self.record(
                    conversation,
                    user_id,
                    producer,
                    InteractionKind::ClarificationRequested,
                    Some(feedback),
                )
                .await?;
                conversation.push(
                    ChatMessage::user(CLARIFICATION_PROMPT)
                        .with_interaction_kind(InteractionKind::ClarificationRequested),
                );
                let (reply, producer) = self.generate(conversation).await;
                info!(
                    session = %conversation.session_id(),
                    provider = %producer,
                    "Clarification generated"
                );
                conversation.push(
                    ChatMessage::assistant(reply.clone())
                        .with_interaction_kind(InteractionKind::ClarificationResponse)
                        .with_produced_by(producer.clone()),
                );
                self.record(
                    conversation,
                    user_id,
                    producer,
                    InteractionKind::ClarificationResponse,
                    None,
                )
                .await?;
                Ok(Some(reply))
            }
        }
    }

    /// Stream-accumulate one reply, capturing the label of the provider
    /// that actually produced it.
    async fn generate(&self, conversation: &Conversation) -> (String, String) {
        let mut stream = self
            .orchestrator
            .get_response_stream(conversation.messages(), &self.system_instruction);
        let mut reply = String::new();
        let mut producer = self.orchestrator.preferred_label().to_string();
        while let Some(event) = stream.next().await {
            reply.push_str(&event.text);
            producer = event.provider;
        }
        (reply, producer)
    }

    async fn record(
        &self,
        conversation: &Conversation,
        user_id: &str,
        model_label: String,
        interaction_kind: InteractionKind,
        feedback: Option<Feedback>,
    ) -> Result<(), SinkError> {
        self.sink
            .record(&TranscriptEntry {
                user_id: user_id.to_string(),
                session_id: conversation.session_id().to_string(),
                model_label,
                interaction_kind,
                feedback,
                messages: conversation.messages().to_vec(),
            })
            .await
    }
}
