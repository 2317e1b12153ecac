//! Streaming support for the OpenAI adapter.
//!
//! `async-openai` already decodes the SSE transport; this module narrows
//! its chunk stream down to plain text fragments.

use std::pin::Pin;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::CreateChatCompletionRequest;
use futures_util::{Stream, StreamExt};
use tandem_types::llm::ProviderError;

use super::map_openai_error;

/// Open a chat completion stream and yield the delta text of each chunk.
///
/// Empty deltas (role-only preambles, the final usage chunk) are dropped.
pub(crate) fn create_chat_stream(
    client: Client<OpenAIConfig>,
    request: CreateChatCompletionRequest,
) -> Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send + 'static>> {
    Box::pin(async_stream::try_stream! {
        let mut upstream = client
            .chat()
            .create_stream(request)
            .await
            .map_err(map_openai_error)?;

        while let Some(chunk) = upstream.next().await {
            let chunk = chunk.map_err(map_openai_error)?;

            if let Some(usage) = &chunk.usage {
                tracing::debug!(
                    input_tokens = u64::from(usage.prompt_tokens),
                    output_tokens = u64::from(usage.completion_tokens),
                    "Chat stream usage reported"
                );
            }

            if let Some(choice) = chunk.choices.first() {
                if let Some(text) = &choice.delta.content {
                    if !text.is_empty() {
                        yield text.clone();
                    }
                }
            }
        }
    })
}
