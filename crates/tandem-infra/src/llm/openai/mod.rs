//! OpenAI chat-completions adapter backed by `async-openai`.

pub mod streaming;

use std::pin::Pin;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatCompletionStreamOptions,
    CreateChatCompletionRequest, FinishReason,
};
use futures_util::Stream;
use secrecy::{ExposeSecret, SecretString};
use tandem_core::llm::adapter::ProviderAdapter;
use tandem_observe::genai_attrs::{self, chat_span};
use tandem_types::chat::{ChatMessage, Role};
use tandem_types::llm::ProviderError;
use tracing::Instrument;

/// Sampling temperature sent with every request.
const TEMPERATURE: f64 = 0.7;

/// Adapter for OpenAI-style chat completion APIs.
///
/// Note: deliberately does NOT derive `Debug`; the inner client carries
/// the API key.
pub struct OpenAiAdapter {
    client: Client<OpenAIConfig>,
}

impl OpenAiAdapter {
    pub fn new(api_key: SecretString, base_url: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        if let Some(base_url) = base_url {
            config = config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(config),
        }
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn generate(
        &self,
        model_id: &str,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send {
        let request = build_request(model_id, history, system_instruction);
        let client = self.client.clone();

        let span = chat_span(genai_attrs::PROVIDER_OPENAI, model_id);
        span.record(genai_attrs::GEN_AI_REQUEST_TEMPERATURE, TEMPERATURE);

        async move {
            let response = client
                .chat()
                .create(request)
                .await
                .map_err(map_openai_error)?;

            let current = tracing::Span::current();
            if let Some(usage) = &response.usage {
                current.record(
                    genai_attrs::GEN_AI_USAGE_INPUT_TOKENS,
                    u64::from(usage.prompt_tokens),
                );
                current.record(
                    genai_attrs::GEN_AI_USAGE_OUTPUT_TOKENS,
                    u64::from(usage.completion_tokens),
                );
            }

            let choice = response.choices.into_iter().next().ok_or_else(|| {
                ProviderError::Deserialization("response contained no choices".to_string())
            })?;
            if let Some(reason) = choice.finish_reason {
                current.record(
                    genai_attrs::GEN_AI_RESPONSE_FINISH_REASONS,
                    finish_reason_label(reason),
                );
            }

            Ok(choice.message.content.unwrap_or_default())
        }
        .instrument(span)
    }

    fn generate_stream(
        &self,
        model_id: &str,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send + 'static>> {
        let mut request = build_request(model_id, history, system_instruction);
        request.stream = Some(true);
        request.stream_options = Some(ChatCompletionStreamOptions {
            include_usage: Some(true),
            include_obfuscation: None,
        });

        streaming::create_chat_stream(self.client.clone(), request)
    }
}

// ---------------------------------------------------------------------------
// Request conversion
// ---------------------------------------------------------------------------

/// Build a chat completion request from provider-agnostic history.
///
/// The system instruction, when present, is prepended as the first
/// message; `assistant` turns keep their role name on this API.
fn build_request(
    model_id: &str,
    history: &[ChatMessage],
    system_instruction: &str,
) -> CreateChatCompletionRequest {
    let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(history.len() + 1);

    if !system_instruction.is_empty() {
        messages.push(ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(
                    system_instruction.to_string(),
                ),
                name: None,
            },
        ));
    }

    for message in history {
        match message.role {
            Role::User => messages.push(ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(
                        message.content.clone(),
                    ),
                    name: None,
                },
            )),
            Role::Assistant =>
            {
                #[allow(deprecated)]
                messages.push(ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            message.content.clone(),
                        )),
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls: None,
                        function_call: None,
                    },
                ))
            }
        }
    }

    CreateChatCompletionRequest {
        model: model_id.to_string(),
        messages,
        temperature: Some(TEMPERATURE as f32),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

pub(crate) fn map_openai_error(error: OpenAIError) -> ProviderError {
    match error {
        OpenAIError::ApiError(api_error) => {
            let message = api_error.message.clone();
            match api_error.code.as_deref() {
                Some("authentication_error") | Some("invalid_api_key") => {
                    ProviderError::AuthenticationFailed
                }
                Some("rate_limit_exceeded") | Some("rate_limit_error") => {
                    ProviderError::RateLimited {
                        retry_after_ms: None,
                    }
                }
                Some("context_length_exceeded") => ProviderError::InvalidRequest(message),
                Some("overloaded_error") => ProviderError::Overloaded(message),
                _ => {
                    if message.contains("Incorrect API key")
                        || message.contains("Invalid API key")
                    {
                        ProviderError::AuthenticationFailed
                    } else {
                        ProviderError::Provider { message }
                    }
                }
            }
        }
        OpenAIError::Reqwest(e) => match e.status().map(|status| status.as_u16()) {
            Some(401) => ProviderError::AuthenticationFailed,
            Some(429) => ProviderError::RateLimited {
                retry_after_ms: None,
            },
            Some(503) => ProviderError::Overloaded(e.to_string()),
            _ => ProviderError::Provider {
                message: e.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => ProviderError::Deserialization(content),
        OpenAIError::StreamError(e) => ProviderError::Stream(e.to_string()),
        OpenAIError::InvalidArgument(message) => ProviderError::InvalidRequest(message),
        other => ProviderError::Provider {
            message: other.to_string(),
        },
    }
}

fn finish_reason_label(reason: FinishReason) -> &'static str {
    match reason {
        FinishReason::Stop => "stop",
        FinishReason::Length => "length",
        FinishReason::ToolCalls => "tool_calls",
        FinishReason::ContentFilter => "content_filter",
        FinishReason::FunctionCall => "function_call",
    }
}
