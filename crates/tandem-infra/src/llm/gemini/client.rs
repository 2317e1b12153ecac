//! Gemini REST client and [`ProviderAdapter`] implementation.

use std::pin::Pin;
use std::time::Duration;

use futures_util::Stream;
use secrecy::{ExposeSecret, SecretString};
use tandem_core::llm::adapter::ProviderAdapter;
use tandem_observe::genai_attrs::{self, chat_span};
use tandem_types::chat::{ChatMessage, Role};
use tandem_types::llm::ProviderError;
use tracing::Instrument;

use super::streaming::create_gemini_stream;
use super::types::{
    GeminiContent, GeminiErrorBody, GeminiPart, GeminiRequest, GeminiResponse, GenerationConfig,
};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Sampling temperature sent with every request.
const TEMPERATURE: f64 = 0.7;

/// Adapter for the Gemini `generateContent` API family.
///
/// Note: deliberately does NOT derive `Debug` because the struct holds the
/// API key and must never land in log output wholesale.
pub struct GeminiAdapter {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (local proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, model_id: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, model_id, method)
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn generate(
        &self,
        model_id: &str,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send {
        let url = self.url(model_id, "generateContent");
        let body = to_gemini_request(history, system_instruction);
        let client = self.client.clone();
        let api_key = self.api_key.expose_secret().to_string();

        let span = chat_span(genai_attrs::PROVIDER_GEMINI, model_id);
        span.record(genai_attrs::GEN_AI_REQUEST_TEMPERATURE, TEMPERATURE);

        async move {
            let response = client
                .post(&url)
                .header("x-goog-api-key", &api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| ProviderError::Provider {
                    message: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                let error_body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<unreadable body>".to_string());
                tracing::warn!(status = %status, body = %error_body, "Gemini API error response");
                return Err(map_error_status(
                    status.as_u16(),
                    &extract_error_message(&error_body),
                ));
            }

            let parsed: GeminiResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Deserialization(e.to_string()))?;

            let current = tracing::Span::current();
            if let Some(usage) = &parsed.usage_metadata {
                if let Some(input) = usage.prompt_token_count {
                    current.record(genai_attrs::GEN_AI_USAGE_INPUT_TOKENS, input);
                }
                if let Some(output) = usage.candidates_token_count {
                    current.record(genai_attrs::GEN_AI_USAGE_OUTPUT_TOKENS, output);
                }
            }
            if let Some(reason) = parsed
                .candidates
                .first()
                .and_then(|candidate| candidate.finish_reason.as_deref())
            {
                current.record(genai_attrs::GEN_AI_RESPONSE_FINISH_REASONS, reason);
            }

            extract_text(&parsed)
        }
        .instrument(span)
    }

    fn generate_stream(
        &self,
        model_id: &str,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send + 'static>> {
        let url = self.url(model_id, "streamGenerateContent?alt=sse");
        let body = to_gemini_request(history, system_instruction);
        create_gemini_stream(&self.client, &url, body, &self.api_key)
    }
}

// ---------------------------------------------------------------------------
// Request conversion
// ---------------------------------------------------------------------------

/// Convert provider-agnostic history into Gemini request contents.
///
/// Role mapping: `user` stays `user`, `assistant` becomes `model`. The
/// system instruction rides in the dedicated `systemInstruction` slot and
/// is omitted entirely when empty.
fn to_gemini_request(history: &[ChatMessage], system_instruction: &str) -> GeminiRequest {
    let contents = history
        .iter()
        .map(|message| GeminiContent {
            role: Some(
                match message.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                }
                .to_string(),
            ),
            parts: vec![GeminiPart {
                text: message.content.clone(),
            }],
        })
        .collect();

    let system_instruction = if system_instruction.is_empty() {
        None
    } else {
        Some(GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: system_instruction.to_string(),
            }],
        })
    };

    GeminiRequest {
        contents,
        system_instruction,
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// Pull the error message out of a Gemini error envelope, falling back to
/// the raw body when it is not the expected JSON shape.
pub(crate) fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<GeminiErrorBody>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.to_string(),
    }
}

pub(crate) fn map_error_status(status: u16, detail: &str) -> ProviderError {
    match status {
        401 | 403 => ProviderError::AuthenticationFailed,
        429 => ProviderError::RateLimited {
            retry_after_ms: None,
        },
        503 => ProviderError::Overloaded(detail.to_string()),
        _ => ProviderError::Provider {
            message: format!("HTTP {status}: {detail}"),
        },
    }
}

/// Join the text parts of the first candidate.
fn extract_text(response: &GeminiResponse) -> Result<String, ProviderError> {
    let candidate = response.candidates.first().ok_or_else(|| {
        ProviderError::Deserialization("response contained no candidates".to_string())
    })?;

    Ok(candidate
        .content
        .as_ref()
        .map(|content| {
            content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect::<String>()
        })
        .unwrap_or_default())
}
