//! OpenTelemetry GenAI Semantic Convention attributes for LLM calls.
//!
//! The constants follow the OTel GenAI Semantic Conventions so provider
//! calls are instrumented uniformly regardless of backend. Field names in
//! `tracing` macros must be literals, so [`chat_span`] declares the fields
//! and the constants are used with [`tracing::Span::record`] afterwards.

/// The name of the operation being performed (e.g., "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "gemini", "openai").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// The model ID requested (e.g., "gemini-3-pro-preview").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The sampling temperature for the request.
pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

/// The number of input tokens consumed.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// The number of output tokens generated.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// The finish reasons for the response (e.g., "stop", "max_tokens").
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

// --- Operation name values ---

/// Standard chat completion operation.
pub const OP_CHAT: &str = "chat";

// --- Provider name values ---

/// Gemini provider identifier.
pub const PROVIDER_GEMINI: &str = "gemini";

/// OpenAI provider identifier.
pub const PROVIDER_OPENAI: &str = "openai";

/// Build the span wrapping one provider chat call.
///
/// Usage and finish-reason fields are declared empty; adapters record them
/// once the provider reports values.
pub fn chat_span(provider: &str, model: &str) -> tracing::Span {
    tracing::info_span!(
        "chat",
        "gen_ai.operation.name" = OP_CHAT,
        "gen_ai.provider.name" = provider,
        "gen_ai.request.model" = model,
        "gen_ai.request.temperature" = tracing::field::Empty,
        "gen_ai.usage.input_tokens" = tracing::field::Empty,
        "gen_ai.usage.output_tokens" = tracing::field::Empty,
        "gen_ai.response.finish_reasons" = tracing::field::Empty,
    )
}
