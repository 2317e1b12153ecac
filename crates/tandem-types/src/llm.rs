//! Provider-facing types: error taxonomy, stream events, provider kinds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;
use std::str::FromStr;

/// Failure of a single provider call.
///
/// Every variant is recoverable by the orchestrator: each one triggers
/// failover to the next provider in the plan. No variant escapes the
/// orchestrator's public operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("authentication failed: invalid or missing API key")]
    AuthenticationFailed,

    #[error("rate limited by provider")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to deserialize provider response: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("provider error: {message}")]
    Provider { message: String },
}

/// One unit of streamed output from the orchestrator.
///
/// Carries the fragment text and the label of the provider that actually
/// produced it, so a consumer can attribute every piece of a reply even
/// when failover switches providers mid-stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub text: String,
    pub provider: String,
}

impl StreamEvent {
    pub fn new(text: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
        }
    }
}

/// Which adapter implementation a configured provider uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(format!("invalid provider kind: '{other}'")),
        }
    }
}
