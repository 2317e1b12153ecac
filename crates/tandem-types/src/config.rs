//! Orchestrator configuration types.
//!
//! Deserialized from `tandem.toml` by the infra config loader. Every field
//! has a default reproducing the stock two-provider deployment, so an empty
//! or missing file yields a working configuration (API keys still come from
//! the environment at assembly time).

use serde::{Deserialize, Serialize};

use crate::llm::ProviderKind;

fn default_preferred() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_system_instruction() -> String {
    "You are a helpful Business Planning Assistant. Provide clear, professional, and actionable advice."
        .to_string()
}

fn default_providers() -> Vec<ProviderEntry> {
    vec![
        ProviderEntry {
            label: "gemini-3-pro-preview".to_string(),
            kind: ProviderKind::Gemini,
            model: "gemini-3-pro-preview".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: None,
        },
        ProviderEntry {
            label: "ChatGPT 5.2".to_string(),
            kind: ProviderKind::OpenAi,
            model: "gpt-5.2-thinking".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: None,
        },
    ]
}

/// One configured provider backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Human-facing label, used for failover ordering and logging.
    pub label: String,
    /// Which adapter implementation speaks to this backend.
    pub kind: ProviderKind,
    /// Model identifier passed on the wire.
    pub model: String,
    /// Name of the environment variable holding this provider's API key.
    pub api_key_env: String,
    /// Override for the provider's API base URL (tests, proxies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Label of the provider tried first; the rest follow in listed order.
    #[serde(default = "default_preferred")]
    pub preferred: String,
    /// System instruction injected into every generation request.
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderEntry>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            preferred: default_preferred(),
            system_instruction: default_system_instruction(),
            providers: default_providers(),
        }
    }
}
