//! LLM provider adapters.
//!
//! Each submodule implements [`tandem_core::llm::adapter::ProviderAdapter`]
//! for one provider family. [`create_adapter`] maps a configuration entry
//! to the matching implementation.

pub mod gemini;
pub mod openai;

use secrecy::SecretString;
use tandem_core::llm::box_adapter::BoxProviderAdapter;
use tandem_types::config::ProviderEntry;
use tandem_types::llm::ProviderKind;

use gemini::GeminiAdapter;
use openai::OpenAiAdapter;

/// Construct a boxed adapter for a configured provider.
///
/// The API key must already be resolved; configuration entries only name
/// the environment variable, they never carry the key itself.
pub fn create_adapter(entry: &ProviderEntry, api_key: SecretString) -> BoxProviderAdapter {
    match entry.kind {
        ProviderKind::Gemini => {
            let mut adapter = GeminiAdapter::new(api_key);
            if let Some(base_url) = &entry.base_url {
                adapter = adapter.with_base_url(base_url.clone());
            }
            BoxProviderAdapter::new(adapter)
        }
        ProviderKind::OpenAi => {
            BoxProviderAdapter::new(OpenAiAdapter::new(api_key, entry.base_url.as_deref()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: ProviderKind) -> ProviderEntry {
        ProviderEntry {
            label: "test-provider".to_string(),
            kind,
            model: "test-model".to_string(),
            api_key_env: "TEST_KEY".to_string(),
            base_url: None,
        }
    }

    #[test]
    fn test_create_gemini_adapter() {
        let key = SecretString::from("test-key".to_string());
        // Construction must not panic or perform any network I/O.
        let _adapter = create_adapter(&entry(ProviderKind::Gemini), key);
    }

    #[test]
    fn test_create_openai_adapter() {
        let key = SecretString::from("test-key".to_string());
        let _adapter = create_adapter(&entry(ProviderKind::OpenAi), key);
    }

    #[test]
    fn test_create_gemini_adapter_with_base_url() {
        let key = SecretString::from("test-key".to_string());
        let mut entry = entry(ProviderKind::Gemini);
        entry.base_url = Some("http://localhost:9090".to_string());
        let _adapter = create_adapter(&entry, key);
    }
}
