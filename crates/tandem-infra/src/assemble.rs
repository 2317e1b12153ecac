//! Assembly of configuration and environment into runnable services.

use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;
use tandem_core::chat::service::ConversationService;
use tandem_core::llm::orchestrator::FailoverOrchestrator;
use tandem_core::llm::plan::ProviderSpec;
use tandem_types::config::OrchestratorConfig;
use tracing::info;

use crate::llm::create_adapter;
use crate::sqlite::pool::DatabasePool;
use crate::sqlite::transcript::SqliteTranscriptStore;

/// Build the failover orchestrator described by `config`.
///
/// API keys are resolved from each provider's named environment variable
/// here, at assembly time; a missing variable fails the build instead of
/// surfacing as a latent request-time error.
pub fn build_orchestrator(config: &OrchestratorConfig) -> anyhow::Result<FailoverOrchestrator> {
    let mut specs = Vec::with_capacity(config.providers.len());

    for entry in &config.providers {
        let raw_key = std::env::var(&entry.api_key_env).with_context(|| {
            format!(
                "missing API key environment variable '{}' for provider '{}'",
                entry.api_key_env, entry.label
            )
        })?;
        let adapter = create_adapter(entry, SecretString::from(raw_key));
        specs.push(ProviderSpec::new(
            entry.label.clone(),
            entry.model.clone(),
            Arc::new(adapter),
        ));
    }

    info!(
        providers = specs.len(),
        preferred = %config.preferred,
        "Building failover orchestrator"
    );
    Ok(FailoverOrchestrator::new(config.preferred.clone(), specs))
}

/// Build the full conversation service on SQLite persistence.
pub fn build_service(
    config: &OrchestratorConfig,
    pool: DatabasePool,
) -> anyhow::Result<ConversationService<SqliteTranscriptStore>> {
    let orchestrator = build_orchestrator(config)?;
    let sink = SqliteTranscriptStore::new(pool);

    Ok(ConversationService::new(
        orchestrator,
        sink,
        config.system_instruction.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_types::config::ProviderEntry;
    use tandem_types::llm::ProviderKind;

    fn config_with_env(labels_and_envs: &[(&str, &str)]) -> OrchestratorConfig {
        let providers = labels_and_envs
            .iter()
            .map(|(label, env)| ProviderEntry {
                label: label.to_string(),
                kind: ProviderKind::Gemini,
                model: format!("{label}-model"),
                api_key_env: env.to_string(),
                base_url: None,
            })
            .collect();

        OrchestratorConfig {
            preferred: labels_and_envs
                .first()
                .map(|(label, _)| label.to_string())
                .unwrap_or_default(),
            system_instruction: "Be helpful.".to_string(),
            providers,
        }
    }

    #[test]
    fn test_build_orchestrator_resolves_keys() {
        // Env var names are unique per test so parallel tests never race.
        unsafe {
            std::env::set_var("TANDEM_TEST_KEY_RESOLVE_A", "key-a");
            std::env::set_var("TANDEM_TEST_KEY_RESOLVE_B", "key-b");
        }
        let config = config_with_env(&[
            ("alpha", "TANDEM_TEST_KEY_RESOLVE_A"),
            ("beta", "TANDEM_TEST_KEY_RESOLVE_B"),
        ]);

        let orchestrator = build_orchestrator(&config).unwrap();

        assert_eq!(orchestrator.preferred_label(), "alpha");
        assert_eq!(orchestrator.plan().labels(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_build_orchestrator_missing_key_fails() {
        let config = config_with_env(&[("alpha", "TANDEM_TEST_KEY_NEVER_SET")]);

        let err = build_orchestrator(&config).unwrap_err();

        let rendered = format!("{err:#}");
        assert!(rendered.contains("TANDEM_TEST_KEY_NEVER_SET"));
        assert!(rendered.contains("alpha"));
    }

    #[test]
    fn test_build_orchestrator_with_no_providers() {
        let config = config_with_env(&[]);

        let orchestrator = build_orchestrator(&config).unwrap();

        assert!(orchestrator.plan().is_empty());
    }

    #[tokio::test]
    async fn test_build_service_wires_sqlite_sink() {
        unsafe {
            std::env::set_var("TANDEM_TEST_KEY_SERVICE", "key");
        }
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        let config = config_with_env(&[("alpha", "TANDEM_TEST_KEY_SERVICE")]);

        let service = build_service(&config, pool).unwrap();

        assert_eq!(service.system_instruction(), "Be helpful.");
        assert_eq!(service.orchestrator().preferred_label(), "alpha");
    }
}
