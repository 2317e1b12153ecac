//! Sequential failover across the provider plan.
//!
//! The orchestrator is the sole error boundary for provider calls: every
//! `ProviderError` is caught here and answered by advancing to the next
//! plan entry. Callers never see an error -- exhaustion surfaces as
//! in-band text, because the consuming surface has no recovery path other
//! than displaying something.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use tandem_types::chat::ChatMessage;
use tandem_types::llm::{ProviderError, StreamEvent};
use tracing::{debug, warn};

use crate::llm::adapter::ProviderAdapter;
use crate::llm::plan::{FailoverPlan, ProviderSpec};

fn exhaustion_message(last_error: Option<&ProviderError>) -> String {
    let description = match last_error {
        Some(err) => err.to_string(),
        None => "no providers configured".to_string(),
    };
    format!("All models failed. Last error: {description}")
}

/// Drives generation across an ordered provider plan.
///
/// Providers are tried strictly sequentially, never concurrently, with no
/// delay or backoff between attempts. Each call is independent: the
/// orchestrator keeps no state between calls beyond the plan itself, and
/// imposes no timeout of its own -- transport timeouts belong to the
/// adapters' HTTP clients and surface as ordinary provider errors.
#[derive(Debug)]
pub struct FailoverOrchestrator {
    preferred_label: String,
    plan: FailoverPlan,
}

impl FailoverOrchestrator {
    /// Build an orchestrator from the preferred label and the configured
    /// provider specs. The plan puts the preferred provider first and the
    /// rest in configured order.
    pub fn new(preferred_label: impl Into<String>, specs: Vec<ProviderSpec>) -> Self {
        let preferred_label = preferred_label.into();
        let plan = FailoverPlan::build(&preferred_label, specs);
        Self {
            preferred_label,
            plan,
        }
    }

    pub fn preferred_label(&self) -> &str {
        &self.preferred_label
    }

    pub fn plan(&self) -> &FailoverPlan {
        &self.plan
    }

    /// Full-reply generation with failover.
    ///
    /// Returns the first successful provider's reply. When every provider
    /// fails, the returned string is a clearly marked failure message
    /// embedding the last error. This operation never errors.
    pub async fn get_response(&self, history: &[ChatMessage], system_instruction: &str) -> String {
        let mut last_error: Option<ProviderError> = None;
        for spec in self.plan.entries() {
            debug!(provider = %spec.label, model = %spec.wire_model_id, "Attempting provider");
            match spec
                .adapter
                .generate(&spec.wire_model_id, history, system_instruction)
                .await
            {
                Ok(text) => return text,
                Err(err) => {
                    warn!(provider = %spec.label, error = %err, "Provider failed, trying next in plan");
                    last_error = Some(err);
                }
            }
        }
        exhaustion_message(last_error.as_ref())
    }

    /// Streaming generation with failover.
    ///
    /// Yields `(fragment, provider label)` events, pulled lazily: nothing
    /// runs until the caller polls, and a slow consumer throttles the
    /// upstream read. A provider that fails before its first fragment is
    /// skipped transparently. One that fails mid-stream keeps its
    /// already-yielded fragments; the next provider receives the identical
    /// input history and its full generation is appended after them. When
    /// every provider fails, a single final failure fragment is yielded
    /// (labeled with the last provider attempted) and the stream ends.
    pub fn get_response_stream(
        &self,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> Pin<Box<dyn Stream<Item = StreamEvent> + Send + 'static>> {
        let entries: Vec<ProviderSpec> = self.plan.entries().to_vec();
        let history: Vec<ChatMessage> = history.to_vec();
        let system_instruction = system_instruction.to_string();

        Box::pin(async_stream::stream! {
            let mut last_error: Option<ProviderError> = None;
            let mut last_label: Option<String> = None;
            let mut completed = false;

            for spec in &entries {
                debug!(provider = %spec.label, model = %spec.wire_model_id, "Attempting provider stream");
                last_label = Some(spec.label.clone());
                let mut upstream = spec.adapter.generate_stream(
                    &spec.wire_model_id,
                    &history,
                    &system_instruction,
                );
                let mut provider_failed = false;
                while let Some(item) = upstream.next().await {
                    match item {
                        Ok(text) => {
                            yield StreamEvent::new(text, spec.label.clone());
                        }
                        Err(err) => {
                            warn!(provider = %spec.label, error = %err, "Provider stream failed, trying next in plan");
                            last_error = Some(err);
                            provider_failed = true;
                            break;
                        }
                    }
                }
                if !provider_failed {
                    completed = true;
                    break;
                }
            }

            if !completed {
                let label = last_label.unwrap_or_else(|| "none".to_string());
                yield StreamEvent::new(exhaustion_message(last_error.as_ref()), label);
            }
        })
    }
}
