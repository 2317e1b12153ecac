//! Core provider adapter trait.

use std::pin::Pin;

use futures_util::Stream;
use tandem_types::chat::ChatMessage;
use tandem_types::llm::ProviderError;

/// A single model provider's request/response contract.
///
/// One implementation exists per provider family. An adapter translates
/// the provider-agnostic turn history into its provider's wire format,
/// injects the system instruction per that provider's own convention
/// (dedicated system slot or prepended system message), and normalizes
/// output into plain text.
///
/// Adapters never retry and never mutate the input history. Retry and
/// failover belong exclusively to the orchestrator; an adapter reports
/// each failure exactly once and stops.
pub trait ProviderAdapter: Send + Sync {
    /// Generate the full reply for the given history.
    fn generate(
        &self,
        model_id: &str,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;

    /// Generate the reply as a lazy stream of text fragments.
    ///
    /// The concatenation of yielded fragments equals what `generate` would
    /// return for the same inputs, within provider nondeterminism. A
    /// failure after zero or more fragments surfaces as a single `Err`
    /// item and the stream ends. Empty fragments are never yielded.
    fn generate_stream(
        &self,
        model_id: &str,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send + 'static>>;
}
