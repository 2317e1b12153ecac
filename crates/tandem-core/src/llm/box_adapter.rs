//! Object-safe wrapper for `ProviderAdapter`.
//!
//! `ProviderAdapter` uses RPITIT, which makes it dyn-incompatible. The
//! failover plan needs heterogeneous adapters behind one type, so this
//! module bridges the gap: an internal dyn-compatible mirror trait with
//! boxed futures, a blanket impl covering every `ProviderAdapter`, and the
//! concrete `BoxProviderAdapter` wrapper the plan stores.

use std::future::Future;
use std::pin::Pin;

use futures_util::Stream;
use tandem_types::chat::ChatMessage;
use tandem_types::llm::ProviderError;

use crate::llm::adapter::ProviderAdapter;

/// Internal dyn-compatible mirror of `ProviderAdapter`.
trait ProviderAdapterDyn: Send + Sync {
    fn generate_boxed<'a>(
        &'a self,
        model_id: &'a str,
        history: &'a [ChatMessage],
        system_instruction: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;

    fn generate_stream_boxed(
        &self,
        model_id: &str,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send + 'static>>;
}

impl<T: ProviderAdapter> ProviderAdapterDyn for T {
    fn generate_boxed<'a>(
        &'a self,
        model_id: &'a str,
        history: &'a [ChatMessage],
        system_instruction: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>> {
        Box::pin(self.generate(model_id, history, system_instruction))
    }

    fn generate_stream_boxed(
        &self,
        model_id: &str,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send + 'static>> {
        self.generate_stream(model_id, history, system_instruction)
    }
}

/// Type-erased provider adapter.
///
/// Wraps any `ProviderAdapter` and implements the trait itself, so plan
/// entries can hold Gemini and OpenAI adapters side by side.
pub struct BoxProviderAdapter {
    inner: Box<dyn ProviderAdapterDyn + Send + Sync>,
}

impl BoxProviderAdapter {
    pub fn new<T: ProviderAdapter + 'static>(adapter: T) -> Self {
        Self {
            inner: Box::new(adapter),
        }
    }
}

impl std::fmt::Debug for BoxProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxProviderAdapter").finish_non_exhaustive()
    }
}

impl ProviderAdapter for BoxProviderAdapter {
    fn generate(
        &self,
        model_id: &str,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send {
        async move {
            self.inner
                .generate_boxed(model_id, history, system_instruction)
                .await
        }
    }

    fn generate_stream(
        &self,
        model_id: &str,
        history: &[ChatMessage],
        system_instruction: &str,
    ) -> Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send + 'static>> {
        self.inner
            .generate_stream_boxed(model_id, history, system_instruction)
    }
}
