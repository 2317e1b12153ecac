//! Transcript persistence port.

use tandem_types::chat::TranscriptEntry;
use tandem_types::error::SinkError;

/// Durable transcript persistence.
///
/// Implementations live in `tandem-infra`. The conversation service calls
/// `record` only after an assistant turn's text is finalized; a record for
/// an existing `(user_id, session_id)` key replaces the stored transcript
/// rather than appending a second one.
pub trait TranscriptSink: Send + Sync {
    fn record(
        &self,
        entry: &TranscriptEntry,
    ) -> impl std::future::Future<Output = Result<(), SinkError>> + Send;
}
