//! SQLite-backed transcript sink.

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tandem_core::chat::sink::TranscriptSink;
use tandem_types::chat::{ChatMessage, Feedback, InteractionKind, TranscriptEntry};
use tandem_types::error::SinkError;

use crate::sqlite::pool::DatabasePool;

/// Derive the stored key segment for a user identifier.
///
/// Dots are replaced with underscores so identifiers that look like
/// emails or IP addresses stay path-safe as key segments.
pub fn storage_key(user_id: &str) -> String {
    user_id.replace('.', "_")
}

/// [`TranscriptSink`] implementation over [`DatabasePool`].
///
/// One row per `(user_id, session_id)`; recording again under the same
/// key replaces the stored transcript.
#[derive(Clone)]
pub struct SqliteTranscriptStore {
    pool: DatabasePool,
}

impl SqliteTranscriptStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Load a stored transcript, if any.
    pub async fn get(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<TranscriptEntry>, SinkError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, session_id, model_label, interaction_kind, feedback, messages
            FROM transcripts
            WHERE user_id = ? AND session_id = ?
            "#,
        )
        .bind(storage_key(user_id))
        .bind(session_id)
        .fetch_optional(self.pool.reader())
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let parsed = TranscriptRow::from_row(&row).map_err(map_sqlx_error)?;
                Ok(Some(parsed.into_entry()?))
            }
            None => Ok(None),
        }
    }
}

impl TranscriptSink for SqliteTranscriptStore {
    fn record(
        &self,
        entry: &TranscriptEntry,
    ) -> impl std::future::Future<Output = Result<(), SinkError>> + Send {
        async move {
            let messages = serde_json::to_string(&entry.messages)
                .map_err(|e| SinkError::Serialization(e.to_string()))?;
            let now = format_datetime(&Utc::now());

            sqlx::query(
                r#"
                INSERT INTO transcripts
                    (user_id, session_id, model_label, interaction_kind, feedback, messages, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT (user_id, session_id) DO UPDATE SET
                    model_label = excluded.model_label,
                    interaction_kind = excluded.interaction_kind,
                    feedback = excluded.feedback,
                    messages = excluded.messages,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(storage_key(&entry.user_id))
            .bind(&entry.session_id)
            .bind(&entry.model_label)
            .bind(entry.interaction_kind.to_string())
            .bind(entry.feedback.map(|feedback| feedback.to_string()))
            .bind(&messages)
            .bind(&now)
            .bind(&now)
            .execute(self.pool.writer())
            .await
            .map_err(map_sqlx_error)?;

            Ok(())
        }
    }
}

fn map_sqlx_error(error: sqlx::Error) -> SinkError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => SinkError::Connection,
        other => SinkError::Query(other.to_string()),
    }
}

fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339()
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

struct TranscriptRow {
    user_id: String,
    session_id: String,
    model_label: String,
    interaction_kind: String,
    feedback: Option<String>,
    messages: String,
}

impl TranscriptRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            session_id: row.try_get("session_id")?,
            model_label: row.try_get("model_label")?,
            interaction_kind: row.try_get("interaction_kind")?,
            feedback: row.try_get("feedback")?,
            messages: row.try_get("messages")?,
        })
    }

    fn into_entry(self) -> Result<TranscriptEntry, SinkError> {
        let interaction_kind = self
            .interaction_kind
            .parse::<InteractionKind>()
            .map_err(SinkError::Serialization)?;
        let feedback = match self.feedback {
            Some(raw) => Some(raw.parse::<Feedback>().map_err(SinkError::Serialization)?),
            None => None,
        };
        let messages: Vec<ChatMessage> = serde_json::from_str(&self.messages)
            .map_err(|e| SinkError::Serialization(e.to_string()))?;

        Ok(TranscriptEntry {
            user_id: self.user_id,
            session_id: self.session_id,
            model_label: self.model_label,
            interaction_kind,
            feedback,
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn make_store() -> (SqliteTranscriptStore, DatabasePool, TempDir) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (SqliteTranscriptStore::new(pool.clone()), pool, dir)
    }

    fn entry(user_id: &str, session_id: &str, reply: &str) -> TranscriptEntry {
        TranscriptEntry {
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            model_label: "gemini-3-pro-preview".to_string(),
            interaction_kind: InteractionKind::InitialQuery,
            feedback: None,
            messages: vec![
                ChatMessage::user("What is compound interest?"),
                ChatMessage::assistant(reply).with_produced_by("gemini-3-pro-preview"),
            ],
        }
    }

    #[test]
    fn test_storage_key_replaces_dots() {
        assert_eq!(storage_key("192.168.1.5"), "192_168_1_5");
        assert_eq!(storage_key("alice"), "alice");
    }

    #[tokio::test]
    async fn test_record_then_get_roundtrip() {
        let (store, _pool, _dir) = make_store().await;
        let entry = entry("alice", "session-1", "Interest on interest.");

        store.record(&entry).await.unwrap();
        let loaded = store.get("alice", "session-1").await.unwrap().unwrap();

        assert_eq!(loaded, entry);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (store, _pool, _dir) = make_store().await;
        assert!(store.get("nobody", "session-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_replaces_existing_key() {
        let (store, pool, _dir) = make_store().await;

        store
            .record(&entry("alice", "session-1", "First draft."))
            .await
            .unwrap();

        let mut updated = entry("alice", "session-1", "Second draft.");
        updated.interaction_kind = InteractionKind::UnderstoodFeedback;
        updated.feedback = Some(Feedback::Understood);
        store.record(&updated).await.unwrap();

        let loaded = store.get("alice", "session-1").await.unwrap().unwrap();
        assert_eq!(loaded, updated);

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transcripts")
            .fetch_one(pool.reader())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_distinct_sessions_get_distinct_rows() {
        let (store, pool, _dir) = make_store().await;

        store
            .record(&entry("alice", "session-1", "One."))
            .await
            .unwrap();
        store
            .record(&entry("alice", "session-2", "Two."))
            .await
            .unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transcripts")
            .fetch_one(pool.reader())
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_dotted_user_id_is_sanitized() {
        let (store, _pool, _dir) = make_store().await;

        store
            .record(&entry("alice.smith", "session-1", "Hello."))
            .await
            .unwrap();

        let loaded = store.get("alice.smith", "session-1").await.unwrap().unwrap();
        assert_eq!(loaded.user_id, "alice_smith");
    }
}
