//! SQLite connection pool management.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

/// Paired read/write pools over one SQLite database.
///
/// SQLite permits a single writer at a time, so the writer pool is capped
/// at one connection while readers scale out under WAL mode.
#[derive(Clone)]
pub struct DatabasePool {
    reader: SqlitePool,
    writer: SqlitePool,
}

impl DatabasePool {
    /// Connect to `database_url`, creating the file if needed, and run
    /// pending migrations.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        Ok(Self { reader, writer })
    }

    pub fn reader(&self) -> &SqlitePool {
        &self.reader
    }

    pub fn writer(&self) -> &SqlitePool {
        &self.writer
    }
}

/// Default database URL under the data directory.
///
/// Honors `TANDEM_DATA_DIR`, falling back to `~/.tandem`.
pub fn default_database_url() -> String {
    let data_dir = std::env::var("TANDEM_DATA_DIR").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        format!("{home}/.tandem")
    });
    format!("sqlite://{data_dir}/tandem.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn make_pool() -> (DatabasePool, TempDir) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (pool, dir)
    }

    #[tokio::test]
    async fn test_pool_runs_migrations() {
        let (pool, _dir) = make_pool().await;

        let row: Option<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'transcripts'",
        )
        .fetch_optional(pool.reader())
        .await
        .unwrap();

        assert!(row.is_some());
    }

    #[tokio::test]
    async fn test_wal_mode_enabled() {
        let (pool, _dir) = make_pool().await;

        let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(pool.writer())
            .await
            .unwrap();

        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let (pool, _dir) = make_pool().await;

        let (enabled,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(pool.writer())
            .await
            .unwrap();

        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_default_database_url_shape() {
        let url = default_database_url();
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("/tandem.db"));
    }
}
