//! Storage layer for survey-sink
//!
//! Responses live in one flat, append-only SQLite table (`sheet`):
//! row 0 holds the display headers, row N holds submission N, and every
//! row stores its cells as a JSON array of strings in column order.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use survey_common::Result;
use tracing::info;

/// How long a connection waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

mod sheet;
pub use sheet::{
    append_row, column_counts, data_row_count, ensure_schema, fetch_rows, header_row,
    HeaderStyle, SheetRow,
};

/// Open (creating if needed) the response store and its table
pub async fn init_store(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Applied to every pooled connection; WAL lets the read-only API run
    // while a submission is being appended
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new response store: {}", db_path.display());
    } else {
        info!("Opened existing response store: {}", db_path.display());
    }

    create_sheet_table(&pool).await?;

    Ok(pool)
}

async fn create_sheet_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sheet (
            row_index INTEGER PRIMARY KEY,
            cells TEXT NOT NULL,
            style TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_creation_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("responses.db");

        let pool = init_store(&db_path).await.expect("store should initialize");
        assert!(db_path.exists());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sheet")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_busy_timeout_on_every_connection() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_store(&dir.path().join("responses.db")).await.unwrap();

        // Hold several connections at once so each one is checked
        let mut held = Vec::new();
        for _ in 0..3 {
            held.push(pool.acquire().await.unwrap());
        }
        for conn in held.iter_mut() {
            let timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
                .fetch_one(&mut **conn)
                .await
                .unwrap();
            assert_eq!(timeout, BUSY_TIMEOUT.as_millis() as i64);

            let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
                .fetch_one(&mut **conn)
                .await
                .unwrap();
            assert_eq!(mode, "wal");
        }
    }

    #[tokio::test]
    async fn test_store_reopens_existing() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("responses.db");

        let first = init_store(&db_path).await.unwrap();
        append_row(&first, &["T1".to_string()]).await.unwrap();
        first.close().await;

        let second = init_store(&db_path).await.unwrap();
        assert_eq!(data_row_count(&second).await.unwrap(), 1);
    }
}
