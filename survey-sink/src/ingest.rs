//! Submission ingest: payload → row → append
//!
//! 1. Parse the JSON payload
//! 2. Ensure the header row exists (first submission to an empty store)
//! 3. Lay the responses out in stored header order, timestamp first
//! 4. Append the row

use sqlx::SqlitePool;
use survey_common::{time, ColumnSchema, Error, Result, Submission};
use tracing::debug;

use crate::db;

/// Parse a raw request body into a submission
pub fn parse_submission(body: &[u8]) -> Result<Submission> {
    serde_json::from_slice(body)
        .map_err(|e| Error::InvalidInput(format!("Invalid submission payload: {}", e)))
}

/// Store one submission and return its row index
pub async fn record_submission(
    pool: &SqlitePool,
    schema: &ColumnSchema,
    submission: &Submission,
) -> Result<i64> {
    let stored = db::ensure_schema(pool, schema).await?;
    let row = stored.map_row(submission, &time::now_iso8601());
    debug!("Mapped {} responses onto {} columns", submission.responses.len(), row.len());
    db::append_row(pool, &row).await
}
