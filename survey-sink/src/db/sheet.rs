//! Header row and data row operations on the `sheet` table
//!
//! The header row is written at most once by `ensure_schema`; data rows are
//! only ever appended.

use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use survey_common::{ColumnSchema, Result};
use tracing::info;

/// Row index reserved for the header row
const HEADER_ROW: i64 = 0;

/// One-time visual style recorded with the header row
///
/// Presentation only; kept so an exported sheet can reproduce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderStyle {
    pub font_weight: String,
    pub background: String,
    pub font_color: String,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            font_weight: "bold".to_string(),
            background: "#3D2817".to_string(),
            font_color: "#FFFFFF".to_string(),
        }
    }
}

/// One stored data row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub row_index: i64,
    pub cells: Vec<String>,
}

fn decode_cells(raw: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(raw)?)
}

/// Read the persisted header row, if any
pub async fn header_row(pool: &SqlitePool) -> Result<Option<Vec<String>>> {
    let raw: Option<String> = sqlx::query_scalar("SELECT cells FROM sheet WHERE row_index = ?")
        .bind(HEADER_ROW)
        .fetch_optional(pool)
        .await?;

    raw.as_deref().map(decode_cells).transpose()
}

/// Write the header row if the store has none, then return the stored layout
///
/// Idempotent. Once a header row exists it is authoritative: the returned
/// schema is rebuilt from the stored headers, not from `schema`.
pub async fn ensure_schema(pool: &SqlitePool, schema: &ColumnSchema) -> Result<ColumnSchema> {
    let cells = serde_json::to_string(&schema.headers())?;
    let style = serde_json::to_string(&HeaderStyle::default())?;

    let result = sqlx::query("INSERT OR IGNORE INTO sheet (row_index, cells, style) VALUES (?, ?, ?)")
        .bind(HEADER_ROW)
        .bind(&cells)
        .bind(&style)
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        info!("Created header row with {} columns", schema.len());
    }

    let headers = header_row(pool).await?.unwrap_or_else(|| schema.headers());
    Ok(ColumnSchema::from_headers(headers))
}

/// Append a data row after the last stored row
///
/// The next index is computed inside the INSERT so concurrent appends
/// never share an index. Data rows start at 1 even without a header row.
pub async fn append_row(pool: &SqlitePool, cells: &[String]) -> Result<i64> {
    let encoded = serde_json::to_string(cells)?;

    let result = sqlx::query(
        "INSERT INTO sheet (row_index, cells) SELECT COALESCE(MAX(row_index), 0) + 1, ? FROM sheet",
    )
    .bind(&encoded)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Number of data rows (header excluded)
pub async fn data_row_count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sheet WHERE row_index > ?")
        .bind(HEADER_ROW)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Fetch data rows in append order
pub async fn fetch_rows(pool: &SqlitePool, offset: i64, limit: i64) -> Result<Vec<SheetRow>> {
    let rows = sqlx::query(
        "SELECT row_index, cells FROM sheet WHERE row_index > ? ORDER BY row_index ASC LIMIT ? OFFSET ?",
    )
    .bind(HEADER_ROW)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let raw: String = row.get("cells");
            Ok(SheetRow {
                row_index: row.get("row_index"),
                cells: decode_cells(&raw)?,
            })
        })
        .collect()
}

/// Count data rows per distinct value of one column
///
/// Rows shorter than `column` count under the empty string.
pub async fn column_counts(pool: &SqlitePool, column: usize) -> Result<BTreeMap<String, i64>> {
    let path = format!("$[{}]", column);

    let rows = sqlx::query(
        r#"
        SELECT COALESCE(json_extract(cells, ?), '') AS value, COUNT(*) AS count
        FROM sheet
        WHERE row_index > ?
        GROUP BY value
        "#,
    )
    .bind(&path)
    .bind(HEADER_ROW)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get::<String, _>("value"), row.get::<i64, _>("count")))
        .collect())
}
