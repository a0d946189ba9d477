//! Response summary: total count plus per-value counts of selected columns

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::api::responses::ApiError;
use crate::db;
use crate::AppState;

/// Summary response
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total_responses: i64,
    /// Header → (value → count). Headers missing from the stored header
    /// row are left out.
    pub counts: BTreeMap<String, BTreeMap<String, i64>>,
}

/// GET /api/summary
///
/// Columns are located by header name in the stored header row, so a
/// store created with a custom layout still summarizes correctly.
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let total_responses = db::data_row_count(&state.db).await?;
    let headers = db::header_row(&state.db).await?.unwrap_or_default();

    let mut counts = BTreeMap::new();
    for column in state.summary_columns.iter() {
        let Some(position) = headers.iter().position(|h| h == column) else {
            debug!("Summary column '{}' not in stored headers", column);
            continue;
        };
        counts.insert(column.clone(), db::column_counts(&state.db, position).await?);
    }

    Ok(Json(SummaryResponse {
        total_responses,
        counts,
    }))
}
