//! Liveness plus a look at the response store
//!
//! Answers 503 when the store cannot be queried.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::{db, AppState};

/// Sink status as seen by a supervisor
#[derive(Debug, Serialize)]
pub struct SinkHealth {
    /// "ok" or "unavailable"
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// Header row present; false until the first submission or startup check
    pub header_written: bool,
    /// Stored data rows, header excluded
    pub responses: i64,
    /// Columns in the stored header row, or in the configured layout before it exists
    pub columns: usize,
}

async fn read_store_state(state: &AppState) -> survey_common::Result<(Option<Vec<String>>, i64)> {
    let headers = db::header_row(&state.db).await?;
    let responses = db::data_row_count(&state.db).await?;
    Ok((headers, responses))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<SinkHealth>) {
    let mut health = SinkHealth {
        status: "ok",
        module: "survey-sink",
        version: env!("CARGO_PKG_VERSION"),
        header_written: false,
        responses: 0,
        columns: state.schema.len(),
    };

    match read_store_state(&state).await {
        Ok((headers, responses)) => {
            if let Some(headers) = headers {
                health.header_written = true;
                health.columns = headers.len();
            }
            health.responses = responses;
            (StatusCode::OK, Json(health))
        }
        Err(e) => {
            warn!("Health check could not read the store: {}", e);
            health.status = "unavailable";
            (StatusCode::SERVICE_UNAVAILABLE, Json(health))
        }
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
