//! Submission endpoint
//!
//! Every outcome is answered with HTTP 200 and a structured acknowledgment.
//! Parse and storage failures become `{"status":"error","message":...}`;
//! they never surface to the caller as a transport fault.

use axum::{body::Bytes, extract::State, Json};
use survey_common::Ack;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{ingest, AppState};

/// POST /submit
///
/// Body: `{"timestamp": "...", "responses": {"<field_key>": "<value>"}}`
pub async fn submit(State(state): State<AppState>, body: Bytes) -> Json<Ack> {
    let request_id = Uuid::new_v4();

    let submission = match ingest::parse_submission(&body) {
        Ok(submission) => submission,
        Err(e) => {
            warn!(%request_id, "Rejected submission: {}", e);
            return Json(Ack::error(e.to_string()));
        }
    };

    match ingest::record_submission(&state.db, &state.schema, &submission).await {
        Ok(row_index) => {
            info!(%request_id, row_index, "Stored submission with {} responses", submission.responses.len());
            Json(Ack::success())
        }
        Err(e) => {
            warn!(%request_id, "Failed to store submission: {}", e);
            Json(Ack::error(e.to_string()))
        }
    }
}
