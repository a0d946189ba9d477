//! survey-sink library - submission endpoint and response browsing
//!
//! Stateless per request: every submission is parsed, mapped onto the
//! stored column layout, and appended as one row.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use survey_common::ColumnSchema;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod db;
pub mod ingest;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Response store
    pub db: SqlitePool,
    /// Column layout written to an empty store
    pub schema: Arc<ColumnSchema>,
    /// Headers counted by the summary endpoint
    pub summary_columns: Arc<Vec<String>>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, schema: ColumnSchema, summary_columns: Vec<String>) -> Self {
        Self {
            db,
            schema: Arc::new(schema),
            summary_columns: Arc::new(summary_columns),
        }
    }
}

/// Build application router
///
/// Browsers post from a static page in no-cors mode, so CORS is permissive.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/submit", post(api::submit))
        .route("/api/responses", get(api::get_responses))
        .route("/api/summary", get(api::get_summary))
        .merge(api::health_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
