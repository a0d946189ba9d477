//! Response browsing
//!
//! Read-only view of the stored sheet: the header row plus one page of data
//! rows. Row 0 (headers) is never counted or paged; page 1 starts at sheet
//! row 1.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::{self, SheetRow};
use crate::AppState;

/// Data rows per page
pub const ROWS_PER_PAGE: i64 = 100;

/// Query parameters for response browsing
#[derive(Debug, Default, Deserialize)]
pub struct ResponsesQuery {
    /// Page number, 1-based; out-of-range values are pulled into range
    pub page: Option<i64>,
}

/// Which slice of the data rows a page covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetPage {
    /// Page actually served
    pub number: i64,
    /// Pages needed for all data rows (0 for an empty sheet)
    pub count: i64,
    /// Data rows skipped before this page
    pub skip: i64,
}

impl SheetPage {
    /// Place `requested` within a sheet holding `data_rows` rows below the header
    ///
    /// An empty sheet still serves page 1, with nothing on it.
    pub fn locate(data_rows: i64, requested: Option<i64>) -> Self {
        let count = (data_rows.max(0) + ROWS_PER_PAGE - 1) / ROWS_PER_PAGE;
        let number = requested.unwrap_or(1).clamp(1, count.max(1));
        Self {
            number,
            count,
            skip: (number - 1) * ROWS_PER_PAGE,
        }
    }
}

/// One page of stored responses
#[derive(Debug, Serialize)]
pub struct ResponsesPage {
    /// Stored header row (empty before the first submission)
    pub headers: Vec<String>,
    pub total_rows: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub rows: Vec<SheetRow>,
}

/// GET /api/responses?page=N
pub async fn get_responses(
    State(state): State<AppState>,
    query: Result<Query<ResponsesQuery>, QueryRejection>,
) -> Result<Json<ResponsesPage>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let headers = db::header_row(&state.db).await?.unwrap_or_default();
    let total_rows = db::data_row_count(&state.db).await?;

    let page = SheetPage::locate(total_rows, query.page);
    let rows = db::fetch_rows(&state.db, page.skip, ROWS_PER_PAGE).await?;

    Ok(Json(ResponsesPage {
        headers,
        total_rows,
        page: page.number,
        page_size: ROWS_PER_PAGE,
        total_pages: page.count,
        rows,
    }))
}

/// Read-only API errors, answered as JSON `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Database(String),
}

impl From<survey_common::Error> for ApiError {
    fn from(err: survey_common::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_one_starts_below_header() {
        assert_eq!(
            SheetPage::locate(150, None),
            SheetPage { number: 1, count: 2, skip: 0 }
        );
    }

    #[test]
    fn test_requested_page_pulled_into_range() {
        assert_eq!(SheetPage::locate(150, Some(0)).number, 1);
        assert_eq!(SheetPage::locate(150, Some(-4)).number, 1);

        let last = SheetPage::locate(250, Some(99));
        assert_eq!(last.number, 3);
        assert_eq!(last.skip, 200);
    }

    #[test]
    fn test_full_last_page() {
        let page = SheetPage::locate(200, Some(3));
        assert_eq!(page, SheetPage { number: 2, count: 2, skip: 100 });
    }

    #[test]
    fn test_empty_sheet() {
        assert_eq!(
            SheetPage::locate(0, Some(5)),
            SheetPage { number: 1, count: 0, skip: 0 }
        );
    }
}
