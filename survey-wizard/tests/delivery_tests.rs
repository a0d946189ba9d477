//! Delivery against a real survey-sink on a loopback port

use axum::{routing::post, Json, Router};
use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;
use survey_common::{Ack, ColumnSchema, Submission};
use survey_sink::{build_router, db, AppState};
use survey_wizard::{Delivery, FormState, SinkClient, Survey};

/// Serve `app` on 127.0.0.1:0 and return its base URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind loopback port");
    let addr = listener.local_addr().expect("Should have local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

/// Start a sink with a fresh store; returns the temp dir, base URL, and store
async fn spawn_sink() -> (tempfile::TempDir, String, SqlitePool) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = db::init_store(&dir.path().join("responses.db"))
        .await
        .expect("Should initialize store");
    let schema = db::ensure_schema(&pool, &ColumnSchema::standard())
        .await
        .expect("Should write header row");

    let base = serve(build_router(AppState::new(pool.clone(), schema, Vec::new()))).await;
    (dir, base, pool)
}

fn sample_submission() -> Submission {
    let survey = Survey::standard();
    let mut form = FormState::new();
    form.select(&survey, "q1_usage_level", "regular").unwrap();
    form.set_checked_all(&survey, "q2_tools", ["claude", "chatgpt"]).unwrap();
    form.set_text(&survey, "q17_name", "Sam").unwrap();

    let now = Utc.with_ymd_and_hms(2026, 1, 29, 8, 0, 0).unwrap();
    survey_wizard::serializer::build_submission(&survey, &form, now)
}

#[tokio::test]
async fn test_delivery_confirmed_and_row_appended() {
    let (_dir, base, pool) = spawn_sink().await;
    let client = SinkClient::new(Some(format!("{}/submit", base))).unwrap();

    let delivery = client.deliver(&sample_submission()).await;
    match &delivery {
        Delivery::Confirmed(ack) => assert!(ack.is_success()),
        other => panic!("expected confirmed delivery, got {:?}", other),
    }
    assert!(delivery.should_clear_draft());

    let rows = db::fetch_rows(&pool, 0, 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    let cells = &rows[0].cells;
    assert_eq!(cells[0], "2026-01-29T08:00:00.000Z");
    assert_eq!(cells[1], "regular");
    assert_eq!(cells[2], "chatgpt, claude");
    // Unanswered fields are blank cells
    assert_eq!(cells[3], "");
    assert_eq!(cells.len(), ColumnSchema::standard().len());
}

#[tokio::test]
async fn test_error_ack_is_rejected() {
    let app = Router::new().route("/submit", post(|| async { Json(Ack::error("Sheet is locked")) }));
    let base = serve(app).await;
    let client = SinkClient::new(Some(format!("{}/submit", base))).unwrap();

    let delivery = client.deliver(&sample_submission()).await;
    assert_eq!(delivery, Delivery::Rejected("Sheet is locked".to_string()));
    assert!(!delivery.should_clear_draft());
}

#[tokio::test]
async fn test_non_ack_response_is_unconfirmed() {
    let (_dir, base, pool) = spawn_sink().await;
    // Unknown route: 404 with no JSON body
    let client = SinkClient::new(Some(format!("{}/nope", base))).unwrap();

    let delivery = client.deliver(&sample_submission()).await;
    assert!(matches!(delivery, Delivery::Unconfirmed(_)));
    assert_eq!(db::data_row_count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unreachable_sink_is_unconfirmed() {
    // Reserve a port, then close it so nothing listens there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SinkClient::new(Some(format!("http://{}/submit", addr))).unwrap();
    let delivery = client.deliver(&sample_submission()).await;
    assert!(matches!(delivery, Delivery::Unconfirmed(_)));
    assert!(!delivery.should_clear_draft());
}

#[tokio::test]
async fn test_missing_url_is_not_configured() {
    let client = SinkClient::new(None).unwrap();
    let delivery = client.deliver(&sample_submission()).await;
    assert_eq!(delivery, Delivery::NotConfigured);
    assert!(delivery.should_clear_draft());
}
