//! Integration Tests - HTTP API
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`
//! against a CSV ledger in a temp directory.

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use ticket_ledger::adapters::http::{AppState, router};
use ticket_ledger::adapters::metrics::LedgerMetrics;
use ticket_ledger::adapters::persistence::CsvLedgerFile;
use ticket_ledger::usecases::ledger_store::LedgerStore;

fn app(path: &Path) -> Router {
    let (store, _) = LedgerStore::open(CsvLedgerFile::new(path)).unwrap();
    router(AppState::new(store, LedgerMetrics::new().unwrap()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn ticket(m: &str, s: &str, buy: &str, sell: &str, qty: i64) -> Value {
    json!({
        "match": m,
        "stand": s,
        "purchase_price": buy,
        "selling_price": sell,
        "quantity": qty,
    })
}

#[tokio::test]
async fn test_health_probes() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("tickets.csv"));

    assert_eq!(send(&app, get("/live")).await.0, StatusCode::OK);
    assert_eq!(send(&app, get("/ready")).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_add_ticket_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("tickets.csv"));

    let (status, row) = send_json(
        &app,
        post_json("/api/tickets", &ticket("Match A", "Stand 1", "100", "150", 2)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(row["match"], "Match A");
    assert_eq!(row["profit"], "100");

    let (status, rows) = send_json(&app, get("/api/tickets")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_ticket_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("tickets.csv"));

    let (status, body) = send_json(
        &app,
        post_json("/api/tickets", &ticket("M", "S", "10", "5", 0)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("quantity"));

    let (_, rows) = send_json(&app, get("/api/tickets")).await;
    assert!(rows.as_array().unwrap().is_empty());

    let (_, metrics) = send(&app, get("/metrics")).await;
    let metrics = String::from_utf8(metrics).unwrap();
    assert!(metrics.contains("reason=\"non_positive_quantity\""));
}

#[tokio::test]
async fn test_summary_and_profit_share() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("tickets.csv"));

    let (_, share) = send_json(&app, get("/api/summary/profit-share")).await;
    assert!(share["error"].as_str().unwrap().contains("undefined"));

    send(&app, post_json("/api/tickets", &ticket("Match A", "Stand 1", "100", "150", 2))).await;
    send(&app, post_json("/api/tickets", &ticket("Match A", "Stand 2", "50", "50", 1))).await;

    let (status, summary) = send_json(&app, get("/api/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_profit"], "100");
    assert_eq!(summary["cumulative_profit"], json!(["100", "100"]));
    assert_eq!(summary["by_match"]["Match A"]["profit_sum"], "100");
    assert_eq!(summary["by_stand"]["Stand 2"], "0");
    assert_eq!(summary["profit_share"]["Match A"], "1");

    let (status, share) = send_json(&app, get("/api/summary/profit-share")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(share["Match A"], "1");
}

#[tokio::test]
async fn test_profit_share_conflict_when_zero() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("tickets.csv"));

    send(&app, post_json("/api/tickets", &ticket("A", "1", "10", "20", 1))).await;
    send(&app, post_json("/api/tickets", &ticket("B", "1", "20", "10", 1))).await;

    let (status, _) = send_json(&app, get("/api/summary/profit-share")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (_, summary) = send_json(&app, get("/api/summary")).await;
    assert_eq!(summary["profit_share"], Value::Null);
}

#[tokio::test]
async fn test_reset_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tickets.csv");
    let app = app(&path);

    send(&app, post_json("/api/tickets", &ticket("Final, Day 1", "North", "10", "25", 3))).await;

    let request = get("/api/export");
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(
        String::from_utf8(bytes.to_vec()).unwrap(),
        "Match,Stand,Purchase Price,Selling Price,Quantity,Profit\n\"Final, Day 1\",North,10,25,3,45\n"
    );

    let (status, body) = send_json(&app, Request::post("/api/reset").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"], 0);

    let (_, rows) = send_json(&app, get("/api/tickets")).await;
    assert!(rows.as_array().unwrap().is_empty());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Match,Stand,Purchase Price,Selling Price,Quantity,Profit\n"
    );
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("tickets.csv"));
    send(&app, post_json("/api/tickets", &ticket("Match A", "Stand 1", "100", "150", 2))).await;

    // A directory on the tmp path makes the atomic write fail.
    std::fs::create_dir(dir.path().join("tickets.csv.tmp")).unwrap();

    let (status, body) = send_json(
        &app,
        post_json("/api/tickets", &ticket("Match B", "Stand 1", "10", "20", 1)),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("tickets.csv"));

    let (status, _) = send_json(&app, Request::post("/api/reset").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, rows) = send_json(&app, get("/api/tickets")).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);

    let (_, metrics) = send(&app, get("/metrics")).await;
    let metrics = String::from_utf8(metrics).unwrap();
    assert!(metrics.contains("ticket_ledger_storage_errors_total 2"));
    assert!(metrics.contains("ticket_ledger_rows 1"));
}

#[tokio::test]
async fn test_poisoned_store_lock_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let (store, _) = LedgerStore::open(CsvLedgerFile::new(dir.path().join("tickets.csv"))).unwrap();
    let state = AppState::new(store, LedgerMetrics::new().unwrap());

    let shared = state.store.clone();
    let _ = std::thread::spawn(move || {
        let _guard = shared.lock().unwrap();
        panic!("handler crashed while holding the ledger");
    })
    .join();

    let app = router(state);
    let (status, body) = send_json(&app, get("/api/tickets")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "ledger store unavailable");
    assert_eq!(send(&app, get("/ready")).await.0, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_append_overflowing_totals_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tickets.csv");
    let app = app(&path);
    let big = "50000000000000000000000000000";

    let (status, _) = send_json(&app, post_json("/api/tickets", &ticket("A", "1", "0", big, 1))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(&app, post_json("/api/tickets", &ticket("A", "1", "0", big, 1))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("overflow"));

    let (status, summary) = send_json(&app, get("/api/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_profit"], big);

    let (_, metrics) = send(&app, get("/metrics")).await;
    assert!(String::from_utf8(metrics).unwrap().contains("reason=\"totals_overflow\""));

    // A restart on the same file still serves.
    let restarted = self::app(&path);
    assert_eq!(send(&restarted, get("/api/summary")).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_overflowing_file_summary_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tickets.csv");
    let big = "50000000000000000000000000000";
    std::fs::write(
        &path,
        format!(
            "Match,Stand,Purchase Price,Selling Price,Quantity,Profit\n\
             A,1,0,{big},1,{big}\nA,1,0,{big},1,{big}\n"
        ),
    )
    .unwrap();

    let app = app(&path);
    let (status, body) = send_json(&app, get("/api/summary")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("overflow"));
    let (status, _) = send_json(&app, get("/api/summary/profit-share")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, rows) = send_json(&app, get("/api/tickets")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().unwrap().len(), 2);
}
