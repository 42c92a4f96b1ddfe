//! HTTP Routes - Ledger API, Health Probes, Metrics
//!
//! Thin adapter over `LedgerStore`: each handler takes the store lock,
//! runs one operation, and maps the outcome to a response. The lock
//! serializes interactions, so no two mutations overlap in-process.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{error, warn};

use crate::adapters::metrics::LedgerMetrics;
use crate::adapters::persistence::CsvLedgerFile;
use crate::domain::error::SummaryError;
use crate::domain::ledger::Ledger;
use crate::domain::summary::{self, LedgerSummary};
use crate::domain::ticket::{NewTicket, TicketSale};
use crate::usecases::ledger_store::{LedgerError, LedgerStore};

pub type SharedStore = Arc<Mutex<LedgerStore<CsvLedgerFile>>>;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub metrics: Arc<LedgerMetrics>,
    /// Cleared during graceful shutdown so `/ready` reports 503.
    pub ready: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(store: LedgerStore<CsvLedgerFile>, metrics: LedgerMetrics) -> Self {
        metrics.observe_ledger(store.ledger());
        Self {
            store: Arc::new(Mutex::new(store)),
            metrics: Arc::new(metrics),
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerStore<CsvLedgerFile>>, ApiError> {
        self.store.lock().map_err(|_| ApiError::Poisoned)
    }
}

/// Build the full router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/api/tickets", get(list_tickets).post(add_ticket))
        .route("/api/reset", post(reset))
        .route("/api/summary", get(summary_all))
        .route("/api/summary/profit-share", get(profit_share))
        .route("/api/export", get(export))
        .with_state(state)
}

// ── Errors ──────────────────────────────────────────────────

/// Handler failure mapped to a JSON error body.
#[derive(Debug)]
pub enum ApiError {
    Ledger(LedgerError),
    Summary(SummaryError),
    Metrics(anyhow::Error),
    Poisoned,
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Ledger(LedgerError::Validation(e)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            Self::Ledger(LedgerError::Storage(e)) => {
                error!(error = %e, "Ledger storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            Self::Summary(SummaryError::DivisionUndefined) => {
                (StatusCode::CONFLICT, SummaryError::DivisionUndefined.to_string())
            }
            Self::Summary(e) => {
                error!(error = %e, "Summary computation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            Self::Metrics(e) => {
                error!(error = %e, "Metrics rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            Self::Poisoned => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ledger store unavailable".to_string(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn record_failure(metrics: &LedgerMetrics, err: &LedgerError) {
    match err {
        LedgerError::Validation(e) => {
            warn!(reason = e.reason(), error = %e, "Ticket rejected");
            metrics.rejected.with_label_values(&[e.reason()]).inc();
        }
        LedgerError::Storage(_) => metrics.storage_errors.inc(),
    }
}

// ── Health ──────────────────────────────────────────────────

async fn liveness() -> StatusCode {
    StatusCode::OK
}

async fn readiness(State(state): State<AppState>) -> StatusCode {
    let healthy = state.ready.load(Ordering::Relaxed)
        && state.lock().is_ok_and(|store| store.is_healthy());
    if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state.metrics.render().map_err(ApiError::Metrics)
}

// ── Ledger ──────────────────────────────────────────────────

async fn list_tickets(State(state): State<AppState>) -> Result<Json<Ledger>, ApiError> {
    Ok(Json(state.lock()?.ledger().clone()))
}

async fn add_ticket(
    State(state): State<AppState>,
    Json(ticket): Json<NewTicket>,
) -> Result<(StatusCode, Json<TicketSale>), ApiError> {
    let mut store = state.lock()?;
    match store.append(ticket) {
        Ok(ledger) => {
            state.metrics.tickets_appended.inc();
            state.metrics.observe_ledger(ledger);
            let row = ledger.last().cloned().unwrap_or_default();
            Ok((StatusCode::CREATED, Json(row)))
        }
        Err(err) => {
            record_failure(&state.metrics, &err);
            Err(err.into())
        }
    }
}

async fn reset(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = state.lock()?;
    match store.reset() {
        Ok(ledger) => {
            state.metrics.resets.inc();
            state.metrics.observe_ledger(ledger);
            Ok(Json(json!({ "rows": ledger.len() })))
        }
        Err(err) => {
            record_failure(&state.metrics, &err);
            Err(err.into())
        }
    }
}

async fn summary_all(State(state): State<AppState>) -> Result<Json<LedgerSummary>, ApiError> {
    let store = state.lock()?;
    let summary = LedgerSummary::compute(store.ledger()).map_err(ApiError::Summary)?;
    Ok(Json(summary))
}

async fn profit_share(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Decimal>>, ApiError> {
    let store = state.lock()?;
    let shares = summary::profit_share_by_match(store.ledger()).map_err(ApiError::Summary)?;
    Ok(Json(shares))
}

async fn export(State(state): State<AppState>) -> Result<Response, ApiError> {
    let bytes = state.lock()?.export()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"tickets.csv\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
