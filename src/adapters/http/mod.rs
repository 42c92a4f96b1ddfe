//! HTTP Adapter - JSON API over the Ledger Store
//!
//! Exposes ticket entry, reset, summaries, CSV download, health probes
//! and Prometheus metrics via axum 0.7.

pub mod routes;
pub mod server;

pub use routes::{AppState, router};
pub use server::serve;
