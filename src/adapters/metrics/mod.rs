//! Metrics Adapters - Prometheus Export
//!
//! Registry of ledger counters and gauges, rendered by the HTTP
//! adapter at `/metrics`.

pub mod prometheus;

pub use self::prometheus::LedgerMetrics;
