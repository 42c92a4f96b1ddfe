//! Prometheus Metrics Registry - Ledger Observability
//!
//! Counts ledger mutations and rejections and tracks the current row
//! count and total profit. Rendered in text format at `/metrics`.

use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use rust_decimal::prelude::*;

use crate::domain::ledger::Ledger;
use crate::domain::summary;

/// Centralized Prometheus metrics for the ledger service.
///
/// All metrics follow the naming convention `ticket_ledger_*`.
pub struct LedgerMetrics {
    /// Prometheus registry.
    registry: Registry,
    /// Tickets successfully appended.
    pub tickets_appended: IntCounter,
    /// Ledger resets performed.
    pub resets: IntCounter,
    /// Append requests rejected by validation, by reason.
    pub rejected: IntCounterVec,
    /// Storage failures surfaced to callers.
    pub storage_errors: IntCounter,
    /// Rows currently in the ledger.
    pub rows: IntGauge,
    /// Current total profit.
    pub total_profit: Gauge,
}

impl LedgerMetrics {
    /// Create and register all metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let tickets_appended = IntCounter::new(
            "ticket_ledger_tickets_appended_total",
            "Tickets appended to the ledger",
        )?;

        let resets = IntCounter::new("ticket_ledger_resets_total", "Ledger resets")?;

        let rejected = IntCounterVec::new(
            Opts::new(
                "ticket_ledger_rejected_total",
                "Ticket submissions rejected by validation",
            ),
            &["reason"],
        )?;

        let storage_errors = IntCounter::new(
            "ticket_ledger_storage_errors_total",
            "Ledger storage read/write failures",
        )?;

        let rows = IntGauge::new("ticket_ledger_rows", "Rows currently in the ledger")?;

        let total_profit = Gauge::new(
            "ticket_ledger_total_profit",
            "Sum of profit across all ledger rows",
        )?;

        registry.register(Box::new(tickets_appended.clone()))?;
        registry.register(Box::new(resets.clone()))?;
        registry.register(Box::new(rejected.clone()))?;
        registry.register(Box::new(storage_errors.clone()))?;
        registry.register(Box::new(rows.clone()))?;
        registry.register(Box::new(total_profit.clone()))?;

        Ok(Self {
            registry,
            tickets_appended,
            resets,
            rejected,
            storage_errors,
            rows,
            total_profit,
        })
    }

    /// Refresh the gauges from a ledger snapshot.
    ///
    /// Falls back to a float sum when the exact total overflows.
    pub fn observe_ledger(&self, ledger: &Ledger) {
        self.rows
            .set(i64::try_from(ledger.len()).unwrap_or(i64::MAX));
        let total = match summary::total_profit(ledger) {
            Ok(total) => total.to_f64().unwrap_or(0.0),
            Err(_) => ledger
                .rows()
                .iter()
                .filter_map(|row| row.profit_or_zero().to_f64())
                .sum(),
        };
        self.total_profit.set(total);
    }

    /// Render all metrics in Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
