//! Domain error types.
//!
//! Validation failures are raised before any mutation or I/O happens.
//! Summary failures cover derived computations that have no defined value.

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejected ticket input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Purchase price below zero.
    #[error("purchase price must not be negative, got {0}")]
    NegativePurchasePrice(Decimal),
    /// Selling price below zero.
    #[error("selling price must not be negative, got {0}")]
    NegativeSellingPrice(Decimal),
    /// Quantity below one.
    #[error("quantity must be at least 1, got {0}")]
    NonPositiveQuantity(i64),
    /// Profit does not fit in a 96-bit decimal.
    #[error("profit overflows decimal range")]
    ProfitOverflow,
    /// Row would push a ledger total or group sum out of decimal range.
    #[error("ledger totals would overflow decimal range")]
    TotalsOverflow,
}

impl ValidationError {
    /// Short machine-readable reason, used as a metrics label.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NegativePurchasePrice(_) => "negative_purchase_price",
            Self::NegativeSellingPrice(_) => "negative_selling_price",
            Self::NonPositiveQuantity(_) => "non_positive_quantity",
            Self::ProfitOverflow => "profit_overflow",
            Self::TotalsOverflow => "totals_overflow",
        }
    }
}

/// Derived value that cannot be computed for the given ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// Profit share requested while total profit is zero.
    #[error("profit share is undefined when total profit is zero")]
    DivisionUndefined,
    /// A sum or share does not fit in a 96-bit decimal.
    #[error("ledger totals overflow decimal range")]
    Overflow,
}
