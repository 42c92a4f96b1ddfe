//! Profit summaries over a ledger snapshot.
//!
//! Pure functions: no I/O, no mutation. Group maps are `BTreeMap`s, so
//! groups come out in lexical label order regardless of row order. Null
//! profits and prices count as zero.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::SummaryError;
use super::ledger::Ledger;

/// Per-match totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchTotals {
    pub selling_price_sum: Decimal,
    pub profit_sum: Decimal,
}

fn add(acc: Decimal, value: Decimal) -> Result<Decimal, SummaryError> {
    acc.checked_add(value).ok_or(SummaryError::Overflow)
}

/// Sum of profit across all rows. Zero for an empty ledger.
///
/// # Errors
/// `SummaryError::Overflow` if the sum leaves the decimal range.
pub fn total_profit(ledger: &Ledger) -> Result<Decimal, SummaryError> {
    ledger
        .rows()
        .iter()
        .try_fold(Decimal::ZERO, |acc, row| add(acc, row.profit_or_zero()))
}

/// Running profit total, one entry per row, in row order.
///
/// # Errors
/// `SummaryError::Overflow` if any running total leaves the decimal range.
pub fn cumulative_profit(ledger: &Ledger) -> Result<Vec<Decimal>, SummaryError> {
    let mut running = Decimal::ZERO;
    ledger
        .rows()
        .iter()
        .map(|row| {
            running = add(running, row.profit_or_zero())?;
            Ok(running)
        })
        .collect()
}

/// Selling price and profit sums grouped by exact match label.
///
/// # Errors
/// `SummaryError::Overflow` if a group sum leaves the decimal range.
pub fn by_match(ledger: &Ledger) -> Result<BTreeMap<String, MatchTotals>, SummaryError> {
    let mut groups: BTreeMap<String, MatchTotals> = BTreeMap::new();
    for row in ledger.rows() {
        let totals = groups.entry(row.match_name.clone()).or_default();
        totals.selling_price_sum = add(totals.selling_price_sum, row.selling_price_or_zero())?;
        totals.profit_sum = add(totals.profit_sum, row.profit_or_zero())?;
    }
    Ok(groups)
}

/// Profit sums grouped by exact stand label.
///
/// # Errors
/// `SummaryError::Overflow` if a group sum leaves the decimal range.
pub fn by_stand(ledger: &Ledger) -> Result<BTreeMap<String, Decimal>, SummaryError> {
    let mut groups: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in ledger.rows() {
        let sum = groups.entry(row.stand.clone()).or_default();
        *sum = add(*sum, row.profit_or_zero())?;
    }
    Ok(groups)
}

/// Each match's fraction of total profit.
///
/// # Errors
/// `SummaryError::DivisionUndefined` when total profit is zero, which
/// includes the empty ledger. `SummaryError::Overflow` if a sum or a
/// quotient leaves the decimal range.
pub fn profit_share_by_match(
    ledger: &Ledger,
) -> Result<BTreeMap<String, Decimal>, SummaryError> {
    let total = total_profit(ledger)?;
    if total.is_zero() {
        return Err(SummaryError::DivisionUndefined);
    }
    by_match(ledger)?
        .into_iter()
        .map(|(label, totals)| {
            let share = totals
                .profit_sum
                .checked_div(total)
                .ok_or(SummaryError::Overflow)?;
            Ok((label, share))
        })
        .collect()
}

/// Everything a dashboard needs, computed in one pass over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub rows: usize,
    pub total_profit: Decimal,
    pub cumulative_profit: Vec<Decimal>,
    pub by_match: BTreeMap<String, MatchTotals>,
    pub by_stand: BTreeMap<String, Decimal>,
    /// `None` when the share is undefined (zero total profit).
    pub profit_share: Option<BTreeMap<String, Decimal>>,
}

impl LedgerSummary {
    /// # Errors
    /// `SummaryError::Overflow` if any aggregate leaves the decimal range.
    pub fn compute(ledger: &Ledger) -> Result<Self, SummaryError> {
        let profit_share = match profit_share_by_match(ledger) {
            Ok(shares) => Some(shares),
            Err(SummaryError::DivisionUndefined) => None,
            Err(err) => return Err(err),
        };
        Ok(Self {
            rows: ledger.len(),
            total_profit: total_profit(ledger)?,
            cumulative_profit: cumulative_profit(ledger)?,
            by_match: by_match(ledger)?,
            by_stand: by_stand(ledger)?,
            profit_share,
        })
    }
}
