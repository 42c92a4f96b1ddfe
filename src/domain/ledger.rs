//! Ledger model and schema repair.
//!
//! `RawTable` is the untyped shape read from or written to storage.
//! `Ledger::from_table` turns it into typed rows, restricting columns to
//! the fixed schema and backfilling missing ones. Whatever it had to fix
//! is reported in a `SchemaRepair` so callers can log it.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::Serialize;

use super::ticket::{Column, TicketSale};

/// Header plus string cells, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// What `Ledger::from_table` changed while reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaRepair {
    /// Stored columns that are not part of the schema (or repeat one).
    pub dropped: Vec<String>,
    /// Schema columns absent from storage, filled with nulls.
    pub backfilled: Vec<Column>,
    /// Non-empty numeric cells that could not be parsed and became null.
    pub coerced_cells: usize,
}

impl SchemaRepair {
    /// True when the stored table already matched the schema.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.backfilled.is_empty() && self.coerced_cells == 0
    }
}

/// Ordered sequence of ticket sales, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    rows: Vec<TicketSale>,
}

impl Ledger {
    /// An empty ledger.
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<TicketSale>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TicketSale] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&TicketSale> {
        self.rows.last()
    }

    /// New ledger with `sale` appended at the end.
    pub fn with_appended(&self, sale: TicketSale) -> Self {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.extend_from_slice(&self.rows);
        rows.push(sale);
        Self { rows }
    }

    /// Build a ledger from a stored table, repairing the schema.
    ///
    /// Columns are matched by header. Unknown or repeated headers are
    /// dropped; schema columns that are missing read as null for every
    /// row. Rows shorter than the header read the missing cells as null.
    pub fn from_table(table: &RawTable) -> (Self, SchemaRepair) {
        let mut repair = SchemaRepair::default();
        let mut positions: HashMap<Column, usize> = HashMap::new();

        for (idx, header) in table.headers.iter().enumerate() {
            match Column::from_header(header) {
                Some(column) if !positions.contains_key(&column) => {
                    positions.insert(column, idx);
                }
                _ => repair.dropped.push(header.clone()),
            }
        }

        repair.backfilled = Column::ALL
            .into_iter()
            .filter(|c| !positions.contains_key(c))
            .collect();

        let rows = table
            .rows
            .iter()
            .map(|record| {
                let cell = |column: Column| {
                    positions
                        .get(&column)
                        .and_then(|&idx| record.get(idx))
                        .map(String::as_str)
                };
                TicketSale {
                    match_name: cell(Column::Match).unwrap_or_default().to_string(),
                    stand: cell(Column::Stand).unwrap_or_default().to_string(),
                    purchase_price: parse_decimal(cell(Column::PurchasePrice), &mut repair),
                    selling_price: parse_decimal(cell(Column::SellingPrice), &mut repair),
                    quantity: parse_quantity(cell(Column::Quantity), &mut repair),
                    profit: parse_decimal(cell(Column::Profit), &mut repair),
                }
            })
            .collect();

        (Self { rows }, repair)
    }

    /// Render the ledger as a table with the fixed header.
    pub fn to_table(&self) -> RawTable {
        let rows = self
            .rows
            .iter()
            .map(|sale| {
                vec![
                    sale.match_name.clone(),
                    sale.stand.clone(),
                    format_cell(sale.purchase_price),
                    format_cell(sale.selling_price),
                    format_cell(sale.quantity),
                    format_cell(sale.profit),
                ]
            })
            .collect();

        RawTable {
            headers: Column::headers(),
            rows,
        }
    }
}

fn format_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Empty cells are plain nulls; anything else that fails to parse is
/// counted as a coercion.
fn parse_decimal(cell: Option<&str>, repair: &mut SchemaRepair) -> Option<Decimal> {
    let raw = cell.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok();
    if parsed.is_none() {
        repair.coerced_cells += 1;
    }
    parsed
}

/// Accepts integral text such as `3` and float renderings such as `3.0`.
fn parse_quantity(cell: Option<&str>, repair: &mut SchemaRepair) -> Option<i64> {
    let raw = cell.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = raw.parse::<i64>().ok().or_else(|| {
        Decimal::from_str(raw)
            .ok()
            .filter(|d| d.fract().is_zero())
            .and_then(|d| d.to_i64())
    });
    if parsed.is_none() {
        repair.coerced_cells += 1;
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::NewTicket;
    use rust_decimal_macros::dec;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }

    const FULL: [&str; 6] = [
        "Match",
        "Stand",
        "Purchase Price",
        "Selling Price",
        "Quantity",
        "Profit",
    ];

    #[test]
    fn test_clean_table_reads_without_repair() {
        let t = table(&FULL, &[&["Match A", "Stand 1", "100", "150", "2", "100"]]);
        let (ledger, repair) = Ledger::from_table(&t);
        assert!(repair.is_clean());
        assert_eq!(ledger.len(), 1);
        let row = &ledger.rows()[0];
        assert_eq!(row.match_name, "Match A");
        assert_eq!(row.quantity, Some(2));
        assert_eq!(row.profit, Some(dec!(100)));
    }

    #[test]
    fn test_extra_column_is_dropped() {
        let t = table(
            &[
                "Match",
                "Stand",
                "Purchase Price",
                "Selling Price",
                "Quantity",
                "Profit",
                "Cumulative Profit",
            ],
            &[&["A", "1", "10", "20", "1", "10", "10"]],
        );
        let (ledger, repair) = Ledger::from_table(&t);
        assert_eq!(repair.dropped, vec!["Cumulative Profit".to_string()]);
        assert!(repair.backfilled.is_empty());
        assert_eq!(ledger.to_table().headers, Column::headers());
        assert_eq!(ledger.to_table().rows[0].len(), 6);
    }

    #[test]
    fn test_missing_column_is_backfilled_with_null() {
        let t = table(
            &["Match", "Stand", "Purchase Price", "Selling Price", "Quantity"],
            &[&["A", "1", "10", "20", "1"], &["B", "2", "5", "5", "3"]],
        );
        let (ledger, repair) = Ledger::from_table(&t);
        assert_eq!(repair.backfilled, vec![Column::Profit]);
        assert!(ledger.rows().iter().all(|r| r.profit.is_none()));
    }

    #[test]
    fn test_columns_reordered_to_schema_order() {
        let t = table(
            &["Profit", "Quantity", "Selling Price", "Purchase Price", "Stand", "Match"],
            &[&["-60", "3", "180", "200", "Stand 1", "Match B"]],
        );
        let (ledger, repair) = Ledger::from_table(&t);
        assert!(repair.is_clean());
        let row = &ledger.rows()[0];
        assert_eq!(row.match_name, "Match B");
        assert_eq!(row.purchase_price, Some(dec!(200)));
        assert_eq!(ledger.to_table().rows[0], vec![
            "Match B", "Stand 1", "200", "180", "3", "-60"
        ]);
    }

    #[test]
    fn test_duplicate_header_keeps_first() {
        let t = table(
            &["Match", "Match", "Stand", "Purchase Price", "Selling Price", "Quantity", "Profit"],
            &[&["first", "second", "S", "1", "2", "1", "1"]],
        );
        let (ledger, repair) = Ledger::from_table(&t);
        assert_eq!(repair.dropped, vec!["Match".to_string()]);
        assert_eq!(ledger.rows()[0].match_name, "first");
    }

    #[test]
    fn test_malformed_cells_become_null() {
        let t = table(&FULL, &[&["A", "1", "abc", "", "2.0", "1e2"]]);
        let (ledger, repair) = Ledger::from_table(&t);
        let row = &ledger.rows()[0];
        assert_eq!(row.purchase_price, None);
        assert_eq!(row.selling_price, None);
        assert_eq!(row.quantity, Some(2));
        assert_eq!(row.profit, Some(dec!(100)));
        assert_eq!(repair.coerced_cells, 1);
    }

    #[test]
    fn test_short_row_reads_missing_cells_as_null() {
        let t = table(&FULL, &[&["A", "1"]]);
        let (ledger, _) = Ledger::from_table(&t);
        let row = &ledger.rows()[0];
        assert_eq!(row.stand, "1");
        assert_eq!(row.purchase_price, None);
        assert_eq!(row.profit, None);
    }

    #[test]
    fn test_headerless_table_backfills_everything() {
        let (ledger, repair) = Ledger::from_table(&RawTable::default());
        assert!(ledger.is_empty());
        assert_eq!(repair.backfilled, Column::ALL.to_vec());
    }

    #[test]
    fn test_with_appended_keeps_prior_rows() {
        let first = NewTicket::new("A", "1", dec!(1), dec!(2), 1).into_sale().unwrap();
        let second = NewTicket::new("B", "2", dec!(3), dec!(1), 2).into_sale().unwrap();
        let before = Ledger::new().with_appended(first.clone());
        let after = before.with_appended(second.clone());
        assert_eq!(before.len(), 1);
        assert_eq!(after.rows(), &[first, second]);
    }

    #[test]
    fn test_to_table_renders_nulls_as_empty() {
        let ledger = Ledger::from_rows(vec![TicketSale {
            match_name: "A".into(),
            ..TicketSale::default()
        }]);
        assert_eq!(ledger.to_table().rows[0], vec!["A", "", "", "", "", ""]);
    }
}
