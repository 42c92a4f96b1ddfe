//! Ticket sale rows and the fixed ledger schema.
//!
//! A `TicketSale` is one purchase/resale event. Rows produced by
//! `NewTicket::into_sale` are always fully populated; rows read back
//! from storage may carry nulls (`None`) where cells were empty or
//! unreadable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

// ────────────────────────────────────────────
// Schema
// ────────────────────────────────────────────

/// One column of the fixed ledger schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Match,
    Stand,
    PurchasePrice,
    SellingPrice,
    Quantity,
    Profit,
}

impl Column {
    /// Every column, in storage order.
    pub const ALL: [Self; 6] = [
        Self::Match,
        Self::Stand,
        Self::PurchasePrice,
        Self::SellingPrice,
        Self::Quantity,
        Self::Profit,
    ];

    /// Header label written to the ledger file.
    pub const fn header(self) -> &'static str {
        match self {
            Self::Match => "Match",
            Self::Stand => "Stand",
            Self::PurchasePrice => "Purchase Price",
            Self::SellingPrice => "Selling Price",
            Self::Quantity => "Quantity",
            Self::Profit => "Profit",
        }
    }

    /// Field name used by the JSON API.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Stand => "stand",
            Self::PurchasePrice => "purchase_price",
            Self::SellingPrice => "selling_price",
            Self::Quantity => "quantity",
            Self::Profit => "profit",
        }
    }

    /// Resolve a stored header. Accepts the header label or the field name.
    pub fn from_header(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.header() == raw || c.field_name() == raw)
    }

    /// Header row in storage order.
    pub fn headers() -> Vec<String> {
        Self::ALL.iter().map(|c| c.header().to_string()).collect()
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

// ────────────────────────────────────────────
// Input
// ────────────────────────────────────────────

/// Ticket data as entered by the user, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    /// Match label. May be empty.
    #[serde(rename = "match", default)]
    pub match_name: String,
    /// Stand label. May be empty.
    #[serde(default)]
    pub stand: String,
    /// Price paid per ticket.
    pub purchase_price: Decimal,
    /// Price received per ticket.
    pub selling_price: Decimal,
    /// Number of tickets.
    pub quantity: i64,
}

impl NewTicket {
    pub fn new(
        match_name: impl Into<String>,
        stand: impl Into<String>,
        purchase_price: Decimal,
        selling_price: Decimal,
        quantity: i64,
    ) -> Self {
        Self {
            match_name: match_name.into(),
            stand: stand.into(),
            purchase_price,
            selling_price,
            quantity,
        }
    }

    /// Check price and quantity bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.purchase_price.is_sign_negative() && !self.purchase_price.is_zero() {
            return Err(ValidationError::NegativePurchasePrice(self.purchase_price));
        }
        if self.selling_price.is_sign_negative() && !self.selling_price.is_zero() {
            return Err(ValidationError::NegativeSellingPrice(self.selling_price));
        }
        if self.quantity < 1 {
            return Err(ValidationError::NonPositiveQuantity(self.quantity));
        }
        Ok(())
    }

    /// `(selling_price - purchase_price) * quantity`, exact.
    pub fn profit(&self) -> Result<Decimal, ValidationError> {
        self.selling_price
            .checked_sub(self.purchase_price)
            .and_then(|margin| margin.checked_mul(Decimal::from(self.quantity)))
            .ok_or(ValidationError::ProfitOverflow)
    }

    /// Validate and produce the stored row with its derived profit.
    pub fn into_sale(self) -> Result<TicketSale, ValidationError> {
        self.validate()?;
        let profit = self.profit()?;
        Ok(TicketSale {
            match_name: self.match_name,
            stand: self.stand,
            purchase_price: Some(self.purchase_price),
            selling_price: Some(self.selling_price),
            quantity: Some(self.quantity),
            profit: Some(profit),
        })
    }
}

// ────────────────────────────────────────────
// Stored row
// ────────────────────────────────────────────

/// One ledger row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSale {
    #[serde(rename = "match")]
    pub match_name: String,
    pub stand: String,
    pub purchase_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub quantity: Option<i64>,
    pub profit: Option<Decimal>,
}

impl TicketSale {
    /// Profit, with null read as zero.
    pub fn profit_or_zero(&self) -> Decimal {
        self.profit.unwrap_or(Decimal::ZERO)
    }

    /// Selling price, with null read as zero.
    pub fn selling_price_or_zero(&self) -> Decimal {
        self.selling_price.unwrap_or(Decimal::ZERO)
    }
}
