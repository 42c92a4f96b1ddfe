//! Domain layer - Ticket ledger model and profit summaries.
//!
//! Pure logic with no I/O (hexagonal architecture inner ring).
//! Storage lives behind `crate::ports::repository`.

pub mod error;
pub mod ledger;
pub mod summary;
pub mod ticket;

pub use error::{SummaryError, ValidationError};
pub use ledger::{Ledger, RawTable, SchemaRepair};
pub use summary::{LedgerSummary, MatchTotals};
pub use ticket::{Column, NewTicket, TicketSale};
