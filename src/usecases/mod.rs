//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces.
//!
//! Use cases:
//! - `LedgerStore`: load/append/reset cycle over a `LedgerRepository`

pub mod ledger_store;

pub use ledger_store::{LedgerError, LedgerStore};
