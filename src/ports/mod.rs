//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `LedgerRepository`: Ledger table persistence (CSV file)

pub mod repository;

pub use repository::{LedgerRepository, StorageError};
