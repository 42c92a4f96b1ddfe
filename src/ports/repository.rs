//! Repository Port - Ledger Table Persistence Interface
//!
//! The ledger is stored as one flat table. Adapters read and replace
//! that table as a whole; there are no partial updates.

use thiserror::Error;

use crate::domain::ledger::RawTable;

/// Storage-layer failure. Always fatal to the operation that hit it.
#[derive(Debug, Error)]
pub enum StorageError {
  /// Reading the stored table failed.
  #[error("failed to read ledger at {location}: {source}")]
  Read {
    location: String,
    #[source]
    source: std::io::Error,
  },
  /// Writing or replacing the stored table failed.
  #[error("failed to write ledger at {location}: {source}")]
  Write {
    location: String,
    #[source]
    source: std::io::Error,
  },
  /// Stored bytes are not a readable delimited table.
  #[error("malformed ledger at {location}: {message}")]
  Format { location: String, message: String },
}

/// Trait for ledger table storage.
///
/// Implementations must make `write_table` all-or-nothing: after a
/// failed write the previously stored table is still readable.
pub trait LedgerRepository: Send + 'static {
  /// Read the stored table. `Ok(None)` when nothing is stored yet.
  fn read_table(&self) -> Result<Option<RawTable>, StorageError>;

  /// Replace the stored table with `table`.
  fn write_table(&self, table: &RawTable) -> Result<(), StorageError>;

  /// Serialize `table` in the storage format, for download.
  fn encode_table(&self, table: &RawTable) -> Result<Vec<u8>, StorageError>;

  /// Human-readable location, used in logs and errors.
  fn location(&self) -> String;

  /// Whether the storage location is currently writable.
  fn is_healthy(&self) -> bool;
}
