//! Persistence Adapters - CSV File Storage
//!
//! Implements the `LedgerRepository` port with a single CSV file,
//! replaced atomically on every write. No database dependency.

pub mod csv_file;

pub use csv_file::CsvLedgerFile;
