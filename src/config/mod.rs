//! Configuration Module - TOML-based Tracker Configuration
//!
//! Loads and validates configuration from `ticket-ledger.toml`.
//! Every field has a default, so an absent default config file is
//! equivalent to an empty one.

pub mod loader;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Ledger file and display settings.
  pub ledger: LedgerConfig,
  /// HTTP API settings.
  pub server: ServerConfig,
  /// Logging settings.
  pub logging: LoggingConfig,
}

/// Ledger file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
  /// Path to the ledger CSV file.
  pub path: String,
  /// Symbol prefixed to amounts in human-readable output.
  pub currency_symbol: String,
}

/// HTTP API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  /// Bind address for the API, health and metrics routes.
  pub bind_address: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
  /// Emit JSON lines instead of human-readable output.
  pub json: bool,
}

impl Default for LedgerConfig {
  fn default() -> Self {
    Self {
      path: default_ledger_path(),
      currency_symbol: "₹".to_string(),
    }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: "127.0.0.1:8501".to_string(),
    }
  }
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      log_level: "info".to_string(),
      json: false,
    }
  }
}

fn default_ledger_path() -> String {
  "tickets.csv".to_string()
}
