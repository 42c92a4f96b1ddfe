//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `ticket-ledger.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::AppConfig;

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "ticket-ledger.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  debug!(path = %path.display(), "Configuration loaded");
  Ok(config)
}

/// Load an explicitly requested config, or the default file if present.
///
/// A missing explicit file is an error; a missing default file yields
/// `AppConfig::default()`.
pub fn load_or_default(explicit: Option<&str>) -> Result<AppConfig> {
  match explicit {
    Some(path) => load_config(path),
    None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
    None => Ok(AppConfig::default()),
  }
}

/// Parse and validate TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.ledger.path.trim().is_empty(),
    "ledger.path must not be empty"
  );

  config
    .server
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| {
      format!(
        "server.bind_address is not a socket address: {}",
        config.server.bind_address
      )
    })?;

  // Env-filter directives (e.g. "ticket_ledger=debug") are accepted too.
  let level = config.logging.log_level.to_ascii_lowercase();
  anyhow::ensure!(
    LOG_LEVELS.contains(&level.as_str()) || level.contains('='),
    "logging.log_level must be one of {:?}, got {}",
    LOG_LEVELS,
    config.logging.log_level
  );

  Ok(())
}
