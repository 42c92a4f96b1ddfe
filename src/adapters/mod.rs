//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` and the
//! user-facing surfaces that drive the ledger store.
//!
//! Adapter categories:
//! - `cli`: clap command line front end
//! - `http`: axum JSON API with health probes
//! - `metrics`: Prometheus registry
//! - `persistence`: CSV ledger file

pub mod cli;
pub mod http;
pub mod metrics;
pub mod persistence;
