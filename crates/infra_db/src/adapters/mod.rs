//! Domain Adapters
//!
//! PostgreSQL implementations of the claims domain's storage ports.

pub mod claims;

pub use claims::{PostgresHistoryAdapter, PostgresReportAdapter};
