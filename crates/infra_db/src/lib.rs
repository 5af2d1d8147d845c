//! Infrastructure Database Layer
//!
//! PostgreSQL storage for the claim intake system using SQLx:
//!
//! - `claims_history`: prior claims per VIN, read by the fraud scorer
//! - the report table (default `claim_reports`): one write-once row per
//!   processed submission, scanned by the dashboard
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, apply_schema, DatabaseConfig, PostgresReportAdapter};
//!
//! let pool = create_pool(&DatabaseConfig::new("postgres://localhost/claims")).await?;
//! apply_schema(&pool).await?;
//! let reports = PostgresReportAdapter::new(pool, "claim_reports")?;
//! ```

pub mod pool;
pub mod error;
pub mod schema;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::DatabaseError;
pub use schema::{apply_schema, ensure_report_table};
pub use adapters::{PostgresHistoryAdapter, PostgresReportAdapter};
