//! Repository implementations
//!
//! Repositories encapsulate SQL and map between database rows and the
//! storage shapes of the claims domain. Queries are runtime-checked
//! (`query_as` with `FromRow` rows) because the report table name is
//! configurable.

pub mod history;
pub mod reports;

pub use history::{ClaimHistoryRepository, HistoryRow, NewHistoryEntry};
pub use reports::{ClaimReportRepository, ReportRow};
