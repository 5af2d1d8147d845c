//! Test Utilities Crate
//!
//! Shared test infrastructure for the claim intake workspace.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built claims, histories, stored reports and settings
//! - `builders`: Builders for claims, histories and in-memory intake services
//! - `database`: PostgreSQL testcontainer with the claims schema
//! - `assertions`: Assertion helpers for risk assessments and outcomes
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
