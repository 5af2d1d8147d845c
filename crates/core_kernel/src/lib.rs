//! Core Kernel - Foundational types for the claim intake system
//!
//! This crate provides the building blocks shared by the domain and
//! infrastructure crates:
//! - Typed identifiers for claims, vehicles and policies
//! - Port error and health types for the ports-and-adapters layout
//! - A clock abstraction for date-window rules
//! - The explicit sink configuration

pub mod identifiers;
pub mod ports;
pub mod clock;
pub mod config;
pub mod error;

pub use identifiers::{ClaimId, Vin, PolicyNumber, SubmissionId, UNKNOWN};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
    OperationMetadata,
};
pub use clock::{Clock, SystemClock, FixedClock, start_of_day};
pub use config::SinkConfig;
pub use error::CoreError;
