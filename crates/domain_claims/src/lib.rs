//! Claim Intake Domain
//!
//! This crate implements the intake of vehicle damage claims: photo
//! validation, damage classification, fraud risk scoring against prior
//! claims for the same vehicle, report assembly and reviewer notification.
//!
//! # Submission Flow
//!
//! ```text
//! Claim -> Photo stored -> Damage classified -> Risk scored -> Report saved -> Reviewer notified
//! ```
//!
//! External collaborators sit behind the traits in [`ports`]; in-memory
//! doubles are available under the `mock` feature.

pub mod claim;
pub mod damage;
pub mod fraud;
pub mod report;
pub mod notification;
pub mod reporting;
pub mod ports;
pub mod intake;
pub mod error;

pub use claim::{Claim, DamagePhoto, ACCEPTED_PHOTO_EXTENSIONS};
pub use damage::{DamageAssessment, DamageClassifier, DamageType, FixedDamageClassifier, RandomDamageClassifier, Severity};
pub use fraud::{HistoricalClaim, RiskAssessment, RiskRule, RiskScorer, ScoringPolicy, FRAUD_THRESHOLD, MAX_SCORE};
pub use report::{ClaimReport, ClaimReportRecord};
pub use notification::ReviewNotification;
pub use reporting::{DashboardSummary, DashboardView, FraudBreakdown, FraudFlag, ReportFilter, ReportQueryService, ReportRow, ReportTable};
pub use ports::{ClaimHistoryPort, ClaimReportPort, ImageStorePort, NotificationPort};
pub use intake::{ClaimIntakeService, IntakePorts, SubmissionOutcome, SubmissionWarning, ACCEPTED_MESSAGE};
pub use error::ClaimError;
