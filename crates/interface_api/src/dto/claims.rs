//! Claims DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::SubmissionId;
use domain_claims::{
    Claim, ClaimReport, DamagePhoto, DashboardSummary, DashboardView, FraudFlag, ReportFilter,
    ReportRow, SubmissionOutcome,
};

use crate::error::ApiError;

/// Multipart claim submission, collected field by field
#[derive(Debug, Default, Validate)]
pub struct ClaimForm {
    #[validate(length(max = 64))]
    pub claim_id: String,
    #[validate(length(max = 32))]
    pub vin: String,
    #[validate(length(max = 64))]
    pub policy_number: String,
    /// `YYYY-MM-DD`; blank means today
    #[validate(length(max = 10))]
    pub claim_date: Option<String>,
    pub damage_photo: Option<UploadedPhoto>,
}

/// File part of the form
#[derive(Debug)]
pub struct UploadedPhoto {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ClaimForm {
    /// Builds the domain claim, defaulting a blank date to `today`
    pub fn into_claim(self, today: NaiveDate) -> Result<Claim, ApiError> {
        self.validate()?;

        let claim_date = match self.claim_date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(raw) => raw.parse::<NaiveDate>().map_err(|e| {
                ApiError::BadRequest(format!("claim_date '{}' is not a YYYY-MM-DD date: {}", raw, e))
            })?,
        };

        Ok(Claim {
            claim_id: self.claim_id.trim().into(),
            vin: self.vin.trim().into(),
            policy_number: self.policy_number.trim().into(),
            claim_date,
            damage_photo: self
                .damage_photo
                .map(|photo| DamagePhoto::new(photo.filename, photo.bytes)),
        })
    }
}

/// Response to an accepted submission
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub submission_id: SubmissionId,
    pub message: String,
    pub report: ClaimReport,
    pub image_stored: bool,
    pub persisted: bool,
    pub notified: bool,
    pub warnings: Vec<String>,
}

impl From<SubmissionOutcome> for SubmissionResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            submission_id: outcome.submission_id,
            message: outcome.message().to_string(),
            warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
            report: outcome.report,
            image_stored: outcome.image_stored,
            persisted: outcome.persisted,
            notified: outcome.notified,
        }
    }
}

/// Dashboard query string
///
/// `damage_type` and `fraud` take comma-separated lists, e.g.
/// `?damage_type=Hood,Windshield&fraud=Yes&from=2025-01-01`.
#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_date_range"))]
pub struct DashboardQuery {
    #[validate(length(max = 256))]
    pub damage_type: Option<String>,
    #[validate(length(max = 16))]
    pub fraud: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn validate_date_range(query: &DashboardQuery) -> Result<(), ValidationError> {
    match (query.from, query.to) {
        (Some(from), Some(to)) if from > to => {
            let mut err = ValidationError::new("date_range");
            err.message = Some("'from' must not be after 'to'".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl DashboardQuery {
    pub fn into_filter(self) -> Result<ReportFilter, ApiError> {
        self.validate()?;

        let fraud = split_list(self.fraud.as_deref())
            .map(|s| s.parse::<FraudFlag>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        Ok(ReportFilter {
            damage_types: split_list(self.damage_type.as_deref()).map(String::from).collect(),
            fraud,
            from: self.from,
            to: self.to,
        })
    }
}

/// Filtered dashboard rows
#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub total: usize,
    pub rows: Vec<ReportRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<DashboardView> for ReportListResponse {
    fn from(view: DashboardView) -> Self {
        Self {
            total: view.rows.len(),
            rows: view.rows,
            warnings: view.warnings,
        }
    }
}

/// Aggregates over the filtered rows
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: DashboardSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<DashboardView> for SummaryResponse {
    fn from(view: DashboardView) -> Self {
        Self {
            summary: view.summary,
            warnings: view.warnings,
        }
    }
}
