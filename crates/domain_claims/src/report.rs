//! Claim report assembly
//!
//! A [`ClaimReport`] is the single record persisted per submission. It is
//! created once and never updated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::damage::DamageAssessment;
use crate::error::ClaimError;
use crate::fraud::RiskAssessment;

/// Persisted result of processing one claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReport {
    pub claim_id: String,
    pub vin: String,
    pub policy_number: String,
    pub claim_date: NaiveDate,
    /// Durable URL of the damage photo, empty when the upload failed
    pub image_url: String,
    #[serde(rename = "damage_detected")]
    pub damage: DamageAssessment,
    #[serde(rename = "fraud_detected")]
    pub risk: RiskAssessment,
}

impl ClaimReport {
    /// Composes a report from the claim and the pipeline outputs
    ///
    /// Blank identifiers become `UNKNOWN`; a missing image reference becomes
    /// the empty string. Never fails.
    pub fn assemble(
        claim: &Claim,
        image_reference: Option<&str>,
        damage: DamageAssessment,
        risk: RiskAssessment,
    ) -> Self {
        Self {
            claim_id: claim.claim_id.or_unknown(),
            vin: claim.vin.or_unknown(),
            policy_number: claim.policy_number.or_unknown(),
            claim_date: claim.claim_date,
            image_url: image_reference.unwrap_or_default().to_string(),
            damage,
            risk,
        }
    }

    /// Flattens the report into its storage shape
    pub fn to_record(&self) -> Result<ClaimReportRecord, ClaimError> {
        Ok(ClaimReportRecord {
            claim_id: self.claim_id.clone(),
            vin: self.vin.clone(),
            policy_number: self.policy_number.clone(),
            claim_date: self.claim_date.to_string(),
            image_url: self.image_url.clone(),
            damage_detected: serde_json::to_string(&self.damage)?,
            fraud_detected: serde_json::to_string(&self.risk)?,
        })
    }

    /// Rebuilds a report from its storage shape
    pub fn from_record(record: &ClaimReportRecord) -> Result<Self, ClaimError> {
        let claim_date = record.claim_date.parse::<NaiveDate>().map_err(|e| {
            ClaimError::MalformedReport(format!(
                "claim {} has invalid date '{}': {}",
                record.claim_id, record.claim_date, e
            ))
        })?;

        Ok(Self {
            claim_id: record.claim_id.clone(),
            vin: record.vin.clone(),
            policy_number: record.policy_number.clone(),
            claim_date,
            image_url: record.image_url.clone(),
            damage: serde_json::from_str(&record.damage_detected)?,
            risk: serde_json::from_str(&record.fraud_detected)?,
        })
    }
}

/// Storage shape of a claim report
///
/// Every column is text; the nested assessments are JSON documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReportRecord {
    pub claim_id: String,
    pub vin: String,
    pub policy_number: String,
    pub claim_date: String,
    pub image_url: String,
    pub damage_detected: String,
    pub fraud_detected: String,
}
