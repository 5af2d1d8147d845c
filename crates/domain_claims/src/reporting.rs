//! Claim reporting
//!
//! Rebuilds tabular rows from persisted reports for the review dashboard,
//! filters them and computes the aggregates the dashboard charts.
//!
//! Row reconstruction is lenient about the stored JSON: a missing damage
//! type or severity reads as "Unknown", a missing score as 0. Records whose
//! nested JSON cannot be parsed at all are skipped with a warning.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use core_kernel::{OperationMetadata, PortError};

use crate::error::ClaimError;
use crate::ports::ClaimReportPort;
use crate::report::ClaimReportRecord;

/// Fraud column of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FraudFlag {
    Yes,
    No,
}

impl FraudFlag {
    pub fn from_suspected(suspected: bool) -> Self {
        if suspected { FraudFlag::Yes } else { FraudFlag::No }
    }
}

impl fmt::Display for FraudFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FraudFlag::Yes => f.write_str("Yes"),
            FraudFlag::No => f.write_str("No"),
        }
    }
}

impl std::str::FromStr for FraudFlag {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Ok(FraudFlag::Yes),
            "no" | "false" => Ok(FraudFlag::No),
            other => Err(ClaimError::InvalidSubmission(format!("unknown fraud status '{}'", other))),
        }
    }
}

/// One dashboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub claim_id: String,
    pub vin: String,
    pub policy: String,
    pub date: NaiveDate,
    pub damage_type: String,
    pub severity: String,
    pub risk_score: i64,
    pub fraud: FraudFlag,
}

impl ReportRow {
    /// Rebuilds a row from a stored record
    pub fn from_record(record: &ClaimReportRecord) -> Result<Self, ClaimError> {
        let damage: Value = serde_json::from_str(&record.damage_detected)?;
        let fraud: Value = serde_json::from_str(&record.fraud_detected)?;
        let date = record.claim_date.trim().parse::<NaiveDate>().map_err(|e| {
            ClaimError::MalformedReport(format!("invalid date '{}': {}", record.claim_date, e))
        })?;

        Ok(Self {
            claim_id: record.claim_id.clone(),
            vin: record.vin.clone(),
            policy: record.policy_number.clone(),
            date,
            damage_type: text_or_unknown(&damage, "damage_type"),
            severity: text_or_unknown(&damage, "severity"),
            risk_score: fraud.get("risk_score").and_then(Value::as_i64).unwrap_or(0),
            fraud: FraudFlag::from_suspected(fraud.get("is_fraud").and_then(Value::as_bool).unwrap_or(false)),
        })
    }
}

fn text_or_unknown(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string()
}

/// Rows rebuilt from storage plus the records that had to be skipped
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportTable {
    pub rows: Vec<ReportRow>,
    pub warnings: Vec<String>,
}

impl ReportTable {
    /// Rebuilds rows for every record, skipping the unreadable ones
    pub fn from_records(records: &[ClaimReportRecord]) -> Self {
        let mut table = ReportTable::default();
        for record in records {
            match ReportRow::from_record(record) {
                Ok(row) => table.rows.push(row),
                Err(e) => {
                    warn!(claim_id = %record.claim_id, error = %e, "Skipping unreadable claim report");
                    table.warnings.push(format!("Error parsing claim {}: {}", record.claim_id, e));
                }
            }
        }
        table
    }
}

/// Dashboard filters; empty selections match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub damage_types: Vec<String>,
    pub fraud: Vec<FraudFlag>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportFilter {
    pub fn matches(&self, row: &ReportRow) -> bool {
        (self.damage_types.is_empty() || self.damage_types.iter().any(|t| t == &row.damage_type))
            && (self.fraud.is_empty() || self.fraud.contains(&row.fraud))
            && self.from.map_or(true, |from| row.date >= from)
            && self.to.map_or(true, |to| row.date <= to)
    }

    pub fn apply<'a>(&self, rows: &'a [ReportRow]) -> Vec<&'a ReportRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

/// Fraud versus legitimate counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudBreakdown {
    pub suspected: usize,
    pub legitimate: usize,
}

/// Aggregates shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_claims: usize,
    pub by_damage_type: BTreeMap<String, usize>,
    pub fraud: FraudBreakdown,
    pub claims_by_date: BTreeMap<NaiveDate, usize>,
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

impl DashboardSummary {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a ReportRow>) -> Self {
        let mut summary = DashboardSummary::default();
        for row in rows {
            summary.total_claims += 1;
            *summary.by_damage_type.entry(row.damage_type.clone()).or_insert(0) += 1;
            *summary.claims_by_date.entry(row.date).or_insert(0) += 1;
            match row.fraud {
                FraudFlag::Yes => summary.fraud.suspected += 1,
                FraudFlag::No => summary.fraud.legitimate += 1,
            }
        }
        summary.earliest = summary.claims_by_date.keys().next().copied();
        summary.latest = summary.claims_by_date.keys().next_back().copied();
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.total_claims == 0
    }
}

/// Filtered rows, their aggregates and any skipped-record warnings
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub rows: Vec<ReportRow>,
    pub summary: DashboardSummary,
    pub warnings: Vec<String>,
}

/// Read side of the report store
#[derive(Clone)]
pub struct ReportQueryService {
    reports: Arc<dyn ClaimReportPort>,
}

impl ReportQueryService {
    pub fn new(reports: Arc<dyn ClaimReportPort>) -> Self {
        Self { reports }
    }

    /// Scans the store and applies the filter
    pub async fn dashboard(&self, filter: &ReportFilter) -> Result<DashboardView, PortError> {
        let metadata = OperationMetadata::default().with_context("view", "dashboard");
        let records = self.reports.list_reports(Some(metadata)).await?;
        let ReportTable { rows, warnings } = ReportTable::from_records(&records);

        let rows: Vec<ReportRow> = rows.into_iter().filter(|row| filter.matches(row)).collect();
        let summary = DashboardSummary::from_rows(&rows);
        Ok(DashboardView {
            rows,
            summary,
            warnings,
        })
    }
}
