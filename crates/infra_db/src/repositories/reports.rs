//! Claim report repository
//!
//! Write-once storage of claim reports. The table name comes from
//! configuration, so queries are built at runtime after checking the name is
//! a plain identifier.

use sqlx::PgPool;

use core_kernel::config::is_sql_identifier;
use domain_claims::ClaimReportRecord;

use crate::error::DatabaseError;

/// Repository for the configured report table
#[derive(Debug, Clone)]
pub struct ClaimReportRepository {
    pool: PgPool,
    table: String,
}

impl ClaimReportRepository {
    /// Creates a repository over `table`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidIdentifier` if `table` is not a plain
    /// SQL identifier.
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, DatabaseError> {
        let table = table.into();
        if !is_sql_identifier(&table) {
            return Err(DatabaseError::InvalidIdentifier(table));
        }
        Ok(Self { pool, table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Inserts a report; an existing claim id is a duplicate
    pub async fn insert(&self, record: &ClaimReportRecord) -> Result<(), DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (claim_id, vin, policy_number, claim_date, image_url, damage_detected, fraud_detected) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
            self.table
        );

        let result = sqlx::query(&sql)
            .bind(&record.claim_id)
            .bind(&record.vin)
            .bind(&record.policy_number)
            .bind(&record.claim_date)
            .bind(&record.image_url)
            .bind(&record.damage_detected)
            .bind(&record.fraud_detected)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => match DatabaseError::from(&e) {
                DatabaseError::DuplicateEntry(_) => {
                    Err(DatabaseError::duplicate("ClaimReport", "claim_id", &record.claim_id))
                }
                other => Err(other),
            },
        }
    }

    /// Retrieves one report by claim id
    pub async fn get(&self, claim_id: &str) -> Result<ClaimReportRecord, DatabaseError> {
        let sql = format!("SELECT {} FROM {} WHERE claim_id = $1", REPORT_COLUMNS, self.table);
        sqlx::query_as::<_, ReportRow>(&sql)
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?
            .map(ClaimReportRecord::from)
            .ok_or_else(|| DatabaseError::not_found("ClaimReport", claim_id))
    }

    /// Full scan, oldest first
    pub async fn list_all(&self) -> Result<Vec<ClaimReportRecord>, DatabaseError> {
        let sql = format!("SELECT {} FROM {} ORDER BY created_at, claim_id", REPORT_COLUMNS, self.table);
        let rows = sqlx::query_as::<_, ReportRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(rows.into_iter().map(ClaimReportRecord::from).collect())
    }
}

const REPORT_COLUMNS: &str =
    "claim_id, vin, policy_number, claim_date, image_url, damage_detected, fraud_detected";

/// Database row for a claim report
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub claim_id: String,
    pub vin: String,
    pub policy_number: String,
    pub claim_date: String,
    pub image_url: String,
    pub damage_detected: String,
    pub fraud_detected: String,
}

impl From<ReportRow> for ClaimReportRecord {
    fn from(row: ReportRow) -> Self {
        ClaimReportRecord {
            claim_id: row.claim_id,
            vin: row.vin,
            policy_number: row.policy_number,
            claim_date: row.claim_date,
            image_url: row.image_url,
            damage_detected: row.damage_detected,
            fraud_detected: row.fraud_detected,
        }
    }
}
