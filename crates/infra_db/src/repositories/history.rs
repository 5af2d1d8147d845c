//! Claim history repository
//!
//! Prior claims keyed by VIN. The intake pipeline only reads this table;
//! rows are loaded by back-office imports (and by tests through `record`).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::error::DatabaseError;

/// Repository for the `claims_history` table
#[derive(Debug, Clone)]
pub struct ClaimHistoryRepository {
    pool: PgPool,
}

impl ClaimHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves every prior claim for a vehicle
    pub async fn find_by_vin(&self, vin: &str) -> Result<Vec<HistoryRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT history_id, vin, claim_date, damage_type, recorded_at
            FROM claims_history
            WHERE vin = $1
            ORDER BY claim_date DESC
            "#,
        )
        .bind(vin)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(rows)
    }

    /// Appends a prior claim
    pub async fn record(&self, entry: NewHistoryEntry) -> Result<HistoryRow, DatabaseError> {
        let row = sqlx::query_as::<_, HistoryRow>(
            r#"
            INSERT INTO claims_history (vin, claim_date, damage_type)
            VALUES ($1, $2, $3)
            RETURNING history_id, vin, claim_date, damage_type, recorded_at
            "#,
        )
        .bind(&entry.vin)
        .bind(entry.claim_date)
        .bind(&entry.damage_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(row)
    }
}

/// Database row for a prior claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryRow {
    pub history_id: i64,
    pub vin: String,
    pub claim_date: NaiveDate,
    pub damage_type: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Data for appending a prior claim
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub vin: String,
    pub claim_date: NaiveDate,
    pub damage_type: Option<String>,
}
