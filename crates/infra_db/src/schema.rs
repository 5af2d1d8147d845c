//! Schema setup
//!
//! The bundled migration creates the history table and the default report
//! table. A report table configured under another name is created on demand
//! with the same columns.

use sqlx::PgPool;
use tracing::info;

use core_kernel::config::is_sql_identifier;

use crate::error::DatabaseError;

/// Initial schema shipped with the service
pub const INITIAL_SCHEMA: &str = include_str!("../../../migrations/20250101_000001_claims_schema.sql");

/// Applies the bundled schema; every statement is idempotent
pub async fn apply_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::raw_sql(INITIAL_SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    info!("Database schema applied");
    Ok(())
}

/// Creates the report table under a configured name if it does not exist
pub async fn ensure_report_table(pool: &PgPool, table: &str) -> Result<(), DatabaseError> {
    let sql = report_table_ddl(table)?;
    sqlx::raw_sql(&sql)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    Ok(())
}

fn report_table_ddl(table: &str) -> Result<String, DatabaseError> {
    if !is_sql_identifier(table) {
        return Err(DatabaseError::InvalidIdentifier(table.to_string()));
    }
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            claim_id         TEXT PRIMARY KEY,
            vin              TEXT NOT NULL,
            policy_number    TEXT NOT NULL,
            claim_date       TEXT NOT NULL,
            image_url        TEXT NOT NULL DEFAULT '',
            damage_detected  TEXT NOT NULL,
            fraud_detected   TEXT NOT NULL,
            created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
    ))
}
