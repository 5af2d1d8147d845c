//! PostgreSQL claim adapters
//!
//! Implement the claims domain's history and report ports on top of the
//! repositories in this crate.
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresHistoryAdapter, PostgresReportAdapter};
//! use std::sync::Arc;
//!
//! let history: Arc<dyn ClaimHistoryPort> = Arc::new(PostgresHistoryAdapter::new(pool.clone()));
//! let reports: Arc<dyn ClaimReportPort> = Arc::new(PostgresReportAdapter::new(pool, "claim_reports")?);
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError, Vin,
};
use domain_claims::{ClaimHistoryPort, ClaimReport, ClaimReportPort, ClaimReportRecord, HistoricalClaim};

use crate::error::DatabaseError;
use crate::repositories::{ClaimHistoryRepository, ClaimReportRepository, HistoryRow};

async fn ping(pool: &PgPool, adapter_id: &str, check_sql: &str) -> HealthCheckResult {
    let start = std::time::Instant::now();
    let result = sqlx::query_scalar::<_, i32>(check_sql).fetch_one(pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
    }
}

/// Succeeds only when the table exists and is readable
fn table_check_sql(table: &str) -> String {
    format!("SELECT COUNT(*)::INT4 FROM (SELECT 1 FROM {} LIMIT 1) AS sample", table)
}

/// History port backed by `claims_history`
#[derive(Debug, Clone)]
pub struct PostgresHistoryAdapter {
    repository: ClaimHistoryRepository,
    pool: PgPool,
}

impl PostgresHistoryAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimHistoryRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &ClaimHistoryRepository {
        &self.repository
    }
}

impl DomainPort for PostgresHistoryAdapter {}

#[async_trait]
impl HealthCheckable for PostgresHistoryAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres_history", &table_check_sql("claims_history")).await
    }
}

#[async_trait]
impl ClaimHistoryPort for PostgresHistoryAdapter {
    #[instrument(skip(self, _metadata), fields(vin = %vin))]
    async fn history_for_vin(
        &self,
        vin: &Vin,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<HistoricalClaim>, PortError> {
        let rows = self.repository.find_by_vin(vin.as_str()).await?;
        debug!(records = rows.len(), "Loaded claim history");
        Ok(rows.into_iter().map(row_to_historical).collect())
    }
}

fn row_to_historical(row: HistoryRow) -> HistoricalClaim {
    HistoricalClaim::new(row.vin, row.claim_date, row.damage_type.unwrap_or_default())
}

/// Report port backed by the configured report table
#[derive(Debug, Clone)]
pub struct PostgresReportAdapter {
    repository: ClaimReportRepository,
    pool: PgPool,
}

impl PostgresReportAdapter {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, DatabaseError> {
        Ok(Self {
            repository: ClaimReportRepository::new(pool.clone(), table)?,
            pool,
        })
    }

    pub fn repository(&self) -> &ClaimReportRepository {
        &self.repository
    }
}

impl DomainPort for PostgresReportAdapter {}

#[async_trait]
impl HealthCheckable for PostgresReportAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres_reports", &table_check_sql(self.repository.table())).await
    }
}

#[async_trait]
impl ClaimReportPort for PostgresReportAdapter {
    #[instrument(skip(self, report, _metadata), fields(claim_id = %report.claim_id))]
    async fn save_report(
        &self,
        report: &ClaimReport,
        _metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        let record = report
            .to_record()
            .map_err(|e| PortError::transformation(e.to_string()))?;
        self.repository.insert(&record).await?;
        debug!("Stored claim report");
        Ok(())
    }

    async fn list_reports(
        &self,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<ClaimReportRecord>, PortError> {
        Ok(self.repository.list_all().await?)
    }
}
