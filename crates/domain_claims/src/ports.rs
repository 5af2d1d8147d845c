//! Claims Domain Ports
//!
//! Port interfaces for every external collaborator of the intake pipeline.
//! Adapters live in the infrastructure crates:
//!
//! - **ClaimHistoryPort**: prior claims per VIN (PostgreSQL in `infra_db`)
//! - **ClaimReportPort**: write-once report storage and full scans for the
//!   dashboard (PostgreSQL in `infra_db`)
//! - **ImageStorePort**: durable photo storage (`infra_external`)
//! - **NotificationPort**: reviewer email (`infra_external`)
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::ports::ClaimHistoryPort;
//! use std::sync::Arc;
//!
//! let history: Arc<dyn ClaimHistoryPort> = Arc::new(PostgresHistoryAdapter::new(pool));
//! let prior = history.history_for_vin(&vin, None).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, OperationMetadata, PortError, Vin};

use crate::fraud::HistoricalClaim;
use crate::notification::ReviewNotification;
use crate::report::{ClaimReport, ClaimReportRecord};

/// Read-only access to prior claims
#[async_trait]
pub trait ClaimHistoryPort: DomainPort + HealthCheckable {
    /// Returns all recorded claims for a vehicle, in no particular order
    async fn history_for_vin(
        &self,
        vin: &Vin,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<HistoricalClaim>, PortError>;
}

/// Write-once storage of claim reports
#[async_trait]
pub trait ClaimReportPort: DomainPort + HealthCheckable {
    /// Stores a report keyed by its claim id
    ///
    /// Returns `PortError::Conflict` if a report with the same claim id exists.
    async fn save_report(
        &self,
        report: &ClaimReport,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;

    /// Scans every stored report in its storage shape
    async fn list_reports(
        &self,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<ClaimReportRecord>, PortError>;
}

/// Durable storage of damage photos
#[async_trait]
pub trait ImageStorePort: DomainPort {
    /// Stores the bytes under the filename and returns a durable URL
    async fn store_image(
        &self,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
        metadata: Option<OperationMetadata>,
    ) -> Result<String, PortError>;
}

/// Outbound reviewer notifications
#[async_trait]
pub trait NotificationPort: DomainPort {
    /// Attempts delivery once
    async fn send(
        &self,
        notification: &ReviewNotification,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;
}

/// In-memory port implementations for tests and local runs
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    fn mock_health(adapter_id: &str) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: Some("Mock adapter always healthy".to_string()),
            checked_at: chrono::Utc::now(),
        }
    }

    /// History store backed by a vector
    #[derive(Debug, Default)]
    pub struct InMemoryHistory {
        records: RwLock<Vec<HistoricalClaim>>,
        unavailable: AtomicBool,
    }

    impl InMemoryHistory {
        pub fn new(records: Vec<HistoricalClaim>) -> Self {
            Self {
                records: RwLock::new(records),
                unavailable: AtomicBool::new(false),
            }
        }

        /// Makes every read fail with a connection error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub async fn push(&self, record: HistoricalClaim) {
            self.records.write().await.push(record);
        }
    }

    impl DomainPort for InMemoryHistory {}

    #[async_trait]
    impl HealthCheckable for InMemoryHistory {
        async fn health_check(&self) -> HealthCheckResult {
            if self.unavailable.load(Ordering::SeqCst) {
                return HealthCheckResult::unhealthy("mock_history", 0, "history store unavailable");
            }
            mock_health("mock_history")
        }
    }

    #[async_trait]
    impl ClaimHistoryPort for InMemoryHistory {
        async fn history_for_vin(
            &self,
            vin: &Vin,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<HistoricalClaim>, PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("history store unavailable"));
            }
            Ok(self
                .records
                .read()
                .await
                .iter()
                .filter(|r| &r.vin == vin)
                .cloned()
                .collect())
        }
    }

    /// Report store backed by a map
    #[derive(Debug, Default)]
    pub struct InMemoryReportStore {
        reports: RwLock<BTreeMap<String, ClaimReportRecord>>,
        failing: AtomicBool,
    }

    impl InMemoryReportStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every write fail
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Inserts a raw record, bypassing report serialization
        pub async fn insert_record(&self, record: ClaimReportRecord) {
            self.reports.write().await.insert(record.claim_id.clone(), record);
        }

        pub async fn len(&self) -> usize {
            self.reports.read().await.len()
        }

        pub async fn get(&self, claim_id: &str) -> Option<ClaimReportRecord> {
            self.reports.read().await.get(claim_id).cloned()
        }
    }

    impl DomainPort for InMemoryReportStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryReportStore {
        async fn health_check(&self) -> HealthCheckResult {
            mock_health("mock_reports")
        }
    }

    #[async_trait]
    impl ClaimReportPort for InMemoryReportStore {
        async fn save_report(
            &self,
            report: &ClaimReport,
            _metadata: Option<OperationMetadata>,
        ) -> Result<(), PortError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::ServiceUnavailable {
                    service: "report store".to_string(),
                });
            }
            let record = report
                .to_record()
                .map_err(|e| PortError::transformation(e.to_string()))?;

            let mut reports = self.reports.write().await;
            if reports.contains_key(&record.claim_id) {
                return Err(PortError::conflict(format!("claim {} already stored", record.claim_id)));
            }
            reports.insert(record.claim_id.clone(), record);
            Ok(())
        }

        async fn list_reports(
            &self,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<ClaimReportRecord>, PortError> {
            Ok(self.reports.read().await.values().cloned().collect())
        }
    }

    /// Image store that keeps uploads in memory and returns fake URLs
    #[derive(Debug, Default)]
    pub struct InMemoryImageStore {
        images: RwLock<BTreeMap<String, Vec<u8>>>,
        failing: AtomicBool,
    }

    impl InMemoryImageStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub async fn get(&self, filename: &str) -> Option<Vec<u8>> {
            self.images.read().await.get(filename).cloned()
        }
    }

    impl DomainPort for InMemoryImageStore {}

    #[async_trait]
    impl ImageStorePort for InMemoryImageStore {
        async fn store_image(
            &self,
            bytes: &[u8],
            filename: &str,
            _content_type: &str,
            _metadata: Option<OperationMetadata>,
        ) -> Result<String, PortError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("image store unavailable"));
            }
            self.images.write().await.insert(filename.to_string(), bytes.to_vec());
            Ok(format!("memory://images/{}", filename))
        }
    }

    /// Notifier that records every message it is asked to send
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        sent: RwLock<Vec<ReviewNotification>>,
        attempts: AtomicUsize,
        failing: AtomicBool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Number of delivery attempts, successful or not
        pub fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }

        pub async fn sent(&self) -> Vec<ReviewNotification> {
            self.sent.read().await.clone()
        }
    }

    impl DomainPort for RecordingNotifier {}

    #[async_trait]
    impl NotificationPort for RecordingNotifier {
        async fn send(
            &self,
            notification: &ReviewNotification,
            _metadata: Option<OperationMetadata>,
        ) -> Result<(), PortError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("smtp relay unreachable"));
            }
            self.sent.write().await.push(notification.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::{InMemoryHistory, InMemoryReportStore};
    use chrono::NaiveDate;

    use crate::damage::DamageAssessment;
    use crate::fraud::RiskAssessment;

    fn report(claim_id: &str) -> ClaimReport {
        ClaimReport {
            claim_id: claim_id.to_string(),
            vin: "VIN1".to_string(),
            policy_number: "P-1".to_string(),
            claim_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            image_url: String::new(),
            damage: DamageAssessment::unknown(),
            risk: RiskAssessment::clean(),
        }
    }

    #[tokio::test]
    async fn test_mock_history_filters_by_vin() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let history = InMemoryHistory::new(vec![
            HistoricalClaim::new("VIN1", date, "Hood"),
            HistoricalClaim::new("VIN2", date, "Hood"),
        ]);

        let found = history.history_for_vin(&Vin::new("VIN1"), None).await.unwrap();
        assert_eq!(found.len(), 1);

        history.set_unavailable(true);
        assert!(history.history_for_vin(&Vin::new("VIN1"), None).await.unwrap_err().is_transient());
    }

    #[tokio::test]
    async fn test_mock_report_store_is_write_once() {
        let store = InMemoryReportStore::new();
        store.save_report(&report("CLM1"), None).await.unwrap();

        let err = store.save_report(&report("CLM1"), None).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));
        assert_eq!(store.list_reports(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let store = InMemoryReportStore::new();
        assert!(store.health_check().await.is_healthy());
    }
}
