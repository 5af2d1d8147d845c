//! Claim intake pipeline
//!
//! Runs one submission start to finish:
//!
//! ```text
//! validate -> store photo -> classify -> load history -> score
//!          -> assemble report -> persist + notify
//! ```
//!
//! Only validation can reject a submission. Every later step that talks to an
//! external collaborator is best-effort: a failure is logged, recorded as a
//! [`SubmissionWarning`], and the pipeline carries on. Persistence and
//! notification are independent; there is no transaction spanning both and
//! nothing is retried.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use core_kernel::{OperationMetadata, SinkConfig, SubmissionId};

use crate::claim::Claim;
use crate::damage::{DamageAssessment, DamageClassifier};
use crate::error::ClaimError;
use crate::fraud::RiskScorer;
use crate::notification::ReviewNotification;
use crate::ports::{ClaimHistoryPort, ClaimReportPort, ImageStorePort, NotificationPort};
use crate::report::ClaimReport;

/// Message shown to the submitter once a claim is accepted
pub const ACCEPTED_MESSAGE: &str = "Claim submitted";

/// Non-fatal problem encountered while processing a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", content = "message", rename_all = "snake_case")]
pub enum SubmissionWarning {
    ImageUpload(String),
    Classification(String),
    HistoryUnavailable(String),
    Persistence(String),
    Notification(String),
}

impl fmt::Display for SubmissionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionWarning::ImageUpload(e) => write!(f, "Failed to store damage photo: {}", e),
            SubmissionWarning::Classification(e) => write!(f, "Damage classification failed, recorded as Unknown: {}", e),
            SubmissionWarning::HistoryUnavailable(e) => write!(f, "Claim history unavailable, scored without history: {}", e),
            SubmissionWarning::Persistence(e) => write!(f, "Failed to save claim report: {}", e),
            SubmissionWarning::Notification(e) => write!(f, "Failed to notify reviewer: {}", e),
        }
    }
}

/// Result of an accepted submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub submission_id: SubmissionId,
    pub report: ClaimReport,
    pub image_stored: bool,
    pub persisted: bool,
    pub notified: bool,
    pub warnings: Vec<SubmissionWarning>,
}

impl SubmissionOutcome {
    pub fn message(&self) -> &'static str {
        ACCEPTED_MESSAGE
    }

    /// True when every side effect succeeded
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// External collaborators of the pipeline
#[derive(Clone)]
pub struct IntakePorts {
    pub history: Arc<dyn ClaimHistoryPort>,
    pub reports: Arc<dyn ClaimReportPort>,
    pub images: Arc<dyn ImageStorePort>,
    pub notifier: Arc<dyn NotificationPort>,
}

/// Processes claim submissions
#[derive(Clone)]
pub struct ClaimIntakeService {
    classifier: Arc<dyn DamageClassifier>,
    scorer: RiskScorer,
    ports: IntakePorts,
    sinks: SinkConfig,
}

impl ClaimIntakeService {
    pub fn new(
        classifier: Arc<dyn DamageClassifier>,
        scorer: RiskScorer,
        ports: IntakePorts,
        sinks: SinkConfig,
    ) -> Self {
        Self {
            classifier,
            scorer,
            ports,
            sinks,
        }
    }

    pub fn sinks(&self) -> &SinkConfig {
        &self.sinks
    }

    /// Processes one submission
    ///
    /// # Errors
    ///
    /// Only input validation errors are returned; they are raised before any
    /// external call is made.
    pub async fn submit(&self, claim: Claim) -> Result<SubmissionOutcome, ClaimError> {
        let photo = claim.validate()?;

        let submission_id = SubmissionId::new_v7();
        let metadata = OperationMetadata::for_submission(submission_id)
            .with_context("claim_id", claim.claim_id.as_str());
        let mut warnings = Vec::new();

        info!(
            %submission_id,
            claim_id = %claim.claim_id,
            vin = %claim.vin,
            photo_bytes = photo.len(),
            "Processing claim submission"
        );

        let image_url = match self
            .ports
            .images
            .store_image(&photo.bytes, &photo.filename, photo.content_type(), Some(metadata.clone()))
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(%submission_id, claim_id = %claim.claim_id, error = %e, "Photo upload failed");
                warnings.push(SubmissionWarning::ImageUpload(e.to_string()));
                None
            }
        };

        let damage = match self.classifier.classify(photo) {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!(
                    %submission_id,
                    claim_id = %claim.claim_id,
                    classifier = self.classifier.name(),
                    error = %e,
                    "Classification failed, using fallback"
                );
                warnings.push(SubmissionWarning::Classification(e.to_string()));
                DamageAssessment::unknown()
            }
        };

        // Read once; the new claim is not added to history here
        let history = match self
            .ports
            .history
            .history_for_vin(&claim.vin, Some(metadata.clone()))
            .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!(%submission_id, claim_id = %claim.claim_id, error = %e, "History store unavailable");
                warnings.push(SubmissionWarning::HistoryUnavailable(e.to_string()));
                Vec::new()
            }
        };

        let risk = self.scorer.score(&claim, damage.damage_type, &history);
        let report = ClaimReport::assemble(&claim, image_url.as_deref(), damage, risk);

        let persisted = match self.ports.reports.save_report(&report, Some(metadata.clone())).await {
            Ok(()) => true,
            Err(e) => {
                warn!(%submission_id, claim_id = %claim.claim_id, error = %e, "Report persistence failed");
                warnings.push(SubmissionWarning::Persistence(e.to_string()));
                false
            }
        };

        let notification = ReviewNotification::for_report(
            &report,
            self.sinks.sender_address.as_str(),
            self.sinks.recipient_address.as_str(),
        );
        let notified = match self.ports.notifier.send(&notification, Some(metadata)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(%submission_id, claim_id = %claim.claim_id, error = %e, "Reviewer notification failed");
                warnings.push(SubmissionWarning::Notification(e.to_string()));
                false
            }
        };

        info!(
            %submission_id,
            claim_id = %report.claim_id,
            damage = %report.damage,
            risk_score = report.risk.score(),
            fraud_suspected = report.risk.is_fraud_suspected(),
            persisted,
            notified,
            warnings = warnings.len(),
            "Claim submitted"
        );

        Ok(SubmissionOutcome {
            submission_id,
            report,
            image_stored: image_url.is_some(),
            persisted,
            notified,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use core_kernel::FixedClock;

    use crate::claim::DamagePhoto;
    use crate::damage::{DamageType, FixedDamageClassifier, RandomDamageClassifier, Severity};
    use crate::fraud::HistoricalClaim;
    use crate::ports::mock::{InMemoryHistory, InMemoryImageStore, InMemoryReportStore, RecordingNotifier};

    const VIN: &str = "1HGCM82633A004352";

    struct FailingClassifier;

    impl DamageClassifier for FailingClassifier {
        fn name(&self) -> &str {
            "failing"
        }

        fn classify(&self, _photo: &DamagePhoto) -> Result<DamageAssessment, ClaimError> {
            Err(ClaimError::Classification("model offline".to_string()))
        }
    }

    struct Harness {
        history: Arc<InMemoryHistory>,
        reports: Arc<InMemoryReportStore>,
        images: Arc<InMemoryImageStore>,
        notifier: Arc<RecordingNotifier>,
    }

    impl Harness {
        fn new(history: Vec<HistoricalClaim>) -> Self {
            Self {
                history: Arc::new(InMemoryHistory::new(history)),
                reports: Arc::new(InMemoryReportStore::new()),
                images: Arc::new(InMemoryImageStore::new()),
                notifier: Arc::new(RecordingNotifier::new()),
            }
        }

        fn service(&self, classifier: Arc<dyn DamageClassifier>) -> ClaimIntakeService {
            let ports = IntakePorts {
                history: self.history.clone(),
                reports: self.reports.clone(),
                images: self.images.clone(),
                notifier: self.notifier.clone(),
            };
            let scorer = RiskScorer::with_clock(Arc::new(FixedClock::new(now())));
            ClaimIntakeService::new(classifier, scorer, ports, SinkConfig::default())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> NaiveDate {
        now().date_naive() - Duration::days(days)
    }

    fn hood() -> Arc<dyn DamageClassifier> {
        Arc::new(FixedDamageClassifier(DamageAssessment::new(DamageType::Hood, Severity::Moderate)))
    }

    fn claim() -> Claim {
        Claim::new("CLM999", VIN, "P-123456789", now().date_naive(), DamagePhoto::new("dent.jpg", vec![0xFF, 0xD8]))
    }

    #[tokio::test]
    async fn test_clean_submission() {
        let harness = Harness::new(vec![]);
        let outcome = harness.service(hood()).submit(claim()).await.unwrap();

        assert!(outcome.is_clean());
        assert!(outcome.image_stored && outcome.persisted && outcome.notified);
        assert_eq!(outcome.report.risk.score(), 0);
        assert_eq!(outcome.report.image_url, "memory://images/dent.jpg");
        assert_eq!(outcome.message(), "Claim submitted");

        let stored = harness.reports.get("CLM999").await.unwrap();
        assert_eq!(ClaimReport::from_record(&stored).unwrap(), outcome.report);

        let sent = harness.notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Claim Report for CLM999");
        assert_eq!(sent[0].recipient, SinkConfig::default().recipient_address);
        assert_eq!(harness.images.get("dent.jpg").await, Some(vec![0xFF, 0xD8]));
    }

    #[tokio::test]
    async fn test_suspicious_history_is_flagged() {
        let harness = Harness::new(vec![
            HistoricalClaim::new(VIN, days_ago(30), "Hood"),
            HistoricalClaim::new(VIN, days_ago(90), "Left Door"),
            HistoricalClaim::new("OTHER", days_ago(5), "Hood"),
        ]);
        let outcome = harness.service(hood()).submit(claim()).await.unwrap();

        assert_eq!(outcome.report.risk.score(), 95);
        assert!(outcome.report.risk.is_fraud_suspected());
        assert_eq!(outcome.report.risk.reasons().len(), 3);
        assert!(harness.notifier.sent().await[0].body.contains("Risk Score: 95"));
    }

    #[tokio::test]
    async fn test_missing_photo_rejected_before_side_effects() {
        let harness = Harness::new(vec![]);
        let mut claim = claim();
        claim.damage_photo = None;

        let err = harness.service(hood()).submit(claim).await.unwrap_err();
        assert!(matches!(err, ClaimError::MissingPhoto));
        assert_eq!(harness.reports.len().await, 0);
        assert_eq!(harness.notifier.attempts(), 0);
        assert_eq!(harness.images.get("dent.jpg").await, None);
    }

    #[tokio::test]
    async fn test_persistence_failure_still_notifies() {
        let harness = Harness::new(vec![]);
        harness.reports.set_failing(true);

        let outcome = harness.service(hood()).submit(claim()).await.unwrap();
        assert!(!outcome.persisted);
        assert!(outcome.notified);
        assert_eq!(harness.notifier.attempts(), 1);
        assert!(matches!(outcome.warnings.as_slice(), [SubmissionWarning::Persistence(_)]));
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_report() {
        let harness = Harness::new(vec![]);
        harness.notifier.set_failing(true);

        let outcome = harness.service(hood()).submit(claim()).await.unwrap();
        assert!(outcome.persisted);
        assert!(!outcome.notified);
        assert_eq!(harness.reports.len().await, 1);
        assert!(matches!(outcome.warnings.as_slice(), [SubmissionWarning::Notification(_)]));
    }

    #[tokio::test]
    async fn test_image_failure_leaves_empty_url() {
        let harness = Harness::new(vec![]);
        harness.images.set_failing(true);

        let outcome = harness.service(hood()).submit(claim()).await.unwrap();
        assert!(!outcome.image_stored);
        assert_eq!(outcome.report.image_url, "");
        assert!(outcome.persisted);
    }

    #[tokio::test]
    async fn test_history_outage_scores_zero() {
        let harness = Harness::new(vec![HistoricalClaim::new(VIN, days_ago(3), "Hood")]);
        harness.history.set_unavailable(true);

        let outcome = harness.service(hood()).submit(claim()).await.unwrap();
        assert_eq!(outcome.report.risk.score(), 0);
        assert!(matches!(outcome.warnings.as_slice(), [SubmissionWarning::HistoryUnavailable(_)]));
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_to_unknown() {
        let harness = Harness::new(vec![HistoricalClaim::new(VIN, days_ago(3), "Hood")]);

        let outcome = harness.service(Arc::new(FailingClassifier)).submit(claim()).await.unwrap();
        assert!(outcome.report.damage.is_unknown());
        assert_eq!(outcome.report.risk.score(), 30);
        assert!(matches!(outcome.warnings.as_slice(), [SubmissionWarning::Classification(_)]));
    }

    #[tokio::test]
    async fn test_history_is_not_refreshed_with_new_claims() {
        let harness = Harness::new(vec![]);
        let service = harness.service(hood());

        service.submit(claim()).await.unwrap();
        let mut second = claim();
        second.claim_id = "CLM1000".into();
        let outcome = service.submit(second).await.unwrap();

        assert_eq!(outcome.report.risk.score(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_claim_id_is_a_persistence_warning() {
        let harness = Harness::new(vec![]);
        let service = harness.service(Arc::new(RandomDamageClassifier::seeded(7)));

        service.submit(claim()).await.unwrap();
        let outcome = service.submit(claim()).await.unwrap();

        assert!(!outcome.persisted);
        assert!(outcome.notified);
        assert_eq!(harness.reports.len().await, 1);
    }

    #[test]
    fn test_warning_messages() {
        let warning = SubmissionWarning::Persistence("timeout".to_string());
        assert_eq!(warning.to_string(), "Failed to save claim report: timeout");

        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["step"], "persistence");
        assert_eq!(json["message"], "timeout");
    }
}
