//! Test Data Builders
//!
//! Builders for claims, histories and wired-up intake services. Tests set
//! only the fields they care about and take fixture defaults for the rest.

use std::sync::Arc;

use chrono::NaiveDate;

use core_kernel::SinkConfig;
use domain_claims::ports::mock::{InMemoryHistory, InMemoryImageStore, InMemoryReportStore, RecordingNotifier};
use domain_claims::{
    Claim, ClaimIntakeService, DamageAssessment, DamageClassifier, DamagePhoto, FixedDamageClassifier,
    HistoricalClaim, IntakePorts, RiskScorer,
};

use crate::fixtures::{ClaimFixtures, ClockFixtures, SinkFixtures, StringFixtures};

/// Builder for claims
pub struct ClaimBuilder {
    claim_id: String,
    vin: String,
    policy_number: String,
    claim_date: NaiveDate,
    photo: Option<DamagePhoto>,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    pub fn new() -> Self {
        Self {
            claim_id: StringFixtures::claim_id().to_string(),
            vin: StringFixtures::vin().to_string(),
            policy_number: StringFixtures::policy_number().to_string(),
            claim_date: ClockFixtures::today(),
            photo: Some(ClaimFixtures::photo()),
        }
    }

    pub fn with_claim_id(mut self, claim_id: impl Into<String>) -> Self {
        self.claim_id = claim_id.into();
        self
    }

    pub fn with_vin(mut self, vin: impl Into<String>) -> Self {
        self.vin = vin.into();
        self
    }

    pub fn with_policy_number(mut self, policy_number: impl Into<String>) -> Self {
        self.policy_number = policy_number.into();
        self
    }

    pub fn with_claim_date(mut self, date: NaiveDate) -> Self {
        self.claim_date = date;
        self
    }

    pub fn with_photo(mut self, filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.photo = Some(DamagePhoto::new(filename, bytes));
        self
    }

    pub fn without_photo(mut self) -> Self {
        self.photo = None;
        self
    }

    pub fn build(self) -> Claim {
        Claim {
            claim_id: self.claim_id.into(),
            vin: self.vin.into(),
            policy_number: self.policy_number.into(),
            claim_date: self.claim_date,
            damage_photo: self.photo,
        }
    }
}

/// Builder for prior-claim histories, dated relative to the reference clock
pub struct HistoryBuilder {
    vin: String,
    records: Vec<HistoricalClaim>,
}

impl HistoryBuilder {
    pub fn for_vin(vin: impl Into<String>) -> Self {
        Self {
            vin: vin.into(),
            records: Vec::new(),
        }
    }

    /// Adds a claim `days` before the reference date
    pub fn claim_days_ago(mut self, days: i64, damage_type: impl Into<String>) -> Self {
        self.records
            .push(HistoricalClaim::new(self.vin.as_str(), ClockFixtures::days_ago(days), damage_type));
        self
    }

    pub fn build(self) -> Vec<HistoricalClaim> {
        self.records
    }
}

/// An intake service wired to in-memory ports, with handles to inspect them
pub struct TestIntake {
    pub service: ClaimIntakeService,
    pub history: Arc<InMemoryHistory>,
    pub reports: Arc<InMemoryReportStore>,
    pub images: Arc<InMemoryImageStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestIntake {
    pub fn ports(&self) -> IntakePorts {
        IntakePorts {
            history: self.history.clone(),
            reports: self.reports.clone(),
            images: self.images.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

/// Builder for [`TestIntake`]
pub struct TestIntakeBuilder {
    history: Vec<HistoricalClaim>,
    classifier: Arc<dyn DamageClassifier>,
    sinks: SinkConfig,
}

impl Default for TestIntakeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestIntakeBuilder {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            classifier: Arc::new(FixedDamageClassifier(ClaimFixtures::rear_bumper_moderate())),
            sinks: SinkFixtures::standard(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoricalClaim>) -> Self {
        self.history = history;
        self
    }

    pub fn with_damage(mut self, assessment: DamageAssessment) -> Self {
        self.classifier = Arc::new(FixedDamageClassifier(assessment));
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn DamageClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_sinks(mut self, sinks: SinkConfig) -> Self {
        self.sinks = sinks;
        self
    }

    pub fn build(self) -> TestIntake {
        let history = Arc::new(InMemoryHistory::new(self.history));
        let reports = Arc::new(InMemoryReportStore::new());
        let images = Arc::new(InMemoryImageStore::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let ports = IntakePorts {
            history: history.clone(),
            reports: reports.clone(),
            images: images.clone(),
            notifier: notifier.clone(),
        };
        let scorer = RiskScorer::with_clock(ClockFixtures::fixed_clock());
        let service = ClaimIntakeService::new(self.classifier, scorer, ports, self.sinks);

        TestIntake {
            service,
            history,
            reports,
            images,
            notifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_builder_overrides() {
        let claim = ClaimBuilder::new().with_claim_id("CLM7").with_vin("VIN7").without_photo().build();
        assert_eq!(claim.claim_id.as_str(), "CLM7");
        assert_eq!(claim.vin.as_str(), "VIN7");
        assert!(claim.damage_photo.is_none());
    }

    #[test]
    fn test_history_builder_dates() {
        let history = HistoryBuilder::for_vin("VIN7").claim_days_ago(10, "Hood").build();
        assert_eq!(history[0].claim_date, ClockFixtures::days_ago(10));
        assert_eq!(history[0].vin.as_str(), "VIN7");
    }
}
