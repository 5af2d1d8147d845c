//! Pre-built Test Fixtures
//!
//! Consistent, predictable data for claim intake tests. Dates are anchored
//! to [`ClockFixtures::reference_now`] so window rules behave the same on
//! every run.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;

use core_kernel::{FixedClock, SinkConfig};
use domain_claims::{
    Claim, ClaimReportRecord, DamageAssessment, DamagePhoto, DamageType, HistoricalClaim, Severity,
};

static REFERENCE_NOW: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap());

/// Fixture for clock-dependent tests
pub struct ClockFixtures;

impl ClockFixtures {
    /// The instant every fixture is relative to
    pub fn reference_now() -> DateTime<Utc> {
        *REFERENCE_NOW
    }

    pub fn today() -> NaiveDate {
        Self::reference_now().date_naive()
    }

    pub fn days_ago(days: i64) -> NaiveDate {
        Self::today() - Duration::days(days)
    }

    pub fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(Self::reference_now()))
    }
}

/// Fixture for identifiers and photo payloads
pub struct StringFixtures;

impl StringFixtures {
    pub fn claim_id() -> &'static str {
        "CLM999"
    }

    pub fn vin() -> &'static str {
        "1HGCM82633A004352"
    }

    pub fn other_vin() -> &'static str {
        "JH4KA8260MC000000"
    }

    pub fn policy_number() -> &'static str {
        "P-123456789"
    }

    pub fn photo_filename() -> &'static str {
        "rear_dent.jpg"
    }

    /// JPEG start-of-image marker followed by filler
    pub fn jpeg_bytes() -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.extend(std::iter::repeat(0u8).take(60));
        bytes
    }
}

/// Fixture for claims
pub struct ClaimFixtures;

impl ClaimFixtures {
    pub fn photo() -> DamagePhoto {
        DamagePhoto::new(StringFixtures::photo_filename(), StringFixtures::jpeg_bytes())
    }

    /// A valid claim for the reference VIN dated today
    pub fn standard() -> Claim {
        Claim::new(
            StringFixtures::claim_id(),
            StringFixtures::vin(),
            StringFixtures::policy_number(),
            ClockFixtures::today(),
            Self::photo(),
        )
    }

    pub fn without_photo() -> Claim {
        let mut claim = Self::standard();
        claim.damage_photo = None;
        claim
    }

    pub fn rear_bumper_moderate() -> DamageAssessment {
        DamageAssessment::new(DamageType::RearBumper, Severity::Moderate)
    }
}

/// Fixture for prior-claim histories of the reference VIN
pub struct HistoryFixtures;

impl HistoryFixtures {
    /// One claim three years ago for a different part; scores 30
    pub fn single_old_claim() -> Vec<HistoricalClaim> {
        vec![HistoricalClaim::new(StringFixtures::vin(), ClockFixtures::days_ago(3 * 365), "Windshield")]
    }

    /// Two recent claims for other parts; scores 70
    pub fn recent_cluster() -> Vec<HistoricalClaim> {
        vec![
            HistoricalClaim::new(StringFixtures::vin(), ClockFixtures::days_ago(20), "Hood"),
            HistoricalClaim::new(StringFixtures::vin(), ClockFixtures::days_ago(120), "Left Door"),
        ]
    }

    /// Two recent rear bumper claims; scores 95 against a rear bumper claim
    pub fn repeat_offender() -> Vec<HistoricalClaim> {
        vec![
            HistoricalClaim::new(StringFixtures::vin(), ClockFixtures::days_ago(15), "Rear Bumper"),
            HistoricalClaim::new(StringFixtures::vin(), ClockFixtures::days_ago(60), "Rear Bumper"),
        ]
    }

    /// Claims for another vehicle only
    pub fn other_vehicle() -> Vec<HistoricalClaim> {
        vec![
            HistoricalClaim::new(StringFixtures::other_vin(), ClockFixtures::days_ago(1), "Rear Bumper"),
            HistoricalClaim::new(StringFixtures::other_vin(), ClockFixtures::days_ago(2), "Rear Bumper"),
        ]
    }
}

/// Fixture for stored report records
pub struct ReportFixtures;

impl ReportFixtures {
    pub fn record(claim_id: &str, date: &str, damage_type: &str, risk_score: i64) -> ClaimReportRecord {
        ClaimReportRecord {
            claim_id: claim_id.to_string(),
            vin: StringFixtures::vin().to_string(),
            policy_number: StringFixtures::policy_number().to_string(),
            claim_date: date.to_string(),
            image_url: format!("https://auto-insurance-claims-images.s3.amazonaws.com/{}.jpg", claim_id),
            damage_detected: serde_json::json!({ "damage_type": damage_type, "severity": "Minor" }).to_string(),
            fraud_detected: serde_json::json!({
                "is_fraud": risk_score >= 70,
                "risk_score": risk_score,
                "reason": [],
            })
            .to_string(),
        }
    }

    /// Three readable records across two months, one flagged
    pub fn dashboard_sample() -> Vec<ClaimReportRecord> {
        vec![
            Self::record("CLM100", "2025-04-02", "Hood", 0),
            Self::record("CLM101", "2025-05-10", "Rear Bumper", 95),
            Self::record("CLM102", "2025-05-10", "Hood", 30),
        ]
    }

    /// A record whose nested JSON cannot be parsed
    pub fn corrupt(claim_id: &str) -> ClaimReportRecord {
        ClaimReportRecord {
            damage_detected: "{not json".to_string(),
            ..Self::record(claim_id, "2025-05-01", "Hood", 0)
        }
    }
}

/// Fixture for sink settings
pub struct SinkFixtures;

impl SinkFixtures {
    pub fn standard() -> SinkConfig {
        SinkConfig {
            sender_address: "intake@claims.test".to_string(),
            recipient_address: "fraud-review@claims.test".to_string(),
            ..SinkConfig::default()
        }
    }
}
