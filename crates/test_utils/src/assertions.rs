//! Custom Test Assertions
//!
//! Assertion helpers that print the whole assessment or outcome on failure.

use domain_claims::{ClaimReport, ReviewNotification, RiskAssessment, SubmissionOutcome, FRAUD_THRESHOLD};

/// Asserts the score and the exact reasons, in order
pub fn assert_risk(risk: &RiskAssessment, expected_score: u8, expected_reasons: &[&str]) {
    assert_eq!(
        risk.score(),
        expected_score,
        "Unexpected risk score in {:?}",
        risk
    );
    assert_eq!(
        risk.reasons(),
        expected_reasons,
        "Unexpected risk reasons in {:?}",
        risk
    );
    assert_eq!(
        risk.is_fraud_suspected(),
        expected_score >= FRAUD_THRESHOLD,
        "Fraud flag disagrees with score in {:?}",
        risk
    );
}

/// Asserts the claim was flagged for fraud review
pub fn assert_flagged(risk: &RiskAssessment) {
    assert!(
        risk.is_fraud_suspected(),
        "Expected fraud flag, got score {} ({:?})",
        risk.score(),
        risk.reasons()
    );
}

/// Asserts the claim was not flagged
pub fn assert_not_flagged(risk: &RiskAssessment) {
    assert!(
        !risk.is_fraud_suspected(),
        "Expected no fraud flag, got score {} ({:?})",
        risk.score(),
        risk.reasons()
    );
}

/// Asserts every side effect succeeded
pub fn assert_clean_outcome(outcome: &SubmissionOutcome) {
    assert!(
        outcome.is_clean() && outcome.image_stored && outcome.persisted && outcome.notified,
        "Expected a clean submission, got warnings {:?}",
        outcome.warnings
    );
}

/// Asserts a notification describes the given report
pub fn assert_notification_matches(notification: &ReviewNotification, report: &ClaimReport) {
    assert_eq!(notification.subject, format!("Claim Report for {}", report.claim_id));
    for expected in [
        format!("Claim ID: {}\n", report.claim_id),
        format!("VIN: {}\n", report.vin),
        format!("Risk Score: {}\n", report.risk.score()),
        format!("Image URL: {}\n", report.image_url),
    ] {
        assert!(
            notification.body.contains(&expected),
            "Notification body is missing {:?}:\n{}",
            expected,
            notification.body
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_risk_accepts_matching_assessment() {
        let risk = RiskAssessment::new(30, vec!["Previous claims exist for same VIN".to_string()]);
        assert_risk(&risk, 30, &["Previous claims exist for same VIN"]);
        assert_not_flagged(&risk);
    }

    #[test]
    #[should_panic(expected = "Expected fraud flag")]
    fn test_assert_flagged_panics_below_threshold() {
        assert_flagged(&RiskAssessment::clean());
    }
}
