//! Reviewer notification content

use serde::{Deserialize, Serialize};

use crate::report::ClaimReport;

/// Email handed to the notification sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewNotification {
    pub subject: String,
    pub body: String,
    pub sender: String,
    pub recipient: String,
}

impl ReviewNotification {
    /// Renders the reviewer email for a claim report
    pub fn for_report(report: &ClaimReport, sender: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            subject: format!("Claim Report for {}", report.claim_id),
            body: render_body(report),
            sender: sender.into(),
            recipient: recipient.into(),
        }
    }
}

fn render_body(report: &ClaimReport) -> String {
    // One line per reason; an empty list leaves a blank line
    let reasons = report
        .risk
        .reasons()
        .iter()
        .map(|reason| format!("- {}", reason))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Claim ID: {claim_id}\n\
         VIN: {vin}\n\
         Policy #: {policy}\n\
         Date: {date}\n\
         Damage: {damage}\n\
         Risk Score: {score}\n\
         Reasons:\n\
         {reasons}\n\
         Image URL: {image_url}\n",
        claim_id = report.claim_id,
        vin = report.vin,
        policy = report.policy_number,
        date = report.claim_date,
        damage = report.damage,
        score = report.risk.score(),
        reasons = reasons,
        image_url = report.image_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::damage::{DamageAssessment, DamageType, Severity};
    use crate::fraud::RiskAssessment;

    fn report(reasons: Vec<&str>) -> ClaimReport {
        ClaimReport {
            claim_id: "CLM999".to_string(),
            vin: "1HGCM82633A004352".to_string(),
            policy_number: "P-123456789".to_string(),
            claim_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            image_url: "https://bucket.s3.amazonaws.com/dent.png".to_string(),
            damage: DamageAssessment::new(DamageType::Hood, Severity::Major),
            risk: RiskAssessment::new(70, reasons.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn test_subject_and_addresses() {
        let mail = ReviewNotification::for_report(&report(vec![]), "intake@example.com", "review@example.com");
        assert_eq!(mail.subject, "Claim Report for CLM999");
        assert_eq!(mail.sender, "intake@example.com");
        assert_eq!(mail.recipient, "review@example.com");
    }

    #[test]
    fn test_body_lists_reasons() {
        let mail = ReviewNotification::for_report(
            &report(vec!["Previous claims exist for same VIN", "Multiple recent claims within 6 months"]),
            "a@example.com",
            "b@example.com",
        );

        let expected = "Claim ID: CLM999\n\
                        VIN: 1HGCM82633A004352\n\
                        Policy #: P-123456789\n\
                        Date: 2025-06-01\n\
                        Damage: Hood - Major\n\
                        Risk Score: 70\n\
                        Reasons:\n\
                        - Previous claims exist for same VIN\n\
                        - Multiple recent claims within 6 months\n\
                        Image URL: https://bucket.s3.amazonaws.com/dent.png\n";
        assert_eq!(mail.body, expected);
    }

    #[test]
    fn test_body_without_reasons_keeps_blank_line() {
        let mail = ReviewNotification::for_report(&report(vec![]), "a@example.com", "b@example.com");
        assert!(mail.body.contains("Risk Score: 70\nReasons:\n\nImage URL: https://bucket.s3.amazonaws.com/dent.png\n"));
    }
}
