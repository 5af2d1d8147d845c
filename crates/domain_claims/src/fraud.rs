//! Fraud risk scoring
//!
//! Scores a new claim against the prior claims recorded for the same vehicle.
//! Rules are evaluated in a fixed order and each one that fires adds points
//! and one human readable reason:
//!
//! | order | rule                         | points |
//! |-------|------------------------------|--------|
//! | 1     | prior claims for the VIN     | 30     |
//! | 2     | two or more in last 180 days | 40     |
//! | 3     | same damage type seen before | 20     |
//!
//! A raw total above 80 is compressed to `80 + min(20, 5 * reasons)`, then
//! the result is capped at 100. A claim is suspected fraudulent from 70 up.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{start_of_day, Clock, SystemClock, Vin};
use crate::claim::Claim;
use crate::damage::DamageType;

/// Score at or above which a claim is flagged for fraud review
pub const FRAUD_THRESHOLD: u8 = 70;

/// Highest possible score
pub const MAX_SCORE: u8 = 100;

/// A prior claim read from the history store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalClaim {
    pub vin: Vin,
    pub claim_date: NaiveDate,
    /// Damage type as recorded; not restricted to the classifier's enumeration
    pub damage_type: String,
}

impl HistoricalClaim {
    pub fn new(vin: impl Into<Vin>, claim_date: NaiveDate, damage_type: impl Into<String>) -> Self {
        Self {
            vin: vin.into(),
            claim_date,
            damage_type: damage_type.into(),
        }
    }

    /// True when the recorded damage type names the given part
    pub fn has_damage_type(&self, damage_type: DamageType) -> bool {
        self.damage_type.trim() == damage_type.as_str()
    }
}

/// The rules that can contribute to a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskRule {
    SameVinHistory,
    RecentClaimCluster,
    RepeatedDamageType,
}

impl RiskRule {
    pub fn points(&self) -> u32 {
        match self {
            RiskRule::SameVinHistory => 30,
            RiskRule::RecentClaimCluster => 40,
            RiskRule::RepeatedDamageType => 20,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            RiskRule::SameVinHistory => "Previous claims exist for same VIN",
            RiskRule::RecentClaimCluster => "Multiple recent claims within 6 months",
            RiskRule::RepeatedDamageType => "Similar damage type in past claims",
        }
    }
}

/// Fraud score and the reasons behind it
///
/// The fraud flag is always derived from the score, including when a stored
/// assessment is deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RiskAssessmentRecord", into = "RiskAssessmentRecord")]
pub struct RiskAssessment {
    score: u8,
    is_fraud_suspected: bool,
    reasons: Vec<String>,
}

impl RiskAssessment {
    /// Builds an assessment, capping the score at 100
    pub fn new(score: u32, reasons: Vec<String>) -> Self {
        let score = score.min(MAX_SCORE as u32) as u8;
        Self {
            score,
            is_fraud_suspected: score >= FRAUD_THRESHOLD,
            reasons,
        }
    }

    /// Assessment for a vehicle with no prior claims
    pub fn clean() -> Self {
        Self::new(0, Vec::new())
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn is_fraud_suspected(&self) -> bool {
        self.is_fraud_suspected
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

/// Stored shape of a risk assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RiskAssessmentRecord {
    #[serde(default)]
    is_fraud: bool,
    #[serde(default)]
    risk_score: i64,
    #[serde(default)]
    reason: Vec<String>,
}

impl From<RiskAssessmentRecord> for RiskAssessment {
    fn from(record: RiskAssessmentRecord) -> Self {
        // `is_fraud` is recomputed from the score
        let score = record.risk_score.clamp(0, MAX_SCORE as i64) as u32;
        RiskAssessment::new(score, record.reason)
    }
}

impl From<RiskAssessment> for RiskAssessmentRecord {
    fn from(assessment: RiskAssessment) -> Self {
        Self {
            is_fraud: assessment.is_fraud_suspected,
            risk_score: assessment.score as i64,
            reason: assessment.reasons,
        }
    }
}

/// Tunable constants of the scoring rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringPolicy {
    /// Look-back window for the recency rule
    pub recent_window_days: i64,
    /// Prior claims inside the window needed to trigger the recency rule
    pub recent_claims_threshold: usize,
    /// Raw totals above this are compressed
    pub soft_cap: u32,
    /// Points per triggered reason added above the soft cap
    pub per_reason_bonus: u32,
    /// Upper bound of the bonus above the soft cap
    pub bonus_ceiling: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            recent_window_days: 180,
            recent_claims_threshold: 2,
            soft_cap: 80,
            per_reason_bonus: 5,
            bonus_ceiling: 20,
        }
    }
}

/// Scores claims against the claim history of the same vehicle
///
/// Deterministic for a given claim, history and instant; the instant comes
/// from the injected [`Clock`].
#[derive(Clone)]
pub struct RiskScorer {
    policy: ScoringPolicy,
    clock: Arc<dyn Clock>,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskScorer {
    /// Creates a scorer on the wall clock with the standard rules
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a scorer reading "now" from the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            policy: ScoringPolicy::default(),
            clock,
        }
    }

    /// Overrides the rule constants
    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Scores a claim whose damage was classified as `damage_type`
    ///
    /// `history` may contain records for any vehicle; only those matching the
    /// claim's VIN are considered. The claim itself is never part of its own
    /// history.
    pub fn score(&self, claim: &Claim, damage_type: DamageType, history: &[HistoricalClaim]) -> RiskAssessment {
        self.score_at(claim, damage_type, history, self.clock.now())
    }

    /// Scores a claim as of a given instant
    pub fn score_at(
        &self,
        claim: &Claim,
        damage_type: DamageType,
        history: &[HistoricalClaim],
        now: DateTime<Utc>,
    ) -> RiskAssessment {
        let triggered = self.triggered_rules(claim, damage_type, history, now);

        let raw_total: u32 = triggered.iter().map(RiskRule::points).sum();
        let total = self.compress(raw_total, triggered.len());

        debug!(
            claim_id = %claim.claim_id,
            vin = %claim.vin,
            raw_total,
            score = total.min(MAX_SCORE as u32),
            rules = triggered.len(),
            "Scored claim"
        );

        let reasons = triggered.iter().map(|rule| rule.reason().to_string()).collect();
        RiskAssessment::new(total, reasons)
    }

    /// Rules that fire, in evaluation order
    fn triggered_rules(
        &self,
        claim: &Claim,
        damage_type: DamageType,
        history: &[HistoricalClaim],
        now: DateTime<Utc>,
    ) -> Vec<RiskRule> {
        let same_vin: Vec<&HistoricalClaim> = history.iter().filter(|h| h.vin == claim.vin).collect();
        let mut triggered = Vec::new();

        if !same_vin.is_empty() {
            triggered.push(RiskRule::SameVinHistory);
        }

        // History dates are compared as midnight UTC against the exact cutoff instant
        let window_start = now - Duration::days(self.policy.recent_window_days);
        let recent = same_vin
            .iter()
            .filter(|h| start_of_day(h.claim_date) >= window_start)
            .count();
        if recent >= self.policy.recent_claims_threshold {
            triggered.push(RiskRule::RecentClaimCluster);
        }

        if same_vin.iter().any(|h| h.has_damage_type(damage_type)) {
            triggered.push(RiskRule::RepeatedDamageType);
        }

        triggered
    }

    fn compress(&self, raw_total: u32, reason_count: usize) -> u32 {
        if raw_total <= self.policy.soft_cap {
            return raw_total;
        }
        let bonus = self.policy.per_reason_bonus.saturating_mul(reason_count as u32);
        self.policy.soft_cap + bonus.min(self.policy.bonus_ceiling)
    }
}
