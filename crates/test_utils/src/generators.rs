//! Property-Based Test Generators
//!
//! Proptest strategies for claims and histories, plus `fake`-backed helpers
//! for realistic-looking free text.

use chrono::{Duration, NaiveDate};
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use proptest::prelude::*;

use domain_claims::{DamageType, HistoricalClaim, Severity};

use crate::fixtures::{ClockFixtures, StringFixtures};

/// Strategy for VIN-shaped strings (17 chars, no I, O or Q)
pub fn vin_strategy() -> impl Strategy<Value = String> {
    "[A-HJ-NPR-Z0-9]{17}"
}

/// Strategy for claim ids like `CLM1234`
pub fn claim_id_strategy() -> impl Strategy<Value = String> {
    (1u32..1_000_000).prop_map(|n| format!("CLM{}", n))
}

pub fn damage_type_strategy() -> impl Strategy<Value = DamageType> {
    prop::sample::select(DamageType::DETECTABLE.to_vec())
}

pub fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::DETECTABLE.to_vec())
}

/// Dates between ten years ago and today
pub fn past_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650).prop_map(|days| ClockFixtures::today() - Duration::days(days))
}

/// Damage type text as it may appear in history, including padded and foreign values
pub fn recorded_damage_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        damage_type_strategy().prop_map(|t| t.to_string()),
        damage_type_strategy().prop_map(|t| format!("  {} ", t)),
        Just("Hail".to_string()),
        Just(String::new()),
    ]
}

/// History entries split between the reference VIN and other vehicles
pub fn history_strategy(max_len: usize) -> impl Strategy<Value = Vec<HistoricalClaim>> {
    let entry = (
        prop_oneof![Just(StringFixtures::vin().to_string()), vin_strategy()],
        past_date_strategy(),
        recorded_damage_strategy(),
    )
        .prop_map(|(vin, date, damage)| HistoricalClaim::new(vin, date, damage));
    prop::collection::vec(entry, 0..max_len)
}

/// A random, well-formed email address
pub fn fake_email() -> String {
    SafeEmail().fake()
}
