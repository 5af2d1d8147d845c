//! Damage classification
//!
//! The classifier is a capability seam: the pipeline only depends on the
//! [`DamageClassifier`] trait, so a real vision model can replace the random
//! stub without touching scoring or report assembly.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::claim::DamagePhoto;
use crate::error::ClaimError;

/// Damaged vehicle part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageType {
    #[serde(rename = "Rear Bumper")]
    RearBumper,
    #[serde(rename = "Front Bumper")]
    FrontBumper,
    #[serde(rename = "Left Door")]
    LeftDoor,
    #[serde(rename = "Right Door")]
    RightDoor,
    Hood,
    Windshield,
    /// Fallback when classification fails
    Unknown,
}

impl DamageType {
    /// The parts a classifier may report
    pub const DETECTABLE: [DamageType; 6] = [
        DamageType::RearBumper,
        DamageType::FrontBumper,
        DamageType::LeftDoor,
        DamageType::RightDoor,
        DamageType::Hood,
        DamageType::Windshield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DamageType::RearBumper => "Rear Bumper",
            DamageType::FrontBumper => "Front Bumper",
            DamageType::LeftDoor => "Left Door",
            DamageType::RightDoor => "Right Door",
            DamageType::Hood => "Hood",
            DamageType::Windshield => "Windshield",
            DamageType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DamageType {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DETECTABLE
            .iter()
            .chain(std::iter::once(&DamageType::Unknown))
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ClaimError::Classification(format!("unknown damage type '{}'", s)))
    }
}

/// Damage severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    /// Fallback when classification fails
    Unknown,
}

impl Severity {
    /// The severities a classifier may report
    pub const DETECTABLE: [Severity; 3] = [Severity::Minor, Severity::Moderate, Severity::Major];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "Minor",
            Severity::Moderate => "Moderate",
            Severity::Major => "Major",
            Severity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of the photographed damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageAssessment {
    pub damage_type: DamageType,
    pub severity: Severity,
}

impl DamageAssessment {
    pub fn new(damage_type: DamageType, severity: Severity) -> Self {
        Self { damage_type, severity }
    }

    /// Assessment recorded when the classifier fails
    pub fn unknown() -> Self {
        Self::new(DamageType::Unknown, Severity::Unknown)
    }

    pub fn is_unknown(&self) -> bool {
        self.damage_type == DamageType::Unknown
    }
}

impl fmt::Display for DamageAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.damage_type, self.severity)
    }
}

/// Maps a damage photo to a damage assessment
///
/// Implementations must be free of side effects and only report members of
/// [`DamageType::DETECTABLE`] and [`Severity::DETECTABLE`]. Returning an
/// error is allowed; the intake pipeline then records
/// [`DamageAssessment::unknown`] instead of rejecting the claim.
pub trait DamageClassifier: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Classifies the photographed damage
    fn classify(&self, photo: &DamagePhoto) -> Result<DamageAssessment, ClaimError>;
}

/// Stand-in classifier that picks a damage type and severity uniformly at random
///
/// Only suitable for demos and tests. Fraud decisions made on its output
/// are meaningless.
pub struct RandomDamageClassifier {
    rng: Mutex<StdRng>,
}

impl RandomDamageClassifier {
    /// Seeds from the operating system
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible sequence for demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomDamageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DamageClassifier for RandomDamageClassifier {
    fn name(&self) -> &str {
        "random"
    }

    fn classify(&self, photo: &DamagePhoto) -> Result<DamageAssessment, ClaimError> {
        if photo.is_empty() {
            return Err(ClaimError::MissingPhoto);
        }

        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ClaimError::Classification("random source poisoned".to_string()))?;

        let damage_type = DamageType::DETECTABLE
            .choose(&mut *rng)
            .copied()
            .unwrap_or(DamageType::Unknown);
        let severity = Severity::DETECTABLE
            .choose(&mut *rng)
            .copied()
            .unwrap_or(Severity::Unknown);

        Ok(DamageAssessment::new(damage_type, severity))
    }
}

/// Classifier that always reports the same assessment
#[derive(Debug, Clone, Copy)]
pub struct FixedDamageClassifier(pub DamageAssessment);

impl DamageClassifier for FixedDamageClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn classify(&self, _photo: &DamagePhoto) -> Result<DamageAssessment, ClaimError> {
        Ok(self.0)
    }
}
