//! Strongly-typed identifiers for claim intake entities
//!
//! Claim, vehicle and policy identifiers arrive from the submitter as free
//! text, so they are string newtypes rather than UUIDs. Wrapping them keeps a
//! VIN from being passed where a policy number is expected. Identifiers that
//! the system mints itself (submission correlation ids) stay UUID-backed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

/// Sentinel used when a submitted identifier is blank
pub const UNKNOWN: &str = "UNKNOWN";

macro_rules! define_code {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier, trimming surrounding whitespace
            pub fn new(value: impl Into<String>) -> Self {
                let value = value.into();
                Self(value.trim().to_string())
            }

            /// Creates an identifier, rejecting blank input
            pub fn parse(value: impl Into<String>) -> Result<Self, CoreError> {
                let id = Self::new(value);
                if id.is_blank() {
                    return Err(CoreError::validation(concat!($label, " must not be blank")));
                }
                Ok(id)
            }

            /// Returns the identifier text
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the identifier carries no text
            pub fn is_blank(&self) -> bool {
                self.0.is_empty()
            }

            /// Returns the identifier text, or the `UNKNOWN` sentinel when blank
            pub fn or_unknown(&self) -> String {
                if self.is_blank() {
                    UNKNOWN.to_string()
                } else {
                    self.0.clone()
                }
            }

            /// Human readable label for error messages
            pub fn label() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new_v7()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_code!(ClaimId, "Claim ID");
define_code!(Vin, "VIN");
define_code!(PolicyNumber, "Policy number");

// Minted per submission and carried through logs and port metadata
define_id!(SubmissionId, "SUB");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_trims_input() {
        let vin = Vin::new("  1HGCM82633A004352 ");
        assert_eq!(vin.as_str(), "1HGCM82633A004352");
    }

    #[test]
    fn test_blank_code_falls_back_to_sentinel() {
        assert_eq!(PolicyNumber::new("   ").or_unknown(), UNKNOWN);
        assert_eq!(PolicyNumber::new("P-1").or_unknown(), "P-1");
    }

    #[test]
    fn test_parse_rejects_blank() {
        let err = ClaimId::parse("").unwrap_err();
        assert!(err.to_string().contains("Claim ID"));
    }

    #[test]
    fn test_submission_id_round_trips_through_display() {
        let id = SubmissionId::new_v7();
        let parsed: SubmissionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!(id.to_string().starts_with("SUB-"));
    }
}
