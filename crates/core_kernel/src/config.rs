//! Sink configuration
//!
//! One explicit settings struct handed to every external-sink client at
//! construction. Nothing reads credentials or resource names from globals.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Names and addresses used by the external sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Object storage bucket for damage photos
    pub bucket_name: String,
    /// Table holding persisted claim reports
    pub table_name: String,
    /// Cloud region of the bucket
    pub region: String,
    /// From address of reviewer notifications
    pub sender_address: String,
    /// Reviewer mailbox
    pub recipient_address: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            bucket_name: "auto-insurance-claims-images".to_string(),
            table_name: "claim_reports".to_string(),
            region: "us-east-1".to_string(),
            sender_address: "claims-intake@example.com".to_string(),
            recipient_address: "claims-review@example.com".to_string(),
        }
    }
}

impl SinkConfig {
    /// Checks that every option is present and the table name is a plain SQL identifier
    pub fn validate(&self) -> Result<(), CoreError> {
        let required = [
            ("bucket_name", &self.bucket_name),
            ("table_name", &self.table_name),
            ("region", &self.region),
            ("sender_address", &self.sender_address),
            ("recipient_address", &self.recipient_address),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::configuration(format!("{} must be set", name)));
            }
        }

        if !is_sql_identifier(&self.table_name) {
            return Err(CoreError::configuration(format!(
                "table_name '{}' is not a valid identifier",
                self.table_name
            )));
        }

        for (name, value) in [("sender_address", &self.sender_address), ("recipient_address", &self.recipient_address)] {
            if !value.contains('@') {
                return Err(CoreError::configuration(format!("{} '{}' is not an email address", name, value)));
            }
        }

        Ok(())
    }
}

/// True for `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
