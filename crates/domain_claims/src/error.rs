//! Claims domain errors

use thiserror::Error;

use core_kernel::CoreError;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("Please upload a damage photo")]
    MissingPhoto,

    #[error("Unsupported photo format '{0}', expected jpg, jpeg or png")]
    UnsupportedPhotoFormat(String),

    #[error("Damage classification failed: {0}")]
    Classification(String),

    #[error("Malformed claim report: {0}")]
    MalformedReport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClaimError {
    /// True for errors the submitter can fix by correcting the form
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ClaimError::InvalidSubmission(_)
                | ClaimError::MissingPhoto
                | ClaimError::UnsupportedPhotoFormat(_)
        )
    }
}

impl From<CoreError> for ClaimError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ClaimError::InvalidSubmission(msg),
            other => ClaimError::InvalidSubmission(other.to_string()),
        }
    }
}
