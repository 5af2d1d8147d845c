//! Claim submission

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, PolicyNumber, Vin};
use crate::error::ClaimError;

/// Photo extensions accepted by the upload step
pub const ACCEPTED_PHOTO_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Uploaded damage photograph
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamagePhoto {
    /// Original filename, used as the storage key
    pub filename: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for DamagePhoto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DamagePhoto")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl DamagePhoto {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased extension of the filename, if any
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    /// MIME type derived from the extension
    pub fn content_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            _ => "application/octet-stream",
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Checks the photo is non-empty and in an accepted format
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.is_empty() {
            return Err(ClaimError::MissingPhoto);
        }
        match self.extension() {
            Some(ext) if ACCEPTED_PHOTO_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            Some(ext) => Err(ClaimError::UnsupportedPhotoFormat(ext)),
            None => Err(ClaimError::UnsupportedPhotoFormat(self.filename.clone())),
        }
    }
}

/// A submitted insurance claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Submitter-chosen claim identifier, unique per submission
    pub claim_id: ClaimId,
    /// Vehicle identification number
    pub vin: Vin,
    /// Policy the claim is made against
    pub policy_number: PolicyNumber,
    /// Date of the claim
    pub claim_date: NaiveDate,
    /// Damage photograph, absent when the submitter did not upload one
    pub damage_photo: Option<DamagePhoto>,
}

impl Claim {
    /// Creates a claim with a photo attached
    pub fn new(
        claim_id: impl Into<ClaimId>,
        vin: impl Into<Vin>,
        policy_number: impl Into<PolicyNumber>,
        claim_date: NaiveDate,
        damage_photo: DamagePhoto,
    ) -> Self {
        Self {
            claim_id: claim_id.into(),
            vin: vin.into(),
            policy_number: policy_number.into(),
            claim_date,
            damage_photo: Some(damage_photo),
        }
    }

    /// Validates the submission before any pipeline step runs
    ///
    /// Returns the photo so callers don't have to unwrap it again.
    pub fn validate(&self) -> Result<&DamagePhoto, ClaimError> {
        let photo = self.damage_photo.as_ref().ok_or(ClaimError::MissingPhoto)?;
        photo.validate()?;

        // The claim id keys the persisted report
        if self.claim_id.is_blank() {
            return Err(ClaimError::InvalidSubmission(format!(
                "{} must not be blank",
                ClaimId::label()
            )));
        }

        Ok(photo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim_with(photo: Option<DamagePhoto>) -> Claim {
        Claim {
            claim_id: ClaimId::new("CLM999"),
            vin: Vin::new("1HGCM82633A004352"),
            policy_number: PolicyNumber::new("P-123456789"),
            claim_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            damage_photo: photo,
        }
    }

    #[test]
    fn test_valid_claim() {
        let claim = claim_with(Some(DamagePhoto::new("dent.JPG", vec![0xFF, 0xD8])));
        let photo = claim.validate().unwrap();
        assert_eq!(photo.filename, "dent.JPG");
        assert_eq!(photo.content_type(), "image/jpeg");
    }

    #[test]
    fn test_missing_photo_rejected() {
        let err = claim_with(None).validate().unwrap_err();
        assert!(matches!(err, ClaimError::MissingPhoto));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_empty_photo_rejected() {
        let err = claim_with(Some(DamagePhoto::new("dent.png", Vec::new()))).validate().unwrap_err();
        assert!(matches!(err, ClaimError::MissingPhoto));
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let err = claim_with(Some(DamagePhoto::new("dent.gif", vec![1]))).validate().unwrap_err();
        assert!(matches!(err, ClaimError::UnsupportedPhotoFormat(ext) if ext == "gif"));

        let err = claim_with(Some(DamagePhoto::new("dent", vec![1]))).validate().unwrap_err();
        assert!(matches!(err, ClaimError::UnsupportedPhotoFormat(_)));
    }

    #[test]
    fn test_blank_claim_id_rejected() {
        let mut claim = claim_with(Some(DamagePhoto::new("a.png", vec![1])));
        claim.claim_id = ClaimId::new("  ");
        assert!(matches!(claim.validate(), Err(ClaimError::InvalidSubmission(_))));
    }

    #[test]
    fn test_debug_hides_bytes() {
        let photo = DamagePhoto::new("a.png", vec![7; 1024]);
        let debug = format!("{:?}", photo);
        assert!(debug.contains("len: 1024"));
        assert!(!debug.contains("7, 7"));
    }
}
