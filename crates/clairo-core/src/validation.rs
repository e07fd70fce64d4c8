//! Submission validation: digest lengths and coordinate ranges.

use crate::digest::Digest;
use crate::error::ValidationError;
use crate::proof::{NewProof, Submission};
use crate::types::{GeoPoint, Submitter};

/// Check that `bytes` is a well-formed 32-byte digest.
pub fn validate_digest(field: &'static str, bytes: &[u8]) -> Result<Digest, ValidationError> {
    Digest::try_from(bytes).map_err(|_| ValidationError::InvalidDigest {
        field,
        len: bytes.len(),
    })
}

/// Check that fixed-point coordinates are within the accepted ranges.
///
/// Values outside the range are rejected, never clamped.
pub fn validate_coordinates(latitude: i64, longitude: i64) -> Result<GeoPoint, ValidationError> {
    GeoPoint::new(latitude, longitude)
}

/// Validate a full submission.
///
/// Checks, in order:
/// 1. Media hash length
/// 2. Metadata hash length
/// 3. Latitude and longitude ranges
pub fn validate_submission(
    submission: &Submission,
    submitter: Submitter,
) -> Result<NewProof, ValidationError> {
    let media_hash = validate_digest("media_hash", &submission.media_hash)?;
    let metadata_hash = validate_digest("metadata_hash", &submission.metadata_hash)?;
    let location = validate_coordinates(submission.latitude, submission.longitude)?;

    Ok(NewProof {
        media_hash,
        metadata_hash,
        location,
        submitter,
    })
}
