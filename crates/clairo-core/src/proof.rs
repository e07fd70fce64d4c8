//! Proof: the immutable registry record.
//!
//! A proof binds a media hash to a metadata hash, a geolocation, the commit
//! timestamp, and the submitter. Once committed it is never edited or removed.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::error::ValidationError;
use crate::types::{GeoPoint, Submitter};
use crate::validation::validate_submission;

/// Raw caller input to a submission, before validation.
///
/// Digests are plain byte vectors here because callers may hand us anything;
/// [`Submission::validate`] turns this into a [`NewProof`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub media_hash: Vec<u8>,
    pub metadata_hash: Vec<u8>,
    /// Degrees × 1,000,000.
    pub latitude: i64,
    /// Degrees × 1,000,000.
    pub longitude: i64,
}

impl Submission {
    /// Build a submission from already-typed digests.
    pub fn new(media_hash: Digest, metadata_hash: Digest, latitude: i64, longitude: i64) -> Self {
        Self {
            media_hash: media_hash.0.to_vec(),
            metadata_hash: metadata_hash.0.to_vec(),
            latitude,
            longitude,
        }
    }

    /// Validate and attach the submitter.
    pub fn validate(&self, submitter: Submitter) -> Result<NewProof, ValidationError> {
        validate_submission(self, submitter)
    }
}

/// A validated proof that has not been committed yet.
///
/// It carries everything except the timestamp, which only the store assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewProof {
    pub media_hash: Digest,
    pub metadata_hash: Digest,
    pub location: GeoPoint,
    pub submitter: Submitter,
}

impl NewProof {
    /// Seal into a committed proof at the given commit time.
    pub fn commit_at(self, timestamp: u64) -> Proof {
        Proof {
            media_hash: self.media_hash,
            metadata_hash: self.metadata_hash,
            location: self.location,
            timestamp,
            submitter: self.submitter,
        }
    }
}

/// A committed registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Registry key.
    pub media_hash: Digest,
    pub metadata_hash: Digest,
    pub location: GeoPoint,
    /// Commit time, seconds since the Unix epoch.
    pub timestamp: u64,
    pub submitter: Submitter,
}

impl Proof {
    pub fn latitude(&self) -> i32 {
        self.location.latitude()
    }

    pub fn longitude(&self) -> i32 {
        self.location.longitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_at_preserves_fields() {
        let new = NewProof {
            media_hash: Digest::from_bytes([1; 32]),
            metadata_hash: Digest::from_bytes([2; 32]),
            location: GeoPoint::new(40_712_800, -74_006_000).unwrap(),
            submitter: Submitter::derive("alice"),
        };

        let proof = new.commit_at(1_700_000_000);
        assert_eq!(proof.media_hash, new.media_hash);
        assert_eq!(proof.metadata_hash, new.metadata_hash);
        assert_eq!(proof.latitude(), 40_712_800);
        assert_eq!(proof.longitude(), -74_006_000);
        assert_eq!(proof.timestamp, 1_700_000_000);
        assert_eq!(proof.submitter, new.submitter);
    }

    #[test]
    fn test_proof_json_rejects_out_of_range_location() {
        let proof = NewProof {
            media_hash: Digest::from_bytes([1; 32]),
            metadata_hash: Digest::from_bytes([2; 32]),
            location: GeoPoint::new(0, 0).unwrap(),
            submitter: Submitter::derive("alice"),
        }
        .commit_at(1);

        let mut json: serde_json::Value = serde_json::to_value(proof).unwrap();
        json["location"]["latitude"] = serde_json::json!(90_000_001);
        assert!(serde_json::from_value::<Proof>(json).is_err());
    }
}
