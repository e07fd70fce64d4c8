//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the digest producer and the canonical proof encoding,
//! so independent indexers can check they agree byte for byte.

use clairo_core::{
    canonical_proof_bytes, decode_proof, Digest, DigestAlgorithm, GeoPoint, Proof, Submitter,
};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Text hashed into the media hash.
    pub media_text: &'static str,
    /// Text hashed into the metadata hash.
    pub metadata_text: &'static str,
    /// Micro-degrees.
    pub latitude: i64,
    /// Micro-degrees.
    pub longitude: i64,
    /// Commit timestamp.
    pub timestamp: u64,
    /// Raw submitter handle.
    pub submitter: [u8; 32],
    /// Expected SHA-256 of `media_text` (hex).
    pub expected_media_hash: &'static str,
    /// Expected SHA-256 of `metadata_text` (hex).
    pub expected_metadata_hash: &'static str,
    /// Expected canonical proof bytes (hex).
    pub expected_proof_bytes: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "photo registered in New York",
            media_text: "test.jpg",
            metadata_text: "location=40.7128,-74.0060",
            latitude: 40_712_800,
            longitude: -74_006_000,
            timestamp: 1_736_870_400,
            submitter: [0x42; 32],
            expected_media_hash: "0d407ee6406a1216f2366674a1a9ff71361d5bef47021f8eb8b51f95e319dd56",
            expected_metadata_hash:
                "bc0f55ece5d3c1038b59c40591508b7fcb0d849fc6e606c00bafb0cfffae349d",
            expected_proof_bytes: concat!(
                "a6",
                "00", "5820", "0d407ee6406a1216f2366674a1a9ff71361d5bef47021f8eb8b51f95e319dd56",
                "01", "5820", "bc0f55ece5d3c1038b59c40591508b7fcb0d849fc6e606c00bafb0cfffae349d",
                "02", "1a026d3a60",
                "03", "3a04693def",
                "04", "1a67868a00",
                "05", "5820", "4242424242424242424242424242424242424242424242424242424242424242",
            ),
        },
    ]
}

/// A proof at the coordinate extremes with all-zero digests.
///
/// Skips the digest producer and pins only the encoding.
pub fn boundary_proof() -> (Proof, &'static str) {
    let proof = Proof {
        media_hash: Digest::ZERO,
        metadata_hash: Digest::ZERO,
        location: GeoPoint::new(-90_000_000, 180_000_000)
            .unwrap_or_else(|e| unreachable!("boundary point rejected: {e}")),
        timestamp: 0,
        submitter: Submitter::from_bytes([0; 32]),
    };
    let expected = concat!(
        "a6",
        "00", "5820", "0000000000000000000000000000000000000000000000000000000000000000",
        "01", "5820", "0000000000000000000000000000000000000000000000000000000000000000",
        "02", "3a055d4a7f",
        "03", "1a0aba9500",
        "04", "00",
        "05", "5820", "0000000000000000000000000000000000000000000000000000000000000000",
    );
    (proof, expected)
}

/// Build the proof a vector describes.
pub fn proof_from_vector(vector: &GoldenVector) -> Proof {
    Proof {
        media_hash: Digest::compute(DigestAlgorithm::Sha256, vector.media_text.as_bytes()),
        metadata_hash: Digest::compute(DigestAlgorithm::Sha256, vector.metadata_text.as_bytes()),
        location: GeoPoint::new(vector.latitude, vector.longitude)
            .unwrap_or_else(|e| unreachable!("golden vector {} out of range: {e}", vector.name)),
        timestamp: vector.timestamp,
        submitter: Submitter::from_bytes(vector.submitter),
    }
}

/// Check one vector. Returns a description of the first mismatch.
pub fn verify_vector(vector: &GoldenVector) -> Result<(), String> {
    let proof = proof_from_vector(vector);

    let media = proof.media_hash.to_hex();
    if media != vector.expected_media_hash {
        return Err(format!("{}: media hash {media}", vector.name));
    }

    let metadata = proof.metadata_hash.to_hex();
    if metadata != vector.expected_metadata_hash {
        return Err(format!("{}: metadata hash {metadata}", vector.name));
    }

    let bytes = canonical_proof_bytes(&proof);
    if hex::encode(&bytes) != vector.expected_proof_bytes {
        return Err(format!(
            "{}: proof bytes {}",
            vector.name,
            hex::encode(&bytes)
        ));
    }

    match decode_proof(&bytes) {
        Ok(decoded) if decoded == proof => Ok(()),
        Ok(_) => Err(format!("{}: decoded proof differs", vector.name)),
        Err(e) => Err(format!("{}: decode failed: {e}", vector.name)),
    }
}

/// Verify all golden vectors.
pub fn verify_all_vectors() -> Result<(), String> {
    all_vectors().iter().try_for_each(verify_vector)
}
