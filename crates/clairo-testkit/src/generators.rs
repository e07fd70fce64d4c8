//! Proptest generators for property-based testing.

use proptest::prelude::*;

use clairo_core::{
    Digest, GeoPoint, Proof, Submission, Submitter, MAX_LATITUDE, MAX_LONGITUDE,
};

/// Generate a random Digest.
pub fn digest() -> impl Strategy<Value = Digest> {
    any::<[u8; 32]>().prop_map(Digest::from_bytes)
}

/// Generate a random Submitter.
pub fn submitter() -> impl Strategy<Value = Submitter> {
    any::<[u8; 32]>().prop_map(Submitter::from_bytes)
}

/// Generate an in-range latitude (micro-degrees).
pub fn latitude() -> impl Strategy<Value = i64> {
    -MAX_LATITUDE..=MAX_LATITUDE
}

/// Generate an in-range longitude (micro-degrees).
pub fn longitude() -> impl Strategy<Value = i64> {
    -MAX_LONGITUDE..=MAX_LONGITUDE
}

/// Generate a valid GeoPoint.
pub fn geo_point() -> impl Strategy<Value = GeoPoint> {
    (latitude(), longitude()).prop_map(|(lat, lon)| {
        GeoPoint::new(lat, lon).unwrap_or_else(|e| unreachable!("in-range point rejected: {e}"))
    })
}

/// Generate a latitude outside the accepted range.
pub fn out_of_range_latitude() -> impl Strategy<Value = i64> {
    prop_oneof![
        (MAX_LATITUDE + 1)..=i64::MAX,
        i64::MIN..=(-MAX_LATITUDE - 1),
    ]
}

/// Generate a longitude outside the accepted range.
pub fn out_of_range_longitude() -> impl Strategy<Value = i64> {
    prop_oneof![
        (MAX_LONGITUDE + 1)..=i64::MAX,
        i64::MIN..=(-MAX_LONGITUDE - 1),
    ]
}

/// Generate bytes that are not a 32-byte digest.
pub fn malformed_digest_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..32),
        prop::collection::vec(any::<u8>(), 33..=64),
    ]
}

/// Generate a committed Proof.
pub fn proof() -> impl Strategy<Value = Proof> {
    (digest(), digest(), geo_point(), any::<u64>(), submitter()).prop_map(
        |(media_hash, metadata_hash, location, timestamp, submitter)| Proof {
            media_hash,
            metadata_hash,
            location,
            timestamp,
            submitter,
        },
    )
}

/// Parameters for a valid submission.
#[derive(Debug, Clone)]
pub struct SubmissionParams {
    pub media_hash: Digest,
    pub metadata_hash: Digest,
    pub latitude: i64,
    pub longitude: i64,
}

impl SubmissionParams {
    pub fn to_submission(&self) -> Submission {
        Submission::new(
            self.media_hash,
            self.metadata_hash,
            self.latitude,
            self.longitude,
        )
    }
}

impl Arbitrary for SubmissionParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (digest(), digest(), latitude(), longitude())
            .prop_map(|(media_hash, metadata_hash, latitude, longitude)| SubmissionParams {
                media_hash,
                metadata_hash,
                latitude,
                longitude,
            })
            .boxed()
    }
}

/// Generate a batch of submissions whose media hashes come from a small pool,
/// so collisions are common.
pub fn colliding_submissions(max_len: usize) -> impl Strategy<Value = Vec<SubmissionParams>> {
    prop::collection::vec(
        (0u8..8, digest(), latitude(), longitude()).prop_map(|(key, metadata_hash, lat, lon)| {
            SubmissionParams {
                media_hash: Digest::from_bytes([key; 32]),
                metadata_hash,
                latitude: lat,
                longitude: lon,
            }
        }),
        1..=max_len,
    )
}
