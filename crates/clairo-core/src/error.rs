//! Error types for Clairo Core.

use std::fmt;

use thiserror::Error;

/// Which coordinate of a [`GeoPoint`](crate::GeoPoint) failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

/// Errors in caller-supplied submission data.
///
/// These are always caller-fixable and never imply a state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid digest for {field}: expected 32 bytes, got {len}")]
    InvalidDigest { field: &'static str, len: usize },

    #[error("{axis} {value} out of range [-{max}, {max}] (degrees x 1e6)")]
    InvalidCoordinate { axis: Axis, value: i64, max: i64 },
}

/// Errors in encoding and decoding canonical records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("event id mismatch at seq {seq}: expected {expected}, got {actual}")]
    EventIdMismatch {
        seq: u64,
        expected: String,
        actual: String,
    },

    #[error("broken audit chain at seq {seq}: {reason}")]
    BrokenChain { seq: u64, reason: String },

    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),
}
