//! Strong type definitions for the Clairo registry.
//!
//! Identifiers and coordinates are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::digest::decode_prefixed_hex;
use crate::error::{Axis, ValidationError};

/// Fixed-point scale for coordinates: one unit is a micro-degree.
pub const COORDINATE_SCALE: i64 = 1_000_000;

/// Largest accepted absolute latitude, in micro-degrees.
pub const MAX_LATITUDE: i64 = 90 * COORDINATE_SCALE;

/// Largest accepted absolute longitude, in micro-degrees.
pub const MAX_LONGITUDE: i64 = 180 * COORDINATE_SCALE;

/// Identity handle of the caller that submitted a proof.
///
/// The registry never authenticates this value. The calling environment is
/// responsible for supplying a non-forgeable handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Submitter(pub [u8; 32]);

impl Submitter {
    /// Derive a handle from a human-readable account label.
    ///
    /// Useful for local deployments and tests where the environment
    /// identifies callers by name.
    pub fn derive(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"clairo-submitter-v0:");
        hasher.update(label.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string, with or without a leading `0x`.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = decode_prefixed_hex(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Submitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Submitter({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Submitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl From<[u8; 32]> for Submitter {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A geolocation in fixed-point degrees (degrees × 1,000,000).
///
/// A `GeoPoint` can only be built through [`GeoPoint::new`] or
/// [`GeoPoint::from_degrees`], so every value is in range by construction.
/// Deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GeoPointRepr", into = "GeoPointRepr")]
pub struct GeoPoint {
    latitude: i32,
    longitude: i32,
}

impl GeoPoint {
    /// Build from fixed-point micro-degrees, rejecting out-of-range values.
    pub fn new(latitude: i64, longitude: i64) -> Result<Self, ValidationError> {
        check_axis(Axis::Latitude, latitude, MAX_LATITUDE)?;
        check_axis(Axis::Longitude, longitude, MAX_LONGITUDE)?;
        // Both values fit in i32 after the range check.
        Ok(Self {
            latitude: latitude as i32,
            longitude: longitude as i32,
        })
    }

    /// Build from floating-point degrees, rounding to the nearest micro-degree.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        Self::new(degrees_to_fixed(latitude), degrees_to_fixed(longitude))
    }

    /// Latitude in micro-degrees.
    pub const fn latitude(&self) -> i32 {
        self.latitude
    }

    /// Longitude in micro-degrees.
    pub const fn longitude(&self) -> i32 {
        self.longitude
    }

    pub fn latitude_degrees(&self) -> f64 {
        f64::from(self.latitude) / COORDINATE_SCALE as f64
    }

    pub fn longitude_degrees(&self) -> f64 {
        f64::from(self.longitude) / COORDINATE_SCALE as f64
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}°, {:.6}°",
            self.latitude_degrees(),
            self.longitude_degrees()
        )
    }
}

#[derive(Serialize, Deserialize)]
struct GeoPointRepr {
    latitude: i64,
    longitude: i64,
}

impl TryFrom<GeoPointRepr> for GeoPoint {
    type Error = ValidationError;

    fn try_from(repr: GeoPointRepr) -> Result<Self, Self::Error> {
        GeoPoint::new(repr.latitude, repr.longitude)
    }
}

impl From<GeoPoint> for GeoPointRepr {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude.into(),
            longitude: point.longitude.into(),
        }
    }
}

fn check_axis(axis: Axis, value: i64, max: i64) -> Result<(), ValidationError> {
    if (-max..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCoordinate { axis, value, max })
    }
}

/// Convert degrees to micro-degrees, rounding to nearest.
///
/// Does not range-check. Non-finite input maps to a value that never passes
/// validation.
pub fn degrees_to_fixed(degrees: f64) -> i64 {
    if !degrees.is_finite() {
        // NaN and infinities can never be in range.
        return i64::MAX;
    }
    // `as` saturates for values beyond i64, which the range check then rejects.
    (degrees * COORDINATE_SCALE as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geopoint_bounds_inclusive() {
        assert!(GeoPoint::new(MAX_LATITUDE, MAX_LONGITUDE).is_ok());
        assert!(GeoPoint::new(-MAX_LATITUDE, -MAX_LONGITUDE).is_ok());
        assert!(GeoPoint::new(0, 0).is_ok());
    }

    #[test]
    fn test_geopoint_rejects_out_of_range() {
        let err = GeoPoint::new(MAX_LATITUDE + 1, 0).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidCoordinate { axis: Axis::Latitude, .. }
        ));

        let err = GeoPoint::new(0, -MAX_LONGITUDE - 1).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidCoordinate { axis: Axis::Longitude, .. }
        ));
    }

    #[test]
    fn test_geopoint_from_degrees() {
        let p = GeoPoint::from_degrees(40.7128, -74.0060).unwrap();
        assert_eq!(p.latitude(), 40_712_800);
        assert_eq!(p.longitude(), -74_006_000);
        assert!((p.latitude_degrees() - 40.7128).abs() < 1e-9);
    }

    #[test]
    fn test_geopoint_from_degrees_rejects_nan() {
        assert!(GeoPoint::from_degrees(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::from_degrees(0.0, f64::INFINITY).is_err());
        assert!(GeoPoint::from_degrees(1e300, 0.0).is_err());
    }

    #[test]
    fn test_submitter_derive_deterministic() {
        assert_eq!(Submitter::derive("alice"), Submitter::derive("alice"));
        assert_ne!(Submitter::derive("alice"), Submitter::derive("bob"));
    }

    #[test]
    fn test_submitter_from_hex_accepts_upper_prefix() {
        let handle = Submitter::from_bytes([0x5a; 32]);
        let upper = format!("0X{}", handle.to_hex().to_uppercase());
        assert_eq!(Submitter::from_hex(&upper).unwrap(), handle);
    }

    #[test]
    fn test_submitter_hex_roundtrip() {
        let s = Submitter::derive("alice");
        assert_eq!(Submitter::from_hex(&s.to_string()).unwrap(), s);
        assert_eq!(Submitter::from_hex(&s.to_hex()).unwrap(), s);
    }
}
