//! # Clairo Core
//!
//! Pure primitives for the Clairo registry: digests, proofs, audit events,
//! and canonicalization.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over the registry's data model.
//!
//! ## Key Types
//!
//! - [`Digest`] - An opaque 32-byte digest (media hash, metadata hash)
//! - [`Submitter`] - Identity handle of the caller that registered a proof
//! - [`GeoPoint`] - Fixed-point latitude/longitude (degrees × 1,000,000)
//! - [`Proof`] - The immutable registry record, keyed by media hash
//! - [`AuditEvent`] - One entry of the hash-chained, append-only audit log
//!
//! ## Canonicalization
//!
//! Proofs and audit events are encoded using deterministic CBOR. See the
//! [`canonical`] module.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod event;
pub mod proof;
pub mod types;
pub mod validation;

pub use canonical::{canonical_event_bytes, canonical_proof_bytes, decode_event, decode_proof};
pub use digest::{
    decode_prefixed_hex, has_hex_prefix, strip_hex_prefix, Digest, DigestAlgorithm, DIGEST_LEN,
};
pub use error::{Axis, CoreError, ValidationError};
pub use event::{verify_event_chain, AuditEvent, EventId};
pub use proof::{NewProof, Proof, Submission};
pub use types::{
    degrees_to_fixed, GeoPoint, Submitter, COORDINATE_SCALE, MAX_LATITUDE, MAX_LONGITUDE,
};
pub use validation::{validate_coordinates, validate_digest, validate_submission};
