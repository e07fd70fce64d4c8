//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements the subset of RFC 8949 Core Deterministic Encoding
//! that proofs and audit events need:
//! - Integer map keys, written in ascending order
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (coordinates are fixed-point integers)
//!
//! The same proof always produces identical bytes, so event ids are stable
//! across platforms and storage backends.

use ciborium::value::Value;

use crate::digest::Digest;
use crate::error::CoreError;
use crate::event::{AuditEvent, EventId};
use crate::proof::Proof;
use crate::types::{GeoPoint, Submitter};

/// Current encoding version, written into every event.
pub const ENCODING_VERSION: u64 = 0;

/// Proof field keys.
///
/// Keys 0-23 encode as single bytes in CBOR.
mod proof_keys {
    pub const MEDIA_HASH: u64 = 0;
    pub const METADATA_HASH: u64 = 1;
    pub const LATITUDE: u64 = 2;
    pub const LONGITUDE: u64 = 3;
    pub const TIMESTAMP: u64 = 4;
    pub const SUBMITTER: u64 = 5;
    pub const COUNT: u64 = 6;
}

/// Event field keys.
mod event_keys {
    pub const VERSION: u64 = 0;
    pub const SEQ: u64 = 1;
    pub const PROOF: u64 = 2;
    pub const PREV_EVENT_ID: u64 = 3;
    pub const COUNT: u64 = 4;
}

/// Encode a proof to canonical CBOR bytes.
pub fn canonical_proof_bytes(proof: &Proof) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);
    write_proof(&mut buf, proof);
    buf
}

/// Encode an audit event to canonical CBOR bytes.
pub fn canonical_event_bytes(event: &AuditEvent) -> Vec<u8> {
    let mut buf = Vec::with_capacity(192);

    encode_uint(&mut buf, 5, event_keys::COUNT);

    encode_uint(&mut buf, 0, event_keys::VERSION);
    encode_uint(&mut buf, 0, ENCODING_VERSION);

    encode_uint(&mut buf, 0, event_keys::SEQ);
    encode_uint(&mut buf, 0, event.seq);

    encode_uint(&mut buf, 0, event_keys::PROOF);
    write_proof(&mut buf, &event.proof);

    encode_uint(&mut buf, 0, event_keys::PREV_EVENT_ID);
    match &event.prev_event_id {
        Some(id) => encode_bytes(&mut buf, &id.0),
        None => buf.push(0xf6),
    }

    buf
}

fn write_proof(buf: &mut Vec<u8>, proof: &Proof) {
    encode_uint(buf, 5, proof_keys::COUNT);

    encode_uint(buf, 0, proof_keys::MEDIA_HASH);
    encode_bytes(buf, &proof.media_hash.0);

    encode_uint(buf, 0, proof_keys::METADATA_HASH);
    encode_bytes(buf, &proof.metadata_hash.0);

    encode_uint(buf, 0, proof_keys::LATITUDE);
    encode_int(buf, i64::from(proof.location.latitude()));

    encode_uint(buf, 0, proof_keys::LONGITUDE);
    encode_int(buf, i64::from(proof.location.longitude()));

    encode_uint(buf, 0, proof_keys::TIMESTAMP);
    encode_uint(buf, 0, proof.timestamp);

    encode_uint(buf, 0, proof_keys::SUBMITTER);
    encode_bytes(buf, &proof.submitter.0);
}

/// Encode a signed integer (major types 0 and 1).
fn encode_int(buf: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Decode a proof from canonical bytes.
///
/// Rejects anything that does not re-encode to exactly the input bytes.
pub fn decode_proof(bytes: &[u8]) -> Result<Proof, CoreError> {
    let value = parse_value(bytes)?;
    let proof = value_to_proof(&value)?;
    ensure_canonical(bytes, &canonical_proof_bytes(&proof))?;
    Ok(proof)
}

/// Decode an audit event from canonical bytes.
pub fn decode_event(bytes: &[u8]) -> Result<AuditEvent, CoreError> {
    let value = parse_value(bytes)?;
    let map = as_map(&value, "event")?;

    let version = get_u64(map, event_keys::VERSION, "version")?;
    if version != ENCODING_VERSION {
        return Err(CoreError::MalformedRecord(format!(
            "unsupported encoding version: {version}"
        )));
    }

    let seq = get_u64(map, event_keys::SEQ, "seq")?;
    let proof = value_to_proof(
        get(map, event_keys::PROOF).ok_or_else(|| missing("proof"))?,
    )?;
    let prev_event_id = match get(map, event_keys::PREV_EVENT_ID) {
        Some(Value::Null) => None,
        Some(Value::Bytes(b)) => Some(EventId(to_array(b, "prev_event_id")?)),
        _ => return Err(missing("prev_event_id")),
    };

    let event = AuditEvent {
        seq,
        proof,
        prev_event_id,
    };
    ensure_canonical(bytes, &canonical_event_bytes(&event))?;
    Ok(event)
}

fn parse_value(bytes: &[u8]) -> Result<Value, CoreError> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

fn value_to_proof(value: &Value) -> Result<Proof, CoreError> {
    let map = as_map(value, "proof")?;

    let media_hash = Digest(get_bytes32(map, proof_keys::MEDIA_HASH, "media_hash")?);
    let metadata_hash = Digest(get_bytes32(map, proof_keys::METADATA_HASH, "metadata_hash")?);
    let latitude = get_i64(map, proof_keys::LATITUDE, "latitude")?;
    let longitude = get_i64(map, proof_keys::LONGITUDE, "longitude")?;
    let timestamp = get_u64(map, proof_keys::TIMESTAMP, "timestamp")?;
    let submitter = Submitter(get_bytes32(map, proof_keys::SUBMITTER, "submitter")?);

    Ok(Proof {
        media_hash,
        metadata_hash,
        location: GeoPoint::new(latitude, longitude)?,
        timestamp,
        submitter,
    })
}

fn ensure_canonical(input: &[u8], reencoded: &[u8]) -> Result<(), CoreError> {
    if input == reencoded {
        Ok(())
    } else {
        Err(CoreError::MalformedRecord(
            "input is not in canonical form".into(),
        ))
    }
}

type Entries = [(Value, Value)];

fn as_map<'a>(value: &'a Value, what: &str) -> Result<&'a Entries, CoreError> {
    match value {
        Value::Map(entries) => Ok(entries),
        _ => Err(CoreError::MalformedRecord(format!("{what}: expected map"))),
    }
}

fn get(map: &Entries, key: u64) -> Option<&Value> {
    map.iter()
        .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
        .map(|(_, v)| v)
}

fn get_u64(map: &Entries, key: u64, name: &str) -> Result<u64, CoreError> {
    match get(map, key) {
        Some(Value::Integer(i)) => u64::try_from(*i)
            .map_err(|_| CoreError::MalformedRecord(format!("{name}: out of range"))),
        _ => Err(missing(name)),
    }
}

fn get_i64(map: &Entries, key: u64, name: &str) -> Result<i64, CoreError> {
    match get(map, key) {
        Some(Value::Integer(i)) => i64::try_from(*i)
            .map_err(|_| CoreError::MalformedRecord(format!("{name}: out of range"))),
        _ => Err(missing(name)),
    }
}

fn get_bytes32(map: &Entries, key: u64, name: &str) -> Result<[u8; 32], CoreError> {
    match get(map, key) {
        Some(Value::Bytes(b)) => to_array(b, name),
        _ => Err(missing(name)),
    }
}

fn to_array(bytes: &[u8], name: &str) -> Result<[u8; 32], CoreError> {
    bytes
        .try_into()
        .map_err(|_| CoreError::MalformedRecord(format!("{name}: expected 32 bytes")))
}

fn missing(name: &str) -> CoreError {
    CoreError::MalformedRecord(format!("missing or invalid {name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::NewProof;

    fn sample_proof() -> Proof {
        NewProof {
            media_hash: Digest::from_bytes([0xab; 32]),
            metadata_hash: Digest::from_bytes([0xcd; 32]),
            location: GeoPoint::new(40_712_800, -74_006_000).unwrap(),
            submitter: Submitter::from_bytes([0x11; 32]),
        }
        .commit_at(1_736_870_400)
    }

    #[test]
    fn test_canonical_proof_deterministic() {
        let proof = sample_proof();
        assert_eq!(canonical_proof_bytes(&proof), canonical_proof_bytes(&proof));
    }

    #[test]
    fn test_proof_roundtrip() {
        let proof = sample_proof();
        let bytes = canonical_proof_bytes(&proof);
        assert_eq!(decode_proof(&bytes).unwrap(), proof);
    }

    #[test]
    fn test_event_roundtrip_with_prev() {
        let event = AuditEvent {
            seq: 7,
            proof: sample_proof(),
            prev_event_id: Some(EventId([0x99; 32])),
        };
        let bytes = canonical_event_bytes(&event);
        assert_eq!(decode_event(&bytes).unwrap(), event);
    }

    #[test]
    fn test_negative_coordinates_use_major_type_1() {
        let bytes = canonical_proof_bytes(&sample_proof());
        // -74_006_000 encodes as major type 1 with a 4-byte argument.
        let encoded = {
            let mut b = Vec::new();
            encode_int(&mut b, -74_006_000);
            b
        };
        assert_eq!(encoded[0], 0x3a);
        assert!(bytes.windows(encoded.len()).any(|w| w == encoded.as_slice()));
    }

    #[test]
    fn test_smallest_integer_encoding() {
        let mut b = Vec::new();
        encode_uint(&mut b, 0, 23);
        assert_eq!(b, vec![0x17]);

        b.clear();
        encode_uint(&mut b, 0, 24);
        assert_eq!(b, vec![0x18, 24]);

        b.clear();
        encode_int(&mut b, -1);
        assert_eq!(b, vec![0x20]);
    }

    #[test]
    fn test_decoded_by_generic_cbor_reader() {
        let bytes = canonical_proof_bytes(&sample_proof());
        let value: Value = ciborium::from_reader(bytes.as_slice()).unwrap();
        assert!(matches!(value, Value::Map(ref m) if m.len() == 6));
    }

    #[test]
    fn test_rejects_non_canonical_input() {
        // Same proof, but the timestamp written with an oversized 8-byte argument.
        let proof = sample_proof();
        let mut bytes = canonical_proof_bytes(&proof);
        let mut ts = Vec::new();
        encode_uint(&mut ts, 0, proof.timestamp);
        let pos = bytes
            .windows(ts.len())
            .position(|w| w == ts.as_slice())
            .unwrap();
        let mut widened = vec![0x1b];
        widened.extend_from_slice(&proof.timestamp.to_be_bytes());
        bytes.splice(pos..pos + ts.len(), widened);

        assert!(matches!(
            decode_proof(&bytes),
            Err(CoreError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_location() {
        let mut bytes = Vec::new();
        encode_uint(&mut bytes, 5, 6);
        encode_uint(&mut bytes, 0, 0);
        encode_bytes(&mut bytes, &[0u8; 32]);
        encode_uint(&mut bytes, 0, 1);
        encode_bytes(&mut bytes, &[0u8; 32]);
        encode_uint(&mut bytes, 0, 2);
        encode_int(&mut bytes, 90_000_001);
        encode_uint(&mut bytes, 0, 3);
        encode_int(&mut bytes, 0);
        encode_uint(&mut bytes, 0, 4);
        encode_uint(&mut bytes, 0, 0);
        encode_uint(&mut bytes, 0, 5);
        encode_bytes(&mut bytes, &[0u8; 32]);

        assert!(matches!(decode_proof(&bytes), Err(CoreError::Invalid(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(decode_event(&[0xff, 0x00, 0x01]).is_err());
        assert!(decode_proof(&[]).is_err());
    }
}
