//! Audit events: the append-only log of committed proofs.
//!
//! Every successful submission appends exactly one event. Events are
//! hash-chained through `prev_event_id`, so an indexer replaying the log can
//! detect reordering, gaps, or edits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::canonical_event_bytes;
use crate::error::CoreError;
use crate::proof::Proof;

/// A 32-byte event identifier, computed as Blake3(canonical_event_bytes(event)).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub [u8; 32]);

impl EventId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl TryFrom<&[u8]> for EventId {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into()?;
        Ok(Self(arr))
    }
}

/// One entry in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// 1-based position in the log.
    pub seq: u64,
    /// The full committed record.
    pub proof: Proof,
    /// Id of the event at `seq - 1`; `None` only for the first event.
    pub prev_event_id: Option<EventId>,
}

impl AuditEvent {
    /// Compute the content-addressed id of this event.
    pub fn compute_id(&self) -> EventId {
        EventId(*blake3::hash(&canonical_event_bytes(self)).as_bytes())
    }

    /// Whether this is the first event of a log.
    pub fn is_genesis(&self) -> bool {
        self.seq == 1
    }
}

/// Verify a contiguous run of events.
///
/// `anchor` is the id of the event immediately before `events[0]` (`None`
/// when the run starts at seq 1). Returns the id of the last event, or the
/// anchor itself for an empty run.
pub fn verify_event_chain(
    anchor: Option<EventId>,
    events: &[AuditEvent],
) -> Result<Option<EventId>, CoreError> {
    let mut prev = anchor;
    let mut expected_seq: Option<u64> = None;

    for event in events {
        if let Some(seq) = expected_seq {
            if event.seq != seq {
                return Err(CoreError::BrokenChain {
                    seq: event.seq,
                    reason: format!("expected seq {seq}"),
                });
            }
        }
        if event.seq == 0 {
            return Err(CoreError::BrokenChain {
                seq: 0,
                reason: "seq must start at 1".into(),
            });
        }
        if event.is_genesis() != event.prev_event_id.is_none() {
            return Err(CoreError::BrokenChain {
                seq: event.seq,
                reason: "only the first event may omit prev_event_id".into(),
            });
        }
        if event.prev_event_id != prev {
            return Err(CoreError::BrokenChain {
                seq: event.seq,
                reason: format!(
                    "prev_event_id {:?} does not match preceding event {:?}",
                    event.prev_event_id, prev
                ),
            });
        }

        prev = Some(event.compute_id());
        expected_seq = Some(event.seq + 1);
    }

    Ok(prev)
}
