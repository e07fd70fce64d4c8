//! Audit log verification results.

use std::fmt;

use clairo_core::{CoreError, Digest, EventId};

/// Outcome of replaying the audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Events replayed.
    pub event_count: u64,
    /// Proofs in the store.
    pub proof_count: u64,
    /// Id of the last replayed event.
    pub head: Option<EventId>,
    /// Integrity problems found, in log order.
    pub issues: Vec<AuditIssue>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A single integrity problem in the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditIssue {
    /// Sequence gap or broken `prev_event_id` link.
    BrokenChain { seq: u64, reason: String },
    /// The event's proof differs from the stored record.
    ProofMismatch { seq: u64, media_hash: Digest },
    /// The event names a media hash the store doesn't have.
    MissingProof { seq: u64, media_hash: Digest },
    /// Every proof should have exactly one event.
    CountMismatch { events: u64, proofs: u64 },
    /// The store's recorded head is not where the replay ended.
    HeadMismatch {
        recorded: Option<(u64, EventId)>,
        replayed: Option<(u64, EventId)>,
    },
}

impl AuditIssue {
    pub(crate) fn from_chain_error(err: CoreError) -> Self {
        match err {
            CoreError::BrokenChain { seq, reason } => AuditIssue::BrokenChain { seq, reason },
            other => AuditIssue::BrokenChain {
                seq: 0,
                reason: other.to_string(),
            },
        }
    }
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditIssue::BrokenChain { seq, reason } => {
                write!(f, "seq {seq}: broken chain: {reason}")
            }
            AuditIssue::ProofMismatch { seq, media_hash } => {
                write!(f, "seq {seq}: event differs from stored proof {media_hash}")
            }
            AuditIssue::MissingProof { seq, media_hash } => {
                write!(f, "seq {seq}: no stored proof for {media_hash}")
            }
            AuditIssue::CountMismatch { events, proofs } => {
                write!(f, "{events} events but {proofs} proofs")
            }
            AuditIssue::HeadMismatch { recorded, replayed } => {
                write!(
                    f,
                    "store head {} but replay ended at {}",
                    HeadDisplay(recorded),
                    HeadDisplay(replayed)
                )
            }
        }
    }
}

struct HeadDisplay<'a>(&'a Option<(u64, EventId)>);

impl fmt::Display for HeadDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some((seq, id)) => write!(f, "#{seq} {id}"),
            None => f.write_str("(empty)"),
        }
    }
}
