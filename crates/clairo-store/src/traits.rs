//! ProofStore trait: the abstract interface for proof persistence.
//!
//! This trait allows the registry to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory.

use async_trait::async_trait;
use clairo_core::{AuditEvent, Digest, EventId, NewProof, Proof, Submitter};

use crate::error::Result;

/// Result of committing a proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The proof was committed; this is its audit event.
    Committed(AuditEvent),
    /// A proof for this media hash already exists. Nothing was written.
    Duplicate {
        /// The record that was already committed.
        existing: Proof,
    },
}

/// The ProofStore trait: async interface for proof persistence.
///
/// All methods are async to support both blocking (SQLite) and async
/// backends. For SQLite, blocking work runs on `spawn_blocking`.
///
/// # Design Notes
///
/// - **Atomic create-if-absent**: `commit_proof` checks for the media hash and
///   writes the proof plus its audit event as one indivisible step. Two racing
///   commits for the same key can never both succeed.
/// - **No mutation**: there is no update or delete operation.
/// - **Read isolation**: readers see either the state before or after a
///   commit, never a proof without its event.
#[async_trait]
pub trait ProofStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Proof Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Commit a validated proof.
    ///
    /// # Arguments
    /// - `proof`: The validated proof (everything but the timestamp).
    /// - `now`: The commit clock reading, seconds since the Unix epoch.
    ///
    /// # Returns
    /// - `Committed(event)` if the proof was new. The committed timestamp is
    ///   [`next_commit_timestamp`] of `now` and the previous commit.
    /// - `Duplicate { existing }` if the media hash is already registered.
    async fn commit_proof(&self, proof: &NewProof, now: u64) -> Result<CommitOutcome>;

    /// Get a proof by media hash.
    async fn get_proof(&self, media_hash: &Digest) -> Result<Option<Proof>>;

    /// Check if a proof exists for a media hash.
    async fn has_proof(&self, media_hash: &Digest) -> Result<bool>;

    /// All proofs registered by a submitter, in commit order.
    async fn proofs_by_submitter(&self, submitter: &Submitter) -> Result<Vec<Proof>>;

    /// Number of committed proofs.
    async fn proof_count(&self) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Audit Log Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get up to `limit` audit events with `seq > after_seq`, ordered by seq.
    async fn events_since(&self, after_seq: u64, limit: usize) -> Result<Vec<AuditEvent>>;

    /// The seq and id of the latest audit event, if any.
    async fn event_head(&self) -> Result<Option<(u64, EventId)>>;
}

/// Commit time for the next proof.
///
/// The clock may step backwards (NTP adjustments, a different host); the
/// store never lets a later commit carry an earlier timestamp.
pub fn next_commit_timestamp(now: u64, last: Option<u64>) -> u64 {
    match last {
        Some(last) => now.max(last),
        None => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_commit_timestamp() {
        assert_eq!(next_commit_timestamp(100, None), 100);
        assert_eq!(next_commit_timestamp(100, Some(50)), 100);
        assert_eq!(next_commit_timestamp(100, Some(150)), 150);
    }
}
