//! In-memory implementation of the ProofStore trait.
//!
//! Same semantics as SQLite, but everything lives in memory with no
//! persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use clairo_core::{AuditEvent, Digest, EventId, NewProof, Proof, Submitter};

use crate::error::{Result, StoreError};
use crate::traits::{next_commit_timestamp, CommitOutcome, ProofStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock: a
/// commit holds the write guard across the existence check, the proof insert
/// and the audit append.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Proofs indexed by media hash.
    proofs: HashMap<Digest, Proof>,

    /// Submitter index: submitter -> media hashes in commit order.
    by_submitter: HashMap<Submitter, Vec<Digest>>,

    /// The audit log; `events[i].seq == i + 1`.
    events: Vec<AuditEvent>,

    /// Id of the last event in `events`.
    head_id: Option<EventId>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProofStore for MemoryStore {
    async fn commit_proof(&self, proof: &NewProof, now: u64) -> Result<CommitOutcome> {
        let mut inner = self.write()?;

        if let Some(existing) = inner.proofs.get(&proof.media_hash) {
            return Ok(CommitOutcome::Duplicate {
                existing: *existing,
            });
        }

        let last_timestamp = inner.events.last().map(|e| e.proof.timestamp);
        let committed = proof.commit_at(next_commit_timestamp(now, last_timestamp));

        let event = AuditEvent {
            seq: inner.events.len() as u64 + 1,
            proof: committed,
            prev_event_id: inner.head_id,
        };
        let event_id = event.compute_id();

        inner.proofs.insert(committed.media_hash, committed);
        inner
            .by_submitter
            .entry(committed.submitter)
            .or_default()
            .push(committed.media_hash);
        inner.events.push(event);
        inner.head_id = Some(event_id);

        Ok(CommitOutcome::Committed(event))
    }

    async fn get_proof(&self, media_hash: &Digest) -> Result<Option<Proof>> {
        let inner = self.read()?;
        Ok(inner.proofs.get(media_hash).copied())
    }

    async fn has_proof(&self, media_hash: &Digest) -> Result<bool> {
        let inner = self.read()?;
        Ok(inner.proofs.contains_key(media_hash))
    }

    async fn proofs_by_submitter(&self, submitter: &Submitter) -> Result<Vec<Proof>> {
        let inner = self.read()?;
        Ok(inner
            .by_submitter
            .get(submitter)
            .map(|hashes| {
                hashes
                    .iter()
                    .filter_map(|h| inner.proofs.get(h).copied())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn proof_count(&self) -> Result<u64> {
        let inner = self.read()?;
        Ok(inner.proofs.len() as u64)
    }

    async fn events_since(&self, after_seq: u64, limit: usize) -> Result<Vec<AuditEvent>> {
        let inner = self.read()?;
        let start = usize::try_from(after_seq)
            .unwrap_or(usize::MAX)
            .min(inner.events.len());
        Ok(inner.events[start..].iter().take(limit).copied().collect())
    }

    async fn event_head(&self) -> Result<Option<(u64, EventId)>> {
        let inner = self.read()?;
        Ok(inner
            .head_id
            .map(|id| (inner.events.len() as u64, id)))
    }
}
