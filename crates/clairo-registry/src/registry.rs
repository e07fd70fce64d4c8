//! The Registry: submit, verify and retrieve proofs.
//!
//! The Registry wraps a [`ProofStore`] with caller validation, the access
//! policy, and a live feed of audit events.

use std::sync::Arc;

use tokio::sync::broadcast;

use clairo_core::{verify_event_chain, AuditEvent, Digest, EventId, Proof, Submission, Submitter};
use clairo_store::{CommitOutcome, ProofStore};

use crate::audit::{AuditIssue, AuditReport};
use crate::config::{RegistryConfig, MAX_EVENT_CHANNEL_CAPACITY};
use crate::context::CallContext;
use crate::error::{RegistryError, Result};

/// The main Registry struct.
///
/// Provides:
/// - `submit_proof`: register a media hash, first writer wins
/// - `verify_proof` / `get_proof`: public, side-effect-free lookups
/// - `subscribe` / `events_since`: the audit log, live and durable
///
/// A `Registry` is `Send + Sync`; share it behind an `Arc` to serve
/// concurrent callers.
pub struct Registry<S: ProofStore> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: RegistryConfig,
    /// Live audit feed.
    events: broadcast::Sender<AuditEvent>,
}

impl<S: ProofStore> Registry<S> {
    /// Create a new registry over a store.
    pub fn new(store: S, config: RegistryConfig) -> Self {
        Self::with_store(Arc::new(store), config)
    }

    /// Create a registry over a shared store.
    ///
    /// Out-of-range config values are clamped here; use
    /// [`RegistryConfig::validate`] to reject them instead.
    pub fn with_store(store: Arc<S>, config: RegistryConfig) -> Self {
        let capacity = config
            .event_channel_capacity
            .clamp(1, MAX_EVENT_CHANNEL_CAPACITY);
        let (events, _) = broadcast::channel(capacity);
        Self {
            store,
            config,
            events,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Proof Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a proof for a media hash.
    ///
    /// Checks run in order: access policy, digests, coordinates. Only then is
    /// the store asked to commit. On success the committed proof carries the
    /// store-assigned timestamp and `ctx.caller` as submitter, and its audit
    /// event has been durably appended and published to subscribers.
    ///
    /// Fails with [`RegistryError::DuplicateProof`] if the media hash is
    /// already registered, including by an identical earlier submission. The
    /// existing record is untouched.
    pub async fn submit_proof(&self, ctx: &CallContext, submission: &Submission) -> Result<Proof> {
        if !self.config.access.permits(&ctx.caller) {
            tracing::warn!(caller = %ctx.caller, "rejected submission from unauthorized caller");
            return Err(RegistryError::Unauthorized(ctx.caller));
        }

        let new_proof = submission.validate(ctx.caller)?;

        match self.store.commit_proof(&new_proof, ctx.now).await? {
            CommitOutcome::Committed(event) => {
                tracing::info!(
                    media_hash = %event.proof.media_hash,
                    submitter = %event.proof.submitter,
                    seq = event.seq,
                    timestamp = event.proof.timestamp,
                    "proof committed"
                );
                // No live subscribers is fine; the event is already durable.
                let _ = self.events.send(event);
                Ok(event.proof)
            }
            CommitOutcome::Duplicate { existing } => {
                tracing::warn!(
                    media_hash = %existing.media_hash,
                    caller = %ctx.caller,
                    "duplicate proof rejected"
                );
                Err(RegistryError::DuplicateProof(existing.media_hash))
            }
        }
    }

    /// Whether a proof is registered for `media_hash`.
    ///
    /// Malformed hashes are simply not registered: they yield `false`.
    pub async fn verify_proof(&self, media_hash: &[u8]) -> Result<bool> {
        let Some(media_hash) = parse_media_hash(media_hash) else {
            return Ok(false);
        };
        let found = self.store.has_proof(&media_hash).await?;
        tracing::debug!(media_hash = %media_hash, found, "verify proof");
        Ok(found)
    }

    /// Get the proof for `media_hash`, if registered.
    ///
    /// Malformed hashes yield `None`.
    pub async fn get_proof(&self, media_hash: &[u8]) -> Result<Option<Proof>> {
        let Some(media_hash) = parse_media_hash(media_hash) else {
            return Ok(None);
        };
        let proof = self.store.get_proof(&media_hash).await?;
        tracing::debug!(media_hash = %media_hash, found = proof.is_some(), "get proof");
        Ok(proof)
    }

    /// All proofs registered by a submitter, in commit order.
    pub async fn proofs_by(&self, submitter: &Submitter) -> Result<Vec<Proof>> {
        Ok(self.store.proofs_by_submitter(submitter).await?)
    }

    /// Number of registered proofs.
    pub async fn proof_count(&self) -> Result<u64> {
        Ok(self.store.proof_count().await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Audit Log Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Subscribe to audit events committed from now on.
    ///
    /// Concurrent submissions may be delivered slightly out of `seq` order,
    /// and a slow receiver sees `RecvError::Lagged`. Use [`Self::events_since`]
    /// to fill gaps.
    pub fn subscribe(&self) -> broadcast::Receiver<AuditEvent> {
        self.events.subscribe()
    }

    /// Audit events with `seq > after_seq`, oldest first.
    ///
    /// `limit` is capped at `max_event_page`.
    pub async fn events_since(&self, after_seq: u64, limit: usize) -> Result<Vec<AuditEvent>> {
        let limit = limit.min(self.config.max_event_page.max(1));
        Ok(self.store.events_since(after_seq, limit).await?)
    }

    /// Replay the whole audit log and cross-check it against stored proofs.
    ///
    /// Integrity problems are reported in the returned [`AuditReport`]; only
    /// storage faults are errors.
    pub async fn verify_audit_log(&self) -> Result<AuditReport> {
        let page_size = self.config.max_event_page.max(1);
        let mut report = AuditReport::default();
        let mut anchor: Option<EventId> = None;
        let mut next_seq = 1u64;
        let mut replayed_head: Option<(u64, EventId)> = None;

        loop {
            let page = self.store.events_since(next_seq - 1, page_size).await?;
            let Some(last) = page.last() else {
                break;
            };

            if page[0].seq != next_seq {
                report.issues.push(AuditIssue::BrokenChain {
                    seq: page[0].seq,
                    reason: format!("expected seq {next_seq}"),
                });
            }
            if let Err(e) = verify_event_chain(anchor, &page) {
                report.issues.push(AuditIssue::from_chain_error(e));
            }

            for event in &page {
                let media_hash = event.proof.media_hash;
                match self.store.get_proof(&media_hash).await? {
                    Some(stored) if stored == event.proof => {}
                    Some(_) => report.issues.push(AuditIssue::ProofMismatch {
                        seq: event.seq,
                        media_hash,
                    }),
                    None => report.issues.push(AuditIssue::MissingProof {
                        seq: event.seq,
                        media_hash,
                    }),
                }
            }

            report.event_count += page.len() as u64;
            anchor = Some(last.compute_id());
            replayed_head = anchor.map(|id| (last.seq, id));
            next_seq = last.seq.saturating_add(1);

            if page.len() < page_size {
                break;
            }
        }

        report.head = anchor;
        let recorded_head = self.store.event_head().await?;
        if recorded_head != replayed_head {
            report.issues.push(AuditIssue::HeadMismatch {
                recorded: recorded_head,
                replayed: replayed_head,
            });
        }

        report.proof_count = self.store.proof_count().await?;
        if report.proof_count != report.event_count {
            report.issues.push(AuditIssue::CountMismatch {
                events: report.event_count,
                proofs: report.proof_count,
            });
        }

        if report.is_clean() {
            tracing::info!(events = report.event_count, "audit log verified");
        } else {
            tracing::warn!(issues = report.issues.len(), "audit log has integrity issues");
        }

        Ok(report)
    }
}

fn parse_media_hash(bytes: &[u8]) -> Option<Digest> {
    match Digest::try_from(bytes) {
        Ok(digest) => Some(digest),
        Err(_) => {
            tracing::debug!(len = bytes.len(), "lookup with malformed media hash");
            None
        }
    }
}
