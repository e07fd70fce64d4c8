//! Rendering of proofs and audit events.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use clairo_registry::core::{AuditEvent, Proof};

/// JSON shape of a proof: digests as `0x` hex, coordinates both ways.
#[derive(Debug, Serialize)]
pub struct ProofView {
    pub media_hash: String,
    pub metadata_hash: String,
    pub latitude: i32,
    pub longitude: i32,
    pub latitude_degrees: f64,
    pub longitude_degrees: f64,
    pub timestamp: u64,
    pub submitter: String,
}

impl From<&Proof> for ProofView {
    fn from(proof: &Proof) -> Self {
        Self {
            media_hash: proof.media_hash.to_string(),
            metadata_hash: proof.metadata_hash.to_string(),
            latitude: proof.latitude(),
            longitude: proof.longitude(),
            latitude_degrees: proof.location.latitude_degrees(),
            longitude_degrees: proof.location.longitude_degrees(),
            timestamp: proof.timestamp,
            submitter: proof.submitter.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventView {
    pub seq: u64,
    pub event_id: String,
    pub prev_event_id: Option<String>,
    pub proof: ProofView,
}

impl From<&AuditEvent> for EventView {
    fn from(event: &AuditEvent) -> Self {
        Self {
            seq: event.seq,
            event_id: event.compute_id().to_hex(),
            prev_event_id: event.prev_event_id.map(|id| id.to_hex()),
            proof: ProofView::from(&event.proof),
        }
    }
}

pub fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_proof(out: &mut dyn Write, proof: &Proof) -> Result<()> {
    writeln!(out, "  media hash:    {}", proof.media_hash)?;
    writeln!(out, "  metadata hash: {}", proof.metadata_hash)?;
    writeln!(
        out,
        "  location:      {} ({}, {})",
        proof.location,
        proof.latitude(),
        proof.longitude()
    )?;
    writeln!(out, "  timestamp:     {} (unix seconds)", proof.timestamp)?;
    writeln!(out, "  submitter:     {}", proof.submitter)?;
    Ok(())
}

pub fn write_event_line(out: &mut dyn Write, event: &AuditEvent) -> Result<()> {
    writeln!(
        out,
        "#{:<6} {}  media {}  by {}  at {}",
        event.seq,
        event.compute_id(),
        event.proof.media_hash,
        event.proof.submitter,
        event.proof.timestamp
    )?;
    Ok(())
}
