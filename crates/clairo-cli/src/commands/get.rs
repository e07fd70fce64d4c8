//! Get command - print the registered proof for a media hash.

use std::io::Write;

use anyhow::Result;

use super::{decode_hex, App};
use crate::output::{write_json, write_proof, ProofView};

/// Returns whether a proof was found.
pub async fn run(app: &App, hash: &str, json: bool, out: &mut dyn Write) -> Result<bool> {
    let config = app.config()?;
    let bytes = decode_hex(hash)?;
    let registry = app.open_registry(&config)?;

    let Some(proof) = registry.get_proof(&bytes).await? else {
        if json {
            writeln!(out, "null")?;
        } else {
            writeln!(out, "not found: {hash}")?;
        }
        return Ok(false);
    };

    if json {
        write_json(out, &ProofView::from(&proof))?;
    } else {
        writeln!(out, "Proof for {}", proof.media_hash)?;
        write_proof(out, &proof)?;
    }
    Ok(true)
}
