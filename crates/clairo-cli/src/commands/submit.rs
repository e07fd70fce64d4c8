//! Submit command - register a proof as the configured caller.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use clairo_registry::core::{degrees_to_fixed, Digest, Submission};
use clairo_registry::{CallContext, SystemClock};

use super::{decode_hex, hash, App};
use crate::config::remember_last_submitted;
use crate::output::{write_json, write_proof, ProofView};

#[derive(Debug, Clone, Args)]
pub struct SubmitArgs {
    /// Media file to hash and register.
    #[arg(long, required_unless_present = "media_hash", conflicts_with = "media_hash")]
    pub file: Option<PathBuf>,

    /// Precomputed media hash (hex, optional 0x prefix).
    #[arg(long)]
    pub media_hash: Option<String>,

    /// Metadata text to hash (e.g. "location=40.7128,-74.0060").
    #[arg(long, required_unless_present = "metadata_hash", conflicts_with = "metadata_hash")]
    pub metadata: Option<String>,

    /// Precomputed metadata hash (hex, optional 0x prefix).
    #[arg(long)]
    pub metadata_hash: Option<String>,

    /// Latitude in degrees.
    #[arg(
        long,
        allow_negative_numbers = true,
        required_unless_present = "lat_e6",
        conflicts_with = "lat_e6"
    )]
    pub lat: Option<f64>,

    /// Longitude in degrees.
    #[arg(
        long,
        allow_negative_numbers = true,
        required_unless_present = "lon_e6",
        conflicts_with = "lon_e6"
    )]
    pub lon: Option<f64>,

    /// Latitude in micro-degrees (degrees x 1,000,000).
    #[arg(long, allow_negative_numbers = true)]
    pub lat_e6: Option<i64>,

    /// Longitude in micro-degrees (degrees x 1,000,000).
    #[arg(long, allow_negative_numbers = true)]
    pub lon_e6: Option<i64>,

    /// Print the committed proof as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SubmitArgs {
    /// Resolve hashes and coordinates into a raw submission.
    ///
    /// Digest lengths and coordinate ranges are left for the registry to
    /// check, so its errors reach the user unchanged.
    fn to_submission(&self, app: &App) -> Result<Submission> {
        let algorithm = hash::algorithm(app, None)?;

        let media_hash = match (&self.file, &self.media_hash) {
            (Some(file), _) => hash::hash_file(algorithm, file)?.0.to_vec(),
            (None, Some(hex)) => decode_hex(hex)?,
            (None, None) => anyhow::bail!("either --file or --media-hash is required"),
        };

        let metadata_hash = match (&self.metadata, &self.metadata_hash) {
            (Some(text), _) => Digest::compute(algorithm, text.as_bytes()).0.to_vec(),
            (None, Some(hex)) => decode_hex(hex)?,
            (None, None) => anyhow::bail!("either --metadata or --metadata-hash is required"),
        };

        let latitude = self
            .lat_e6
            .or(self.lat.map(degrees_to_fixed))
            .context("either --lat or --lat-e6 is required")?;
        let longitude = self
            .lon_e6
            .or(self.lon.map(degrees_to_fixed))
            .context("either --lon or --lon-e6 is required")?;

        Ok(Submission {
            media_hash,
            metadata_hash,
            latitude,
            longitude,
        })
    }
}

pub async fn run(app: &App, args: &SubmitArgs, out: &mut dyn Write) -> Result<()> {
    let config = app.config()?;
    let caller = app.caller(&config)?;
    let submission = args.to_submission(app)?;
    let registry = app.open_registry(&config)?;

    let ctx = CallContext::with_clock(caller, &SystemClock);
    let proof = registry
        .submit_proof(&ctx, &submission)
        .await
        .context("Submission rejected")?;

    // The proof is already committed here.
    if let Err(e) = remember_last_submitted(&app.data_dir, &proof.media_hash) {
        tracing::warn!(error = %e, "could not record last submitted hash");
    }

    if args.json {
        write_json(out, &ProofView::from(&proof))?;
    } else {
        writeln!(out, "Proof registered")?;
        write_proof(out, &proof)?;
    }
    Ok(())
}
