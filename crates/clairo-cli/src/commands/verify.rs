//! Verify command - check whether a media hash is registered.

use std::io::Write;

use anyhow::Result;

use super::{decode_hex, App};
use crate::output::write_proof;

/// Returns whether the hash is registered.
pub async fn run(app: &App, hash: Option<String>, out: &mut dyn Write) -> Result<bool> {
    let config = app.config()?;
    let hash = app.hash_or_last(hash)?;
    let bytes = decode_hex(&hash)?;
    let registry = app.open_registry(&config)?;

    if !registry.verify_proof(&bytes).await? {
        writeln!(out, "NOT FOUND: {hash}")?;
        return Ok(false);
    }

    writeln!(out, "VERIFIED: {hash}")?;
    if let Some(proof) = registry.get_proof(&bytes).await? {
        write_proof(out, &proof)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::submit::{self, SubmitArgs};
    use crate::commands::testing::{app, output};

    fn submit_args(media: &str) -> SubmitArgs {
        SubmitArgs {
            file: None,
            media_hash: Some(media.to_string()),
            metadata: Some("location=40.7128,-74.0060".into()),
            metadata_hash: None,
            lat: None,
            lon: None,
            lat_e6: Some(40_712_800),
            lon_e6: Some(-74_006_000),
            json: false,
        }
    }

    #[tokio::test]
    async fn test_verify_last_submitted() {
        let (_dir, app) = app("alice");
        let media = format!("0x{}", "ab".repeat(32));
        submit::run(&app, &submit_args(&media), &mut Vec::new())
            .await
            .unwrap();

        let mut out = Vec::new();
        assert!(run(&app, None, &mut out).await.unwrap());
        let text = output(out);
        assert!(text.starts_with(&format!("VERIFIED: {media}")));
        assert!(text.contains("40.712800°"));
    }

    #[tokio::test]
    async fn test_verify_unknown_and_malformed() {
        let (_dir, app) = app("alice");

        let mut out = Vec::new();
        let unknown = format!("0x{}", "cd".repeat(32));
        assert!(!run(&app, Some(unknown.clone()), &mut out).await.unwrap());
        assert_eq!(output(out), format!("NOT FOUND: {unknown}\n"));

        // Wrong length is simply not registered.
        assert!(!run(&app, Some("0x1234".into()), &mut Vec::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_without_hash_or_history() {
        let (_dir, app) = app("alice");
        assert!(run(&app, None, &mut Vec::new()).await.is_err());
    }
}
