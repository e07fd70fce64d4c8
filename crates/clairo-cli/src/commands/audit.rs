//! Audit command - replay and check the audit log.

use std::io::Write;

use anyhow::Result;

use super::App;

/// Returns whether the log is clean.
pub async fn run(app: &App, out: &mut dyn Write) -> Result<bool> {
    let config = app.config()?;
    let registry = app.open_registry(&config)?;
    let report = registry.verify_audit_log().await?;

    writeln!(out, "events: {}", report.event_count)?;
    writeln!(out, "proofs: {}", report.proof_count)?;
    match report.head {
        Some(head) => writeln!(out, "head:   {}", head.to_hex())?,
        None => writeln!(out, "head:   (empty log)")?,
    }

    if report.is_clean() {
        writeln!(out, "OK: audit log is intact")?;
        return Ok(true);
    }

    writeln!(out, "FAILED: {} issue(s)", report.issues.len())?;
    for issue in &report.issues {
        writeln!(out, "  {issue}")?;
    }
    Ok(false)
}
