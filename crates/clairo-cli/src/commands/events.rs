//! Events command - page through the audit log.

use std::io::Write;

use anyhow::Result;

use super::App;
use crate::output::{write_event_line, write_json, EventView};

pub async fn run(
    app: &App,
    since: u64,
    limit: usize,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let config = app.config()?;
    let registry = app.open_registry(&config)?;
    let events = registry.events_since(since, limit).await?;

    if json {
        let views: Vec<EventView> = events.iter().map(EventView::from).collect();
        return write_json(out, &views);
    }

    if events.is_empty() {
        writeln!(out, "No events after seq {since}")?;
        return Ok(());
    }
    for event in &events {
        write_event_line(out, event)?;
    }
    if let Some(last) = events.last() {
        writeln!(out, "-- {} events; continue with --since {}", events.len(), last.seq)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{app, output};
    use clairo_registry::core::{Digest, Submission};
    use clairo_registry::{CallContext, Submitter};

    async fn seed(app: &App, count: u8) {
        let config = app.config().unwrap();
        let registry = app.open_registry(&config).unwrap();
        let ctx = CallContext::new(Submitter::derive("alice"), 1_000);
        for n in 1..=count {
            let submission =
                Submission::new(Digest::from_bytes([n; 32]), Digest::from_bytes([0; 32]), 0, 0);
            registry.submit_proof(&ctx, &submission).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_events_paging() {
        let (_dir, app) = app("alice");
        seed(&app, 3).await;

        let mut out = Vec::new();
        run(&app, 1, 10, false, &mut out).await.unwrap();
        let text = output(out);
        assert!(text.starts_with("#2"));
        assert!(text.contains("#3"));
        assert!(text.contains("continue with --since 3"));
    }

    #[tokio::test]
    async fn test_events_json_chain() {
        let (_dir, app) = app("alice");
        seed(&app, 2).await;

        let mut out = Vec::new();
        run(&app, 0, 10, true, &mut out).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let events = json.as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0]["prev_event_id"].is_null());
        assert_eq!(events[1]["prev_event_id"], events[0]["event_id"]);
    }

    #[tokio::test]
    async fn test_events_empty() {
        let (_dir, app) = app("alice");
        let mut out = Vec::new();
        run(&app, 0, 10, false, &mut out).await.unwrap();
        assert_eq!(output(out), "No events after seq 0\n");
    }
}
