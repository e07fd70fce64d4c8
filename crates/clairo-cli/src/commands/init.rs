//! Initialize command - creates a data directory with config and database.

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};

use clairo_registry::store::SqliteStore;

use super::App;
use crate::config::{resolve_caller, ClairoConfig, Paths};

/// Create the data directory, `clairo.toml` and the registry database.
///
/// With `force`, an existing `clairo.toml` is rewritten. The database is
/// never reset: registered proofs are permanent.
pub fn run(app: &App, force: bool, out: &mut dyn Write) -> Result<()> {
    let data_dir = &app.data_dir;

    if Paths::is_initialized(data_dir) && !force {
        anyhow::bail!(
            "{} is already initialized; pass --force to rewrite clairo.toml",
            data_dir.display()
        );
    }

    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let mut config = ClairoConfig::default();
    if let Some(caller) = &app.caller {
        config.client.caller = caller.clone();
    }
    let caller = resolve_caller(&config.client.caller)?;
    config.save(data_dir)?;

    // Opening runs the schema migrations.
    let db_path = Paths::database_file(data_dir);
    SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to create database {}", db_path.display()))?;

    tracing::info!(data_dir = %data_dir.display(), "initialized data directory");

    writeln!(out, "Initialized Clairo registry in {}", data_dir.display())?;
    writeln!(out, "  config:   {}", Paths::config_file(data_dir).display())?;
    writeln!(out, "  database: {}", db_path.display())?;
    writeln!(out, "  caller:   {} ({})", config.client.caller, caller)?;
    Ok(())
}
