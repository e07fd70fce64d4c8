//! Clairo command-line client.
//!
//! Registers and checks content-authenticity proofs in a local registry.
//!
//! # Quick Start
//!
//! ```bash
//! # Create ./.clairo with config and database
//! clairo init --caller alice
//!
//! # Register a photo taken in New York
//! clairo submit --file photo.jpg --metadata "location=40.7128,-74.0060" \
//!     --lat 40.7128 --lon -74.0060
//!
//! # Check it (defaults to the last submitted hash)
//! clairo verify
//! ```

mod commands;
mod config;
mod output;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clairo_registry::core::DigestAlgorithm;
use commands::submit::SubmitArgs;
use commands::App;

/// Clairo - register and verify content-authenticity proofs.
#[derive(Parser)]
#[command(name = "clairo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Data directory holding clairo.toml and the registry database.
    #[arg(long, global = true, env = "CLAIRO_DATA_DIR", default_value = ".clairo")]
    data_dir: PathBuf,

    /// Caller identity: account label or 0x-prefixed handle. Overrides clairo.toml.
    #[arg(long, global = true, env = "CLAIRO_CALLER")]
    caller: Option<String>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a data directory.
    Init {
        /// Rewrite an existing clairo.toml. Registered proofs are kept.
        #[arg(long)]
        force: bool,
    },

    /// Compute media and metadata digests without submitting.
    Hash {
        /// Media file to hash.
        file: PathBuf,

        /// Metadata text to hash.
        #[arg(long)]
        metadata: Option<String>,

        /// Digest algorithm (sha256, blake3). Defaults to the configured one.
        #[arg(long)]
        algorithm: Option<DigestAlgorithm>,
    },

    /// Register a proof.
    Submit(SubmitArgs),

    /// Check whether a media hash is registered. Exits 1 if not.
    Verify {
        /// Media hash (hex). Defaults to the last submitted hash.
        hash: Option<String>,
    },

    /// Print the proof for a media hash. Exits 1 if not found.
    Get {
        /// Media hash (hex).
        hash: String,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Page through the audit log.
    Events {
        /// Show events after this seq.
        #[arg(long, default_value = "0")]
        since: u64,

        /// Maximum number of events.
        #[arg(long, default_value = "100")]
        limit: usize,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replay the audit log and check it against stored proofs. Exits 1 on issues.
    Audit,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let app = App {
        data_dir: cli.data_dir,
        caller: cli.caller,
    };
    let mut out = io::stdout().lock();

    let ok = match cli.command {
        Commands::Init { force } => commands::init::run(&app, force, &mut out).map(|()| true)?,
        Commands::Hash {
            file,
            metadata,
            algorithm,
        } => commands::hash::run(&app, &file, metadata.as_deref(), algorithm, &mut out)
            .map(|()| true)?,
        Commands::Submit(args) => commands::submit::run(&app, &args, &mut out)
            .await
            .map(|()| true)?,
        Commands::Verify { hash } => commands::verify::run(&app, hash, &mut out).await?,
        Commands::Get { hash, json } => commands::get::run(&app, &hash, json, &mut out).await?,
        Commands::Events { since, limit, json } => {
            commands::events::run(&app, since, limit, json, &mut out)
                .await
                .map(|()| true)?
        }
        Commands::Audit => commands::audit::run(&app, &mut out).await?,
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Logs go to stderr so command output stays pipeable.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "clairo",
            "--data-dir",
            "/tmp/x",
            "submit",
            "--media-hash",
            "00",
            "--metadata",
            "m",
            "--lat",
            "40.7128",
            "--lon",
            "-74.0060",
        ])
        .unwrap();

        let Commands::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.lon, Some(-74.006));
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["clairo", "verify", "-vv", "--caller", "bob"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.caller.as_deref(), Some("bob"));
        assert!(matches!(cli.command, Commands::Verify { hash: None }));
    }

    #[test]
    fn test_parse_algorithm() {
        let cli = Cli::try_parse_from(["clairo", "hash", "f.jpg", "--algorithm", "blake3"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Hash {
                algorithm: Some(DigestAlgorithm::Blake3),
                ..
            }
        ));
    }
}
