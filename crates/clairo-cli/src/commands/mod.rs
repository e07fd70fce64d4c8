//! CLI command implementations.

pub mod audit;
pub mod events;
pub mod get;
pub mod hash;
pub mod init;
pub mod submit;
pub mod verify;

use std::path::PathBuf;

use anyhow::{Context, Result};

use clairo_registry::core::{decode_prefixed_hex, Submitter};
use clairo_registry::store::SqliteStore;
use clairo_registry::Registry;

use crate::config::{last_submitted, resolve_caller, ClairoConfig, Paths};

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub struct App {
    pub data_dir: PathBuf,
    /// `--caller` / `CLAIRO_CALLER`, overriding `[client] caller`.
    pub caller: Option<String>,
}

impl App {
    pub fn config(&self) -> Result<ClairoConfig> {
        ClairoConfig::load(&self.data_dir)
    }

    pub fn caller(&self, config: &ClairoConfig) -> Result<Submitter> {
        resolve_caller(self.caller.as_deref().unwrap_or(&config.client.caller))
    }

    pub fn open_registry(&self, config: &ClairoConfig) -> Result<Registry<SqliteStore>> {
        let path = Paths::database_file(&self.data_dir);
        let store = SqliteStore::open(&path)
            .with_context(|| format!("Failed to open registry database {}", path.display()))?;
        Ok(Registry::new(store, config.registry.clone()))
    }

    /// The hash given on the command line, or the last submitted one.
    pub fn hash_or_last(&self, hash: Option<String>) -> Result<String> {
        match hash {
            Some(hash) => Ok(hash),
            None => last_submitted(&self.data_dir)?
                .context("No media hash given and nothing has been submitted yet"),
        }
    }
}

/// Decode hex with an optional `0x` prefix. Length is not checked here.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    decode_prefixed_hex(s).with_context(|| format!("{:?} is not valid hex", s.trim()))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// An initialized data directory in a temp dir.
    pub fn app(caller: &str) -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let app = App {
            data_dir: dir.path().join("data"),
            caller: Some(caller.to_string()),
        };
        std::fs::create_dir_all(&app.data_dir).unwrap();
        ClairoConfig::default().save(&app.data_dir).unwrap();
        (dir, app)
    }

    pub fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("0xabcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex("ABCD").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex(" 0XABCD ").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
        assert!(decode_hex("0xzz").is_err());
    }

    #[test]
    fn test_caller_override() {
        let (_dir, app) = testing::app("carol");
        let config = app.config().unwrap();
        assert_eq!(app.caller(&config).unwrap(), Submitter::derive("carol"));

        let app = App {
            caller: None,
            ..app
        };
        assert_eq!(app.caller(&config).unwrap(), Submitter::derive("default"));
    }

    #[test]
    fn test_hash_or_last_without_history() {
        let (_dir, app) = testing::app("a");
        assert!(app.hash_or_last(None).is_err());
        assert_eq!(app.hash_or_last(Some("0x00".into())).unwrap(), "0x00");
    }
}
