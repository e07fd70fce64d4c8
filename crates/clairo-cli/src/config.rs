//! Client configuration and data directory layout.
//!
//! ```text
//! <data-dir>/
//! ├── clairo.toml      # configuration
//! ├── clairo.db        # SQLite registry
//! └── last_submitted   # media hash of the most recent submission
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use clairo_registry::core::{has_hex_prefix, Digest, DigestAlgorithm, Submitter};
use clairo_registry::RegistryConfig;

const CONFIG_FILE: &str = "clairo.toml";
const DATABASE_FILE: &str = "clairo.db";
const LAST_SUBMITTED_FILE: &str = "last_submitted";

/// Contents of `clairo.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClairoConfig {
    pub registry: RegistryConfig,
    pub client: ClientConfig,
}

/// The `[client]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Account label or `0x`-prefixed 32-byte handle.
    pub caller: String,
    /// Digest producer for `hash` and `submit --file`.
    pub digest_algorithm: DigestAlgorithm,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            caller: "default".to_string(),
            digest_algorithm: DigestAlgorithm::Sha256,
        }
    }
}

impl ClairoConfig {
    /// Load `clairo.toml` from an initialized data directory.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = Paths::config_file(data_dir);
        if !path.exists() {
            anyhow::bail!(
                "{} is not initialized (no {CONFIG_FILE}); run `clairo init` first",
                data_dir.display()
            );
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .registry
            .validate()
            .with_context(|| format!("Invalid [registry] section in {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let path = Paths::config_file(data_dir);
        let text = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Well-known paths inside a data directory.
pub struct Paths;

impl Paths {
    pub fn config_file(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    pub fn database_file(data_dir: &Path) -> PathBuf {
        data_dir.join(DATABASE_FILE)
    }

    pub fn last_submitted_file(data_dir: &Path) -> PathBuf {
        data_dir.join(LAST_SUBMITTED_FILE)
    }

    pub fn is_initialized(data_dir: &Path) -> bool {
        Self::config_file(data_dir).exists()
    }
}

/// Resolve a caller from config or `--caller`.
///
/// A `0x`- or `0X`-prefixed 64-digit hex string is taken as a raw handle; anything
/// else is an account label.
pub fn resolve_caller(caller: &str) -> Result<Submitter> {
    let caller = caller.trim();
    if caller.is_empty() {
        anyhow::bail!("caller must not be empty");
    }
    if has_hex_prefix(caller) {
        return Submitter::from_hex(caller)
            .with_context(|| format!("Invalid caller handle {caller:?}"));
    }
    Ok(Submitter::derive(caller))
}

/// Record the media hash of the latest successful submission.
pub fn remember_last_submitted(data_dir: &Path, media_hash: &Digest) -> Result<()> {
    let path = Paths::last_submitted_file(data_dir);
    fs::write(&path, format!("{media_hash}\n"))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// The media hash recorded by the latest submission, if any.
pub fn last_submitted(data_dir: &Path) -> Result<Option<String>> {
    let path = Paths::last_submitted_file(data_dir);
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(text.trim().to_string()).filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clairo_registry::AccessPolicy;

    #[test]
    fn test_config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClairoConfig::default();
        config.client.caller = "alice".into();
        config.client.digest_algorithm = DigestAlgorithm::Blake3;
        config.registry.access = AccessPolicy::allow_list([Submitter::derive("alice")]);

        config.save(dir.path()).unwrap();
        assert!(Paths::is_initialized(dir.path()));
        assert_eq!(ClairoConfig::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            Paths::config_file(dir.path()),
            "[client]\ncaller = \"bob\"\n",
        )
        .unwrap();

        let config = ClairoConfig::load(dir.path()).unwrap();
        assert_eq!(config.client.caller, "bob");
        assert_eq!(config.client.digest_algorithm, DigestAlgorithm::Sha256);
        assert_eq!(config.registry, RegistryConfig::default());
    }

    #[test]
    fn test_load_rejects_out_of_range_registry_values() {
        let dir = tempfile::tempdir().unwrap();
        for section in [
            "[registry]\nevent_channel_capacity = 9223372036854775807\n",
            "[registry]\nevent_channel_capacity = 0\n",
            "[registry]\nmax_event_page = 0\n",
        ] {
            fs::write(Paths::config_file(dir.path()), section).unwrap();
            let err = ClairoConfig::load(dir.path()).unwrap_err();
            assert!(
                err.downcast_ref::<clairo_registry::ConfigError>().is_some(),
                "{section}: {err:#}"
            );
        }
    }

    #[test]
    fn test_load_uninitialized_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClairoConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("clairo init"));
    }

    #[test]
    fn test_resolve_caller() {
        assert_eq!(resolve_caller("alice").unwrap(), Submitter::derive("alice"));
        let raw = format!("0x{}", "11".repeat(32));
        assert_eq!(
            resolve_caller(&raw).unwrap(),
            Submitter::from_bytes([0x11; 32])
        );
        let upper = format!("0X{}", "AB".repeat(32));
        assert_eq!(
            resolve_caller(&upper).unwrap(),
            Submitter::from_bytes([0xab; 32])
        );
        assert!(resolve_caller("0x1234").is_err());
        assert!(resolve_caller("  ").is_err());
    }

    #[test]
    fn test_last_submitted() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(last_submitted(dir.path()).unwrap(), None);

        let hash = Digest::from_bytes([0xab; 32]);
        remember_last_submitted(dir.path(), &hash).unwrap();
        assert_eq!(last_submitted(dir.path()).unwrap(), Some(hash.to_string()));
    }
}
