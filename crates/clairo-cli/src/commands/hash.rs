//! Hash command - compute media and metadata digests without submitting.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use clairo_registry::core::{Digest, DigestAlgorithm};

use super::App;
use crate::config::{ClairoConfig, Paths};

/// The algorithm from `--algorithm`, else the config, else SHA-256.
pub fn algorithm(app: &App, explicit: Option<DigestAlgorithm>) -> Result<DigestAlgorithm> {
    if let Some(algorithm) = explicit {
        return Ok(algorithm);
    }
    if Paths::is_initialized(&app.data_dir) {
        return Ok(ClairoConfig::load(&app.data_dir)?.client.digest_algorithm);
    }
    Ok(DigestAlgorithm::default())
}

pub fn hash_file(algorithm: DigestAlgorithm, path: &Path) -> Result<Digest> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Digest::compute(algorithm, &bytes))
}

pub fn run(
    app: &App,
    file: &Path,
    metadata: Option<&str>,
    explicit: Option<DigestAlgorithm>,
    out: &mut dyn Write,
) -> Result<()> {
    let algorithm = algorithm(app, explicit)?;
    let media = hash_file(algorithm, file)?;

    writeln!(out, "algorithm:     {algorithm}")?;
    writeln!(out, "media hash:    {media}")?;
    if let Some(text) = metadata {
        let metadata = Digest::compute(algorithm, text.as_bytes());
        writeln!(out, "metadata hash: {metadata}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::output;

    #[test]
    fn test_hash_file_sha256() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("photo.jpg");
        fs::write(&file, b"abc").unwrap();

        let app = App {
            data_dir: dir.path().join("missing"),
            caller: None,
        };
        let mut out = Vec::new();
        run(&app, &file, Some("abc"), None, &mut out).unwrap();

        let text = output(out);
        let abc = "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert!(text.contains("algorithm:     sha256"));
        assert!(text.contains(&format!("media hash:    {abc}")));
        assert!(text.contains(&format!("metadata hash: {abc}")));
    }

    #[test]
    fn test_algorithm_from_config() {
        let (_dir, app) = crate::commands::testing::app("a");
        let mut config = app.config().unwrap();
        config.client.digest_algorithm = DigestAlgorithm::Blake3;
        config.save(&app.data_dir).unwrap();

        assert_eq!(algorithm(&app, None).unwrap(), DigestAlgorithm::Blake3);
        assert_eq!(
            algorithm(&app, Some(DigestAlgorithm::Sha256)).unwrap(),
            DigestAlgorithm::Sha256
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let app = App {
            data_dir: dir.path().to_path_buf(),
            caller: None,
        };
        assert!(run(&app, &dir.path().join("nope"), None, None, &mut Vec::new()).is_err());
    }
}
