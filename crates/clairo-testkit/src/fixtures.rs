//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use clairo_core::{Digest, DigestAlgorithm, Proof, Submission, Submitter};
use clairo_registry::{CallContext, FixedClock, Registry, RegistryConfig};
use clairo_store::MemoryStore;

/// Clock reading a fresh fixture starts at (2025-01-14T16:00:00Z).
pub const FIXTURE_START: u64 = 1_736_870_400;

/// A registry over a memory store, driven by a manual clock.
pub struct TestFixture {
    pub registry: Registry<MemoryStore>,
    pub clock: FixedClock,
}

impl TestFixture {
    /// Create a new fixture with an open registry.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            registry: Registry::new(MemoryStore::new(), config),
            clock: FixedClock::new(FIXTURE_START),
        }
    }

    /// Derive a caller identity from a label.
    pub fn caller(label: &str) -> Submitter {
        Submitter::derive(label)
    }

    /// Call context for `label` at the current clock reading.
    pub fn ctx(&self, label: &str) -> CallContext {
        CallContext::with_clock(Self::caller(label), &self.clock)
    }

    /// Advance the clock.
    pub fn tick(&self, secs: u64) -> u64 {
        self.clock.advance(secs)
    }

    /// Submit as `label` at the current clock reading.
    pub async fn submit(
        &self,
        label: &str,
        submission: &Submission,
    ) -> clairo_registry::Result<Proof> {
        self.registry.submit_proof(&self.ctx(label), submission).await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA-256 of a string, the way the client hashes text.
pub fn text_digest(text: &str) -> Digest {
    Digest::compute(DigestAlgorithm::Sha256, text.as_bytes())
}

/// A valid submission whose media hash is derived from `name`.
pub fn submission_for(name: &str) -> Submission {
    Submission::new(
        text_digest(name),
        text_digest(&format!("meta:{name}")),
        0,
        0,
    )
}

/// The "photo in New York" submission used throughout the docs.
pub fn new_york_submission() -> Submission {
    Submission::new(
        text_digest("test.jpg"),
        text_digest("location=40.7128,-74.0060"),
        40_712_800,
        -74_006_000,
    )
}
