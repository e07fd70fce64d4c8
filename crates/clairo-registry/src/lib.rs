//! # Clairo Registry
//!
//! A content-authenticity registry: each media hash can be registered once,
//! with a metadata hash, a geolocation, the commit time, and the submitter.
//! Anyone can later check whether a hash is registered and read its record.
//!
//! ## Key Concepts
//!
//! - **Proof**: Immutable. One per media hash, forever. No update or delete.
//! - **First writer wins**: A second submission for the same media hash fails
//!   with `DuplicateProof`, even under concurrent races.
//! - **Commit time**: Assigned by the store, never by the caller, and never
//!   decreasing in commit order.
//! - **Audit log**: Every successful submission appends one hash-chained event.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clairo_registry::{CallContext, Registry, RegistryConfig, SystemClock};
//! use clairo_registry::core::{Digest, DigestAlgorithm, Submission, Submitter};
//! use clairo_registry::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("clairo.db").unwrap();
//!     let registry = Registry::new(store, RegistryConfig::default());
//!
//!     let media = Digest::compute(DigestAlgorithm::Sha256, b"image bytes");
//!     let metadata = Digest::compute(DigestAlgorithm::Sha256, b"location=40.7128,-74.0060");
//!     let submission = Submission::new(media, metadata, 40_712_800, -74_006_000);
//!
//!     let ctx = CallContext::with_clock(Submitter::derive("alice"), &SystemClock);
//!     let proof = registry.submit_proof(&ctx, &submission).await.unwrap();
//!
//!     assert!(registry.verify_proof(proof.media_hash.as_bytes()).await.unwrap());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `clairo_registry::core` - Core primitives (Proof, Digest, etc.)
//! - `clairo_registry::store` - Storage abstraction and SQLite

pub mod audit;
pub mod config;
pub mod context;
pub mod error;
pub mod policy;
pub mod registry;

// Re-export component crates
pub use clairo_core as core;
pub use clairo_store as store;

// Re-export main types for convenience
pub use audit::{AuditIssue, AuditReport};
pub use config::{ConfigError, RegistryConfig};
pub use context::{CallContext, Clock, FixedClock, SystemClock};
pub use error::{RegistryError, Result};
pub use policy::AccessPolicy;
pub use registry::Registry;

// Re-export commonly used core types
pub use clairo_core::{AuditEvent, Digest, DigestAlgorithm, GeoPoint, Proof, Submission, Submitter};
