//! # Clairo Store
//!
//! Storage abstraction for the Clairo registry. Provides a trait-based
//! interface for proof persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store abstracts the "commit a state change" and "read current state"
//! primitives behind the [`ProofStore`] trait, so the registry is
//! storage-agnostic. The primary implementation is [`SqliteStore`], with
//! [`MemoryStore`] for tests and ephemeral registries.
//!
//! ## Key Types
//!
//! - [`ProofStore`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage
//! - [`CommitOutcome`] - Result of committing a proof
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clairo_store::{SqliteStore, ProofStore};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("clairo.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     println!("{} proofs", store.proof_count().await.unwrap());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Create-if-absent**: committing a proof for a known media hash returns
//!   `Duplicate` and changes nothing
//! - **Atomic audit append**: the proof row and its audit event are written in
//!   one unit; neither is visible without the other
//! - **Commit clock**: commit timestamps never decrease in commit order

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{next_commit_timestamp, CommitOutcome, ProofStore};
