//! # Clairo Testkit
//!
//! Testing utilities for the Clairo registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known inputs with expected digests and canonical bytes
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A registry over a memory store with a manual clock
//!
//! ## Golden Vectors
//!
//! ```rust
//! use clairo_testkit::vectors::{all_vectors, proof_from_vector};
//!
//! for vector in all_vectors() {
//!     let proof = proof_from_vector(&vector);
//!     println!("{}: {}", vector.name, proof.media_hash);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use clairo_testkit::generators::SubmissionParams;
//!
//! proptest! {
//!     #[test]
//!     fn submission_validates(params: SubmissionParams) {
//!         let caller = clairo_core::Submitter::derive("p");
//!         prop_assert!(params.to_submission().validate(caller).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use clairo_testkit::fixtures::{new_york_submission, TestFixture};
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     let proof = fixture.submit("alice", &new_york_submission()).await.unwrap();
//!     fixture.tick(60);
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{new_york_submission, submission_for, text_digest, TestFixture};
pub use generators::SubmissionParams;
pub use vectors::{all_vectors, proof_from_vector, verify_all_vectors, GoldenVector};
