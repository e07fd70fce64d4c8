//! Error types for the Registry.

use clairo_core::{Axis, Digest, Submitter, ValidationError};
use clairo_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A hash argument is not a 32-byte digest.
    #[error("invalid digest for {field}: expected 32 bytes, got {len}")]
    InvalidDigest { field: &'static str, len: usize },

    /// A coordinate is outside its allowed range.
    #[error("{axis} {value} out of range [-{max}, {max}] (degrees x 1e6)")]
    InvalidCoordinate { axis: Axis, value: i64, max: i64 },

    /// A proof for this media hash is already registered.
    #[error("proof already registered for media hash {0}")]
    DuplicateProof(Digest),

    /// The access policy does not admit this caller.
    #[error("caller {0} is not authorized to submit proofs")]
    Unauthorized(Submitter),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Whether the caller can fix this by changing its request.
    ///
    /// Everything except a storage fault is a caller error, and none of them
    /// change registry state.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, RegistryError::Store(_))
    }
}

impl From<ValidationError> for RegistryError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidDigest { field, len } => {
                RegistryError::InvalidDigest { field, len }
            }
            ValidationError::InvalidCoordinate { axis, value, max } => {
                RegistryError::InvalidCoordinate { axis, value, max }
            }
        }
    }
}

/// Result type for Registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
