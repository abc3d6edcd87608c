//! FHE Error types

use thiserror::Error;

/// Errors that can occur in the encrypted substrate and during input ingestion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FheError {
    /// Proof does not verify, or is bound to another contract/caller
    #[error("Invalid input proof: {0}")]
    InvalidProof(String),

    /// Ciphertext carries the wrong type tag or cannot be decoded
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Public scalar operand violates its precondition
    #[error("Invalid scalar operand: {0}")]
    InvalidScalar(String),

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid key material
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<bincode::Error> for FheError {
    fn from(err: bincode::Error) -> Self {
        FheError::SerializationError(err.to_string())
    }
}
