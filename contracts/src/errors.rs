//! Error types for encrypted contracts

use shroud_fhe::FheError;
use thiserror::Error;

/// Errors that can occur during contract operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Operation expects a plaintext operand but got none, or vice versa
    #[error("Operand mismatch: {op} takes {expected}")]
    OperandMismatch { op: &'static str, expected: &'static str },

    #[error(transparent)]
    Fhe(#[from] FheError),
}

/// Result type for contract operations
pub type ContractResult<T> = Result<T, ContractError>;
