//! Ledger Error Types

use shroud_fhe::{Address, FheError};
use thiserror::Error;

/// Errors that can occur in ledger operations
///
/// Insufficient balance is deliberately absent: debits clamp instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller is not the issuer (mint), or neither owner nor operator (debits)
    #[error("Unauthorized: {caller:?} may not {action} for {account:?}")]
    Unauthorized {
        caller: Address,
        account: Address,
        action: &'static str,
    },

    #[error("Invalid token metadata: {0}")]
    InvalidMetadata(String),

    #[error(transparent)]
    Fhe(#[from] FheError),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
