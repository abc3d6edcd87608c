//! DeFi Error Types

use shroud_fhe::FheError;
use shroud_token::LedgerError;
use thiserror::Error;

/// Errors that can occur in DeFi operations
///
/// Short balances, short reserves and a mismatched removal split are not
/// errors; they degrade to smaller (possibly zero) encrypted amounts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeFiError {
    #[error("Invalid fee: {numerator}/{denominator}")]
    InvalidFee { numerator: u64, denominator: u64 },

    #[error("Pool tokens must differ: {0}")]
    IdenticalTokens(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Fhe(#[from] FheError),
}

impl DeFiError {
    /// Whether the call was rejected for lack of authority
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DeFiError::Ledger(LedgerError::Unauthorized { .. }))
    }
}

/// Result type for DeFi operations
pub type DeFiResult<T> = Result<T, DeFiError>;
