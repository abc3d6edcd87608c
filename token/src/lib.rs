//! SHROUD Confidential Token
//!
//! Account balances held only as encrypted 64-bit handles, with
//! mint/burn/transfer and time-bounded operator delegation.
//!
//! # Key Features
//!
//! - **Oblivious debits**: burn and transfer move `min(requested, balance)`
//! - **Operator grants**: a holder lets another address move its funds until a timestamp
//! - **Proof-bound inputs**: amounts arrive as ciphertexts bound to (token, caller)

pub mod context;
pub mod errors;
pub mod ledger;
pub mod operator;

pub use context::CallContext;
pub use errors::{LedgerError, LedgerResult};
pub use ledger::{ConfidentialLedger, TokenMetadata, DEFAULT_DECIMALS};
pub use operator::{OperatorGrants, MAX_OPERATOR_EXPIRY};
