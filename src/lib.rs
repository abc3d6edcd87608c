//! SHROUD: Confidential Tokens and Market Making on FHE
//!
//! This is the root crate that re-exports all SHROUD components for integration
//! testing and provides configuration, logging and deployment helpers.
//!
//! ## Architecture Overview
//!
//! Every balance, reserve and intermediate value is an encrypted 64-bit
//! integer. Operations never branch on secrets: short balances, short reserves
//! and bad removal splits degrade to smaller encrypted amounts instead of
//! failing. Only public facts (proof validity, authorization, plaintext
//! divisors) can make a call fail, and a failed call changes nothing.
//!
//! ## Crate Organization
//!
//! - `shroud-fhe`: encrypted arithmetic substrate and input proofs
//! - `shroud-token`: confidential token ledger with operator grants
//! - `shroud-defi`: constant-sum pool with encrypted reserves
//! - `shroud-contracts`: encrypted calculator

pub mod config;
pub mod deploy;
pub mod logging;

// Re-export all crates for integration testing
pub use shroud_contracts as contracts;
pub use shroud_defi as defi;
pub use shroud_fhe as fhe;
pub use shroud_token as token;

pub use config::{ConfigError, ShroudConfig};
pub use deploy::Deployment;

/// SHROUD version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for convenient imports
pub mod prelude {
    pub use shroud_contracts::{ContractError, EncryptedCalculator, Opcode};
    pub use shroud_defi::{ConstantSumPool, DeFiError, PoolConfig};
    pub use shroud_fhe::{
        Address, ClearBackend, ClearClient, ExternalInput, FheBackend, FheClient, FheError,
        InputBuilder, InputSigner, InputVerifier,
    };
    pub use shroud_token::{CallContext, ConfidentialLedger, LedgerError, TokenMetadata, MAX_OPERATOR_EXPIRY};
}
