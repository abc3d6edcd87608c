//! SHROUD FHE substrate
//!
//! Encrypted 64-bit unsigned arithmetic behind a closed operation set, plus
//! ingestion of proof-bound client inputs.
//!
//! # Key Features:
//! - [`FheBackend`]: add, sub, mul, scalar mul/div/rem, compare, select
//! - [`FheBackend::transferable`]: `min(amount, available)` for every debit
//! - Two backends: TFHE-rs ([`TfheBackend`]) and clear mock ([`ClearBackend`])
//! - [`InputVerifier`]: ed25519 proofs binding ciphertexts to (contract, caller)
//!
//! # Architecture:
//! - ClientKey: encryption/decryption, held off-core by the key owner
//! - ServerKey: homomorphic evaluation, held by the engine
//! - InputSigner / InputVerifier: attest and check input bindings

pub mod address;
pub mod backend;
pub mod ciphertext;
pub mod clear;
pub mod errors;
pub mod input;
mod real_impl;

pub use address::Address;
pub use backend::{FheBackend, FheClient};
pub use ciphertext::{Ciphertext, FheType};
pub use clear::{ClearBackend, ClearBool, ClearClient, ClearUint};
pub use errors::FheError;
pub use input::{ExternalInput, InputBuilder, InputProof, InputSigner, InputVerifier};
pub use real_impl::*;

use serde::{Deserialize, Serialize};

/// Which substrate the engine evaluates with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// TFHE-rs
    Tfhe,
    /// Plaintext mock with identical semantics
    Clear,
}

impl BackendKind {
    /// Matches [`FheBackend::name`] of the corresponding backend
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Tfhe => "tfhe",
            BackendKind::Clear => "clear",
        }
    }
}

/// FHE Configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FheConfig {
    /// Substrate selection
    pub backend: BackendKind,
    /// Security parameter (bits)
    pub security_bits: u32,
}

impl Default for FheConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Tfhe,
            security_bits: 128,
        }
    }
}

/// Result type for FHE operations
pub type FheResult<T> = Result<T, FheError>;
