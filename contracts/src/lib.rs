//! SHROUD Encrypted Contracts
//!
//! Contracts whose state is a set of encrypted values driven by proof-bound
//! inputs. Currently the encrypted calculator.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Contract Execution Flow                 │
//! ├─────────────────────────────────────────────────────┤
//! │  ExternalInput (ciphertext + proof)                  │
//! │      ↓                                               │
//! │  InputVerifier (bound to contract, caller)           │
//! │      ↓                                               │
//! │  Opcode on FheBackend values                         │
//! │      ↓                                               │
//! │  Encrypted result slot                               │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod calculator;
pub mod errors;
pub mod opcodes;

pub use calculator::EncryptedCalculator;
pub use errors::{ContractError, ContractResult};
pub use opcodes::Opcode;
