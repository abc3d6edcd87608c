//! SHROUD DeFi Primitives
//!
//! Confidential constant-sum market making over encrypted token ledgers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 ConstantSumPool                      │
//! ├─────────────────────────────────────────────────────┤
//! │  token0 ledger   token1 ledger   LP ledger (pool)    │
//! │        │               │               │             │
//! │        └───────────────┼───────────────┘             │
//! │                        ▼                             │
//! │        Encrypted reserves (FheBackend values)        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Constant sum**: 1:1 swaps at a 997/1000 payout by default
//! - **Oblivious clamping**: outputs never exceed the opposite reserve
//! - **Split-checked removal**: a split that does not add up pays nothing

pub mod errors;
pub mod pool;

pub use errors::{DeFiError, DeFiResult};
pub use pool::{pool_address, ConstantSumPool, PoolConfig};
