//! TFHE-rs backend
//!
//! Production substrate: every encrypted value is a TFHE-rs `FheUint64`
//! and every comparison result an `FheBool`.

mod keys;
mod operations;

pub use keys::{ClientKey, KeyPair, ServerKey};
pub use operations::{TfheBackend, TfheBool, TfheUint};
