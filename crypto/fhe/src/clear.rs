//! Clear (mock) backend
//!
//! Carries plaintexts behind the same opaque types and operation set as the
//! TFHE backend, so ledger and pool logic can be exercised at native speed.
//! Nothing here is confidential; it mirrors the semantics, not the security.

use crate::backend::{check_divisor, FheBackend, FheClient};
use crate::ciphertext::{Ciphertext, FheType};
use crate::{FheError, FheResult};

/// Opaque clear-mode `u64`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ClearUint(u64);

impl std::fmt::Debug for ClearUint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ClearUint(<encrypted>)")
    }
}

/// Opaque clear-mode boolean
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ClearBool(bool);

impl std::fmt::Debug for ClearBool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ClearBool(<encrypted>)")
    }
}

/// Mock substrate with plain `u64` arithmetic
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearBackend;

impl ClearBackend {
    pub fn new() -> Self {
        Self
    }
}

impl FheBackend for ClearBackend {
    type Uint = ClearUint;
    type Bool = ClearBool;

    fn name(&self) -> &'static str {
        "clear"
    }

    fn encrypt_trivial(&self, value: u64) -> ClearUint {
        ClearUint(value)
    }

    fn add(&self, a: &ClearUint, b: &ClearUint) -> ClearUint {
        ClearUint(a.0.wrapping_add(b.0))
    }

    fn sub(&self, a: &ClearUint, b: &ClearUint) -> ClearUint {
        ClearUint(a.0.wrapping_sub(b.0))
    }

    fn mul(&self, a: &ClearUint, b: &ClearUint) -> ClearUint {
        ClearUint(a.0.wrapping_mul(b.0))
    }

    fn scalar_mul(&self, a: &ClearUint, k: u64) -> ClearUint {
        ClearUint(a.0.wrapping_mul(k))
    }

    fn scalar_div(&self, a: &ClearUint, k: u64) -> FheResult<ClearUint> {
        check_divisor(k)?;
        Ok(ClearUint(a.0 / k))
    }

    fn scalar_rem(&self, a: &ClearUint, k: u64) -> FheResult<ClearUint> {
        check_divisor(k)?;
        Ok(ClearUint(a.0 % k))
    }

    fn lt(&self, a: &ClearUint, b: &ClearUint) -> ClearBool {
        ClearBool(a.0 < b.0)
    }

    fn le(&self, a: &ClearUint, b: &ClearUint) -> ClearBool {
        ClearBool(a.0 <= b.0)
    }

    fn eq(&self, a: &ClearUint, b: &ClearUint) -> ClearBool {
        ClearBool(a.0 == b.0)
    }

    fn select(&self, cond: &ClearBool, a: &ClearUint, b: &ClearUint) -> ClearUint {
        if cond.0 {
            *a
        } else {
            *b
        }
    }

    fn serialize_uint(&self, value: &ClearUint) -> FheResult<Vec<u8>> {
        Ok(value.0.to_le_bytes().to_vec())
    }

    fn deserialize_uint(&self, bytes: &[u8]) -> FheResult<ClearUint> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| {
            FheError::MalformedInput(format!("expected 8 bytes, got {}", bytes.len()))
        })?;
        Ok(ClearUint(u64::from_le_bytes(raw)))
    }
}

/// Key holder for the clear backend
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearClient;

impl FheClient for ClearClient {
    type Backend = ClearBackend;

    fn encrypt(&self, value: u64) -> FheResult<Ciphertext> {
        Ok(Ciphertext::new(FheType::Uint64, value.to_le_bytes().to_vec()))
    }

    fn decrypt(&self, value: &ClearUint) -> FheResult<u64> {
        Ok(value.0)
    }
}
