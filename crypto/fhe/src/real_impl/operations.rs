//! FHE Homomorphic Operations with Real TFHE-rs
//!
//! TFHE-rs keeps the server key in thread-local storage, so every operation
//! installs it first. Cloning the key only bumps a reference count.

use tfhe::prelude::*;
use tfhe::{set_server_key, FheBool, FheUint64};

use super::keys::ServerKey;
use crate::backend::{check_divisor, FheBackend};
use crate::FheResult;

/// Encrypted 64-bit unsigned integer
#[derive(Clone)]
pub struct TfheUint {
    inner: FheUint64,
}

impl TfheUint {
    /// Wrap a TFHE value
    pub fn from_tfhe(inner: FheUint64) -> Self {
        Self { inner }
    }

    /// Get reference to inner TFHE value
    pub fn inner(&self) -> &FheUint64 {
        &self.inner
    }
}

impl std::fmt::Debug for TfheUint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TfheUint(<encrypted>)")
    }
}

/// Encrypted boolean for comparison results
#[derive(Clone)]
pub struct TfheBool {
    inner: FheBool,
}

impl std::fmt::Debug for TfheBool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TfheBool(<encrypted>)")
    }
}

/// Engine-side TFHE-rs substrate
#[derive(Clone)]
pub struct TfheBackend {
    server_key: ServerKey,
}

impl TfheBackend {
    /// Create a backend evaluating under `server_key`
    pub fn new(server_key: ServerKey) -> Self {
        let backend = Self { server_key };
        backend.install();
        backend
    }

    /// Get reference to server key
    pub fn server_key(&self) -> &ServerKey {
        &self.server_key
    }

    /// Make the server key current on this thread
    pub fn install(&self) {
        set_server_key(self.server_key.inner.clone());
    }

    fn wrap(&self, inner: FheUint64) -> TfheUint {
        TfheUint { inner }
    }
}

impl std::fmt::Debug for TfheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfheBackend")
            .field("server_key", &self.server_key)
            .finish()
    }
}

impl FheBackend for TfheBackend {
    type Uint = TfheUint;
    type Bool = TfheBool;

    fn name(&self) -> &'static str {
        "tfhe"
    }

    fn encrypt_trivial(&self, value: u64) -> TfheUint {
        self.install();
        self.wrap(FheUint64::encrypt_trivial(value))
    }

    fn add(&self, a: &TfheUint, b: &TfheUint) -> TfheUint {
        self.install();
        self.wrap(&a.inner + &b.inner)
    }

    fn sub(&self, a: &TfheUint, b: &TfheUint) -> TfheUint {
        self.install();
        self.wrap(&a.inner - &b.inner)
    }

    fn mul(&self, a: &TfheUint, b: &TfheUint) -> TfheUint {
        self.install();
        self.wrap(&a.inner * &b.inner)
    }

    fn scalar_mul(&self, a: &TfheUint, k: u64) -> TfheUint {
        self.install();
        self.wrap(&a.inner * k)
    }

    fn scalar_div(&self, a: &TfheUint, k: u64) -> FheResult<TfheUint> {
        check_divisor(k)?;
        self.install();
        Ok(self.wrap(&a.inner / k))
    }

    fn scalar_rem(&self, a: &TfheUint, k: u64) -> FheResult<TfheUint> {
        check_divisor(k)?;
        self.install();
        Ok(self.wrap(&a.inner % k))
    }

    fn lt(&self, a: &TfheUint, b: &TfheUint) -> TfheBool {
        self.install();
        TfheBool {
            inner: a.inner.lt(&b.inner),
        }
    }

    fn le(&self, a: &TfheUint, b: &TfheUint) -> TfheBool {
        self.install();
        TfheBool {
            inner: a.inner.le(&b.inner),
        }
    }

    fn eq(&self, a: &TfheUint, b: &TfheUint) -> TfheBool {
        self.install();
        TfheBool {
            inner: a.inner.eq(&b.inner),
        }
    }

    fn select(&self, cond: &TfheBool, a: &TfheUint, b: &TfheUint) -> TfheUint {
        self.install();
        self.wrap(cond.inner.if_then_else(&a.inner, &b.inner))
    }

    fn serialize_uint(&self, value: &TfheUint) -> FheResult<Vec<u8>> {
        Ok(bincode::serialize(&value.inner)?)
    }

    fn deserialize_uint(&self, bytes: &[u8]) -> FheResult<TfheUint> {
        let inner: FheUint64 = bincode::deserialize(bytes)?;
        Ok(self.wrap(inner))
    }
}
