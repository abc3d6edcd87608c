//! Encrypted arithmetic interface
//!
//! [`FheBackend`] is the closed operation set everything above the substrate
//! is written against. Comparisons yield an opaque [`FheBackend::Bool`] that
//! can only be fed back into [`FheBackend::select`]; there is no way to read a
//! plaintext condition out of it on the engine side.
//!
//! [`FheClient`] is the key holder's side: encryption of inputs and
//! decryption of results, never used on a write path.

use std::fmt::Debug;

use crate::ciphertext::{Ciphertext, FheType};
use crate::{FheError, FheResult};

/// Homomorphic operations on encrypted 64-bit unsigned integers
pub trait FheBackend {
    /// Encrypted `u64`
    type Uint: Clone + Debug;
    /// Encrypted boolean, consumable only by `select`
    type Bool: Clone + Debug;

    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Lift a public constant into the encrypted domain
    fn encrypt_trivial(&self, value: u64) -> Self::Uint;

    /// `a + b` modulo 2^64
    fn add(&self, a: &Self::Uint, b: &Self::Uint) -> Self::Uint;

    /// `a - b` modulo 2^64
    fn sub(&self, a: &Self::Uint, b: &Self::Uint) -> Self::Uint;

    /// `a * b` modulo 2^64
    fn mul(&self, a: &Self::Uint, b: &Self::Uint) -> Self::Uint;

    /// `a * k` modulo 2^64 for a public `k`
    fn scalar_mul(&self, a: &Self::Uint, k: u64) -> Self::Uint;

    /// `floor(a / k)` for a public non-zero `k`
    fn scalar_div(&self, a: &Self::Uint, k: u64) -> FheResult<Self::Uint>;

    /// `a mod k` for a public non-zero `k`
    fn scalar_rem(&self, a: &Self::Uint, k: u64) -> FheResult<Self::Uint>;

    /// Encrypted `a < b`
    fn lt(&self, a: &Self::Uint, b: &Self::Uint) -> Self::Bool;

    /// Encrypted `a <= b`
    fn le(&self, a: &Self::Uint, b: &Self::Uint) -> Self::Bool;

    /// Encrypted `a == b`
    fn eq(&self, a: &Self::Uint, b: &Self::Uint) -> Self::Bool;

    /// Oblivious mux: `cond ? a : b`
    fn select(&self, cond: &Self::Bool, a: &Self::Uint, b: &Self::Uint) -> Self::Uint;

    /// Backend encoding of a `Uint64` ciphertext body
    fn serialize_uint(&self, value: &Self::Uint) -> FheResult<Vec<u8>>;

    /// Decode a `Uint64` ciphertext body
    fn deserialize_uint(&self, bytes: &[u8]) -> FheResult<Self::Uint>;

    /// Encrypted zero
    fn zero(&self) -> Self::Uint {
        self.encrypt_trivial(0)
    }

    /// `max(a - b, 0)` without revealing whether clamping happened
    fn sub_saturating(&self, a: &Self::Uint, b: &Self::Uint) -> Self::Uint {
        let underflows = self.lt(a, b);
        let diff = self.sub(a, b);
        self.select(&underflows, &self.zero(), &diff)
    }

    /// `min(amount, available)`: the amount a debit can actually move
    fn transferable(&self, amount: &Self::Uint, available: &Self::Uint) -> Self::Uint {
        let short = self.lt(available, amount);
        self.select(&short, available, amount)
    }

    /// Export a value as a tagged wire ciphertext
    fn to_ciphertext(&self, value: &Self::Uint) -> FheResult<Ciphertext> {
        Ok(Ciphertext::new(FheType::Uint64, self.serialize_uint(value)?))
    }

    /// Import a tagged wire ciphertext; the tag must be `Uint64`
    fn from_ciphertext(&self, ct: &Ciphertext) -> FheResult<Self::Uint> {
        ct.expect_type(FheType::Uint64)?;
        self.deserialize_uint(ct.data())
            .map_err(|e| FheError::MalformedInput(e.to_string()))
    }
}

/// Key holder operations for a given backend
pub trait FheClient {
    /// Backend whose values this client encrypts and decrypts
    type Backend: FheBackend;

    /// Encrypt a clear value into a wire ciphertext
    fn encrypt(&self, value: u64) -> FheResult<Ciphertext>;

    /// Decrypt an engine value
    fn decrypt(&self, value: &<Self::Backend as FheBackend>::Uint) -> FheResult<u64>;
}

/// Reject a zero public divisor before any work is done
pub(crate) fn check_divisor(k: u64) -> FheResult<()> {
    if k == 0 {
        return Err(FheError::InvalidScalar("divisor must be non-zero".into()));
    }
    Ok(())
}
