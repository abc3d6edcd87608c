//! Wire form of encrypted values
//!
//! A [`Ciphertext`] is what crosses the boundary between an off-core client
//! and the engine: the serialized backend value plus its type tag.

use serde::{Deserialize, Serialize};

use crate::{FheError, FheResult};

/// Type tag carried by every serialized ciphertext
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FheType {
    Bool = 0,
    Uint8 = 2,
    Uint16 = 3,
    Uint32 = 4,
    Uint64 = 5,
    Uint128 = 6,
}

impl FheType {
    /// Bit width of the plaintext domain
    pub fn bits(&self) -> u16 {
        match self {
            FheType::Bool => 1,
            FheType::Uint8 => 8,
            FheType::Uint16 => 16,
            FheType::Uint32 => 32,
            FheType::Uint64 => 64,
            FheType::Uint128 => 128,
        }
    }

    /// Single-byte encoding used in proof transcripts
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }
}

/// Serialized encrypted value with its type tag
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    fhe_type: FheType,
    data: Vec<u8>,
}

impl Ciphertext {
    /// Wrap backend bytes with a type tag
    pub fn new(fhe_type: FheType, data: Vec<u8>) -> Self {
        Self { fhe_type, data }
    }

    /// Type tag
    pub fn fhe_type(&self) -> FheType {
        self.fhe_type
    }

    /// Serialized backend bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Short content digest, usable as a public handle for logs
    pub fn handle(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[self.fhe_type.as_byte()]);
        hasher.update(&self.data);
        *hasher.finalize().as_bytes()
    }

    /// Fail with `MalformedInput` unless the tag is `expected`
    pub fn expect_type(&self, expected: FheType) -> FheResult<()> {
        if self.fhe_type != expected {
            return Err(FheError::MalformedInput(format!(
                "expected {}-bit ciphertext, got {:?}",
                expected.bits(),
                self.fhe_type
            )));
        }
        Ok(())
    }

    /// Encode for transport
    pub fn to_bytes(&self) -> FheResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from transport bytes
    pub fn from_bytes(bytes: &[u8]) -> FheResult<Self> {
        bincode::deserialize(bytes).map_err(|e| FheError::MalformedInput(e.to_string()))
    }
}

impl std::fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ciphertext")
            .field("type", &self.fhe_type)
            .field("size", &self.data.len())
            .field("handle", &hex::encode(&self.handle()[..8]))
            .finish()
    }
}
