//! FHE Key Management with Real TFHE-rs
//!
//! - ClientKey: encryption and decryption (held off-core by the key owner)
//! - ServerKey: homomorphic evaluation (handed to the engine)

use tfhe::prelude::*;
use tfhe::{generate_keys, ConfigBuilder, FheUint64};
use tfhe::{ClientKey as TfheClientKey, ServerKey as TfheServerKey};

use super::operations::{TfheBackend, TfheUint};
use crate::backend::FheClient;
use crate::ciphertext::{Ciphertext, FheType};
use crate::{FheConfig, FheError, FheResult};

fn config_hash(config: &FheConfig) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"shroud-fhe-config-v1");
    hasher.update(&config.security_bits.to_le_bytes());
    *hasher.finalize().as_bytes()
}

/// Client key for encryption and decryption
/// This key must be kept secret by the balance owner
#[derive(Clone)]
pub struct ClientKey {
    pub(crate) inner: TfheClientKey,
    config_hash: [u8; 32],
}

impl ClientKey {
    /// Derive the matching server key
    pub fn derive_server_key(&self) -> ServerKey {
        ServerKey {
            inner: TfheServerKey::new(&self.inner),
            config_hash: self.config_hash,
        }
    }

    /// Get reference to inner TFHE key
    pub fn inner(&self) -> &TfheClientKey {
        &self.inner
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> FheResult<Vec<u8>> {
        Ok(bincode::serialize(&self.inner)?)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8], config: &FheConfig) -> FheResult<Self> {
        let inner: TfheClientKey =
            bincode::deserialize(bytes).map_err(|e| FheError::InvalidKey(e.to_string()))?;
        Ok(Self {
            inner,
            config_hash: config_hash(config),
        })
    }
}

impl FheClient for ClientKey {
    type Backend = TfheBackend;

    fn encrypt(&self, value: u64) -> FheResult<Ciphertext> {
        let encrypted = FheUint64::try_encrypt(value, &self.inner)
            .map_err(|e| FheError::EncryptionFailed(e.to_string()))?;
        let data = bincode::serialize(&encrypted)?;
        Ok(Ciphertext::new(FheType::Uint64, data))
    }

    fn decrypt(&self, value: &TfheUint) -> FheResult<u64> {
        let clear: u64 = value.inner().decrypt(&self.inner);
        Ok(clear)
    }
}

impl std::fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientKey")
            .field("config_hash", &hex::encode(&self.config_hash[..8]))
            .finish()
    }
}

/// Server key for homomorphic operations
/// Can be shared with the engine to compute on encrypted data
#[derive(Clone)]
pub struct ServerKey {
    pub(crate) inner: TfheServerKey,
    config_hash: [u8; 32],
}

impl ServerKey {
    /// Verify this key matches the expected configuration
    pub fn verify_config(&self, config: &FheConfig) -> bool {
        config_hash(config) == self.config_hash
    }

    /// Serialize to bytes (large: tens of MB)
    pub fn to_bytes(&self) -> FheResult<Vec<u8>> {
        Ok(bincode::serialize(&self.inner)?)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8], config: &FheConfig) -> FheResult<Self> {
        let inner: TfheServerKey =
            bincode::deserialize(bytes).map_err(|e| FheError::InvalidKey(e.to_string()))?;
        Ok(Self {
            inner,
            config_hash: config_hash(config),
        })
    }
}

impl std::fmt::Debug for ServerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerKey")
            .field("config_hash", &hex::encode(&self.config_hash[..8]))
            .finish()
    }
}

/// Complete key pair for FHE operations
#[derive(Clone, Debug)]
pub struct KeyPair {
    /// Client key (secret)
    pub client: ClientKey,
    /// Server key (can be shared)
    pub server: ServerKey,
}

impl KeyPair {
    /// Generate a new key pair
    ///
    /// WARNING: Key generation is slow (seconds)
    pub fn generate(config: &FheConfig) -> FheResult<Self> {
        if config.security_bits < 128 {
            return Err(FheError::ConfigError(format!(
                "security level {} below the 128-bit TFHE-rs default",
                config.security_bits
            )));
        }

        let (client_key, server_key) = generate_keys(ConfigBuilder::default().build());
        let config_hash = config_hash(config);

        tracing::debug!("Generated TFHE key pair ({})", hex::encode(&config_hash[..8]));

        Ok(Self {
            client: ClientKey {
                inner: client_key,
                config_hash,
            },
            server: ServerKey {
                inner: server_key,
                config_hash,
            },
        })
    }

    /// Engine-side backend bound to this pair's server key
    pub fn backend(&self) -> TfheBackend {
        TfheBackend::new(self.server.clone())
    }
}
