//! Proof-bound encrypted inputs
//!
//! Every encrypted amount a caller submits arrives as an [`ExternalInput`]:
//! a ciphertext plus a proof that it was produced for exactly one
//! (contract, caller) pair. The proof is an ed25519 signature by the trusted
//! input signer over a blake3 transcript of the binding and the ciphertext.
//!
//! [`InputVerifier::ingest`] is the only way an external ciphertext becomes a
//! backend value. It holds no state between calls.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::backend::{FheBackend, FheClient};
use crate::ciphertext::{Ciphertext, FheType};
use crate::{FheError, FheResult};

const TRANSCRIPT_DOMAIN: &[u8] = b"shroud-input-proof-v1";

/// Proof binding a ciphertext to a (contract, caller) pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof {
    signature: Vec<u8>,
}

impl InputProof {
    /// Wrap raw proof bytes as received from a client
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { signature: bytes }
    }

    /// Raw proof bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.signature
    }
}

impl std::fmt::Debug for InputProof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputProof")
            .field("size", &self.signature.len())
            .finish()
    }
}

/// Ciphertext and proof submitted with a call; consumed once by ingestion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalInput {
    pub ciphertext: Ciphertext,
    pub proof: InputProof,
}

fn transcript(ciphertext: &Ciphertext, contract: &Address, caller: &Address) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(TRANSCRIPT_DOMAIN);
    hasher.update(contract.as_bytes());
    hasher.update(caller.as_bytes());
    hasher.update(&[ciphertext.fhe_type().as_byte()]);
    hasher.update(&(ciphertext.data().len() as u64).to_le_bytes());
    hasher.update(ciphertext.data());
    *hasher.finalize().as_bytes()
}

/// Off-core signer attesting that inputs were encrypted for a binding
pub struct InputSigner {
    key: SigningKey,
}

impl InputSigner {
    /// Fresh random signer
    pub fn generate() -> Self {
        Self {
            key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic signer from a 32-byte seed
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(&seed),
        }
    }

    /// Verifier the engine should trust for this signer
    pub fn verifier(&self) -> InputVerifier {
        InputVerifier {
            key: self.key.verifying_key(),
        }
    }

    /// Sign a ciphertext for use by `caller` against `contract`
    pub fn sign(&self, ciphertext: &Ciphertext, contract: &Address, caller: &Address) -> InputProof {
        let digest = transcript(ciphertext, contract, caller);
        InputProof {
            signature: self.key.sign(&digest).to_bytes().to_vec(),
        }
    }

    /// Encrypt `value` with `client` and bind it in one step
    pub fn encrypt_for<C: FheClient>(
        &self,
        client: &C,
        value: u64,
        contract: &Address,
        caller: &Address,
    ) -> FheResult<ExternalInput> {
        let ciphertext = client.encrypt(value)?;
        let proof = self.sign(&ciphertext, contract, caller);
        Ok(ExternalInput { ciphertext, proof })
    }
}

impl std::fmt::Debug for InputSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSigner")
            .field("public", &hex::encode(&self.key.verifying_key().as_bytes()[..8]))
            .finish()
    }
}

/// Engine-side verification and decoding of external inputs
#[derive(Clone)]
pub struct InputVerifier {
    key: VerifyingKey,
}

impl InputVerifier {
    /// Trust the signer with this ed25519 public key
    pub fn from_public_key(bytes: &[u8; 32]) -> FheResult<Self> {
        let key = VerifyingKey::from_bytes(bytes).map_err(|e| FheError::InvalidKey(e.to_string()))?;
        Ok(Self { key })
    }

    /// Public key of the trusted signer
    pub fn public_key(&self) -> [u8; 32] {
        self.key.to_bytes()
    }

    /// Check the proof binds `input` to exactly (`contract`, `caller`)
    pub fn verify(&self, input: &ExternalInput, contract: &Address, caller: &Address) -> FheResult<()> {
        let raw: [u8; 64] = input
            .proof
            .as_bytes()
            .try_into()
            .map_err(|_| FheError::InvalidProof("proof must be 64 bytes".into()))?;
        let signature = Signature::from_bytes(&raw);
        let digest = transcript(&input.ciphertext, contract, caller);

        self.key
            .verify_strict(&digest, &signature)
            .map_err(|_| {
                FheError::InvalidProof(format!(
                    "input not bound to contract {} and caller {}",
                    contract.short(),
                    caller.short()
                ))
            })
    }

    /// Verify and decode an external input into a backend value
    pub fn ingest<B: FheBackend>(
        &self,
        backend: &B,
        input: &ExternalInput,
        contract: &Address,
        caller: &Address,
    ) -> FheResult<B::Uint> {
        self.verify(input, contract, caller)?;
        input.ciphertext.expect_type(FheType::Uint64)?;
        backend.from_ciphertext(&input.ciphertext)
    }
}

impl std::fmt::Debug for InputVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputVerifier")
            .field("public", &hex::encode(&self.key.as_bytes()[..8]))
            .finish()
    }
}

/// Client-side batch of inputs for one (contract, caller) pair
#[derive(Debug, Clone)]
pub struct InputBuilder {
    contract: Address,
    caller: Address,
    values: Vec<u64>,
}

impl InputBuilder {
    pub fn new(contract: Address, caller: Address) -> Self {
        Self {
            contract,
            caller,
            values: Vec::new(),
        }
    }

    /// Queue a 64-bit value
    pub fn add64(mut self, value: u64) -> Self {
        self.values.push(value);
        self
    }

    /// Encrypt and bind every queued value, in order
    pub fn encrypt<C: FheClient>(self, client: &C, signer: &InputSigner) -> FheResult<Vec<ExternalInput>> {
        self.values
            .iter()
            .map(|&value| signer.encrypt_for(client, value, &self.contract, &self.caller))
            .collect()
    }
}
