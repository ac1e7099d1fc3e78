// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Ed25519 signing identities with base-58 transport encoding.
//!
//! All key and signature material is fixed-width: a private key is the 64-byte
//! seed-plus-public layout, a public key 32 bytes, a signature 64 bytes.
//! Text encoding is base-58; decoding a string that does not produce exactly
//! the expected byte count fails with [`Error::InvalidSize`].
//!
//! Password-derived keypairs use Argon2id with a fixed domain salt so the same
//! password always yields the same keypair. This is a demo/bootstrap
//! convenience, not a hardened key-derivation path: anyone who learns the
//! password can reconstruct the private key offline.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signer, Verifier};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

pub const PRIVATE_KEY_SIZE: usize = 64;
pub const PUBLIC_KEY_SIZE: usize = 32;
pub const SEED_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = 64;

/// Fixed salt for deterministic password derivation.
const PASSWORD_SALT: &[u8] = b"rights-registry/keypair/v1";

/// Ed25519 private key (seed and public half, 64 bytes).
#[derive(Clone)]
pub struct PrivateKey {
    inner: ed25519_dalek::SigningKey,
}

/// Ed25519 public key (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    inner: ed25519_dalek::VerifyingKey,
}

/// Ed25519 signature (64 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    inner: ed25519_dalek::Signature,
}

fn decode_b58(value: &str, expected: usize) -> Result<Vec<u8>> {
    let bytes = bs58::decode(value)
        .into_vec()
        .map_err(|e| Error::Key(format!("invalid base-58: {e}")))?;
    if bytes.len() != expected {
        return Err(Error::InvalidSize {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

impl PrivateKey {
    /// Generate a fresh keypair from OS randomness.
    pub fn generate() -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::generate(&mut OsRng),
        }
    }

    /// Derive a keypair deterministically from a password.
    ///
    /// Same password, same keypair. See the module docs for the security
    /// caveat.
    pub fn from_password(password: &str) -> Result<Self> {
        let mut seed = [0u8; SEED_SIZE];
        argon2::Argon2::default()
            .hash_password_into(password.as_bytes(), PASSWORD_SALT, &mut seed)
            .map_err(|e| Error::Key(format!("password derivation failed: {e}")))?;
        Self::from_seed(&seed)
    }

    /// Build a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let seed: &[u8; SEED_SIZE] = seed.try_into().map_err(|_| Error::InvalidSize {
            expected: SEED_SIZE,
            actual: seed.len(),
        })?;
        Ok(Self {
            inner: ed25519_dalek::SigningKey::from_bytes(seed),
        })
    }

    /// Reconstruct from the 64-byte seed-plus-public layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; PRIVATE_KEY_SIZE] =
            bytes.try_into().map_err(|_| Error::InvalidSize {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            })?;
        let inner = ed25519_dalek::SigningKey::from_keypair_bytes(bytes)
            .map_err(|e| Error::Key(format!("inconsistent keypair bytes: {e}")))?;
        Ok(Self { inner })
    }

    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.inner.to_keypair_bytes()
    }

    pub fn public(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.verifying_key(),
        }
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature {
            inner: self.inner.sign(message),
        }
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

// Private key material never appears in logs.
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.to_bytes()).into_string())
    }
}

impl FromStr for PrivateKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::from_bytes(&decode_b58(value, PRIVATE_KEY_SIZE)?)
    }
}

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| Error::InvalidSize {
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;
        let inner = ed25519_dalek::VerifyingKey::from_bytes(bytes)
            .map_err(|e| Error::Key(format!("invalid public key: {e}")))?;
        Ok(Self { inner })
    }

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.inner.to_bytes()
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.inner.verify(message, &signature.inner).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.to_bytes()).into_string())
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::from_bytes(&decode_b58(value, PUBLIC_KEY_SIZE)?)
    }
}

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; SIGNATURE_SIZE] =
            bytes.try_into().map_err(|_| Error::InvalidSize {
                expected: SIGNATURE_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self {
            inner: ed25519_dalek::Signature::from_bytes(bytes),
        })
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        self.inner.to_bytes()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.to_bytes()).into_string())
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::from_bytes(&decode_b58(value, SIGNATURE_SIZE)?)
    }
}

// Keys and signatures travel as base-58 strings in documents and transactions.

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
