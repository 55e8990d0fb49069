use crate::{Error, Result};
use ring::signature::{Ed25519KeyPair, KeyPair};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The signature algorithms known to the chain.
///
/// Only Ed25519 has a wire representation in the current transaction format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Ed25519,
    Secp256k1,
}

impl Algorithm {
    /// The prefix of the key identifier from which addresses are derived.
    pub fn address_prefix(&self) -> &'static [u8] {
        match self {
            Algorithm::Ed25519 => b"sigs/ed25519/",
            Algorithm::Secp256k1 => b"sigs/secp256k1/",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::Ed25519 => f.write_str("ed25519"),
            Algorithm::Secp256k1 => f.write_str("secp256k1"),
        }
    }
}

/// A public key tagged with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKeyBundle {
    pub algo: Algorithm,
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

impl PublicKeyBundle {
    pub const ED25519_SIZE: usize = 32;

    pub fn ed25519(data: &[u8]) -> PublicKeyBundle {
        PublicKeyBundle {
            algo: Algorithm::Ed25519,
            data: data.to_vec(),
        }
    }
}

/// A private key tagged with its algorithm. Ed25519 keys use the 64 byte form: seed followed
/// by the public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKeyBundle {
    pub algo: Algorithm,
    pub data: Vec<u8>,
}

impl PrivateKeyBundle {
    pub fn ed25519(data: &[u8]) -> PrivateKeyBundle {
        PrivateKeyBundle {
            algo: Algorithm::Ed25519,
            data: data.to_vec(),
        }
    }

    fn key_pair(&self) -> Result<Ed25519KeyPair> {
        if self.algo != Algorithm::Ed25519 {
            return Err(Error::UnsupportedAlgorithm(format!(
                "cannot sign with {} keys",
                self.algo
            )));
        }
        let pair = match self.data.len() {
            32 => Ed25519KeyPair::from_seed_unchecked(&self.data),
            64 => Ed25519KeyPair::from_seed_and_public_key(&self.data[..32], &self.data[32..]),
            n => {
                return Err(Error::BadArgument(format!(
                    "ed25519 private key must be 32 or 64 bytes, got {}",
                    n
                )))
            }
        };
        pair.map_err(|e| Error::BadArgument(format!("invalid ed25519 key: {}", e)))
    }

    pub fn public_key(&self) -> Result<PublicKeyBundle> {
        Ok(PublicKeyBundle::ed25519(self.key_pair()?.public_key().as_ref()))
    }

    /// Sign the message. The message is signed as given, prehashing is up to the caller.
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        Ok(Signature::ed25519(self.key_pair()?.sign(message).as_ref()))
    }
}

// Keep private key bytes out of logs.
impl fmt::Debug for PrivateKeyBundle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PrivateKeyBundle({}, {} bytes)", self.algo, self.data.len())
    }
}

/// A signature tagged with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub algo: Algorithm,
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

impl Signature {
    pub fn ed25519(data: &[u8]) -> Signature {
        Signature {
            algo: Algorithm::Ed25519,
            data: data.to_vec(),
        }
    }
}

/// The per-signer replay counter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Nonce(pub i64);

impl From<i64> for Nonce {
    fn from(value: i64) -> Self {
        Nonce(value)
    }
}

impl Nonce {
    /// The nonce to sign the signer's next transaction with.
    pub fn next(&self) -> Result<Nonce> {
        self.0
            .checked_add(1)
            .map(Nonce)
            .ok_or_else(|| Error::BadArgument(format!("nonce {} cannot be incremented", self.0)))
    }
}

/// A signature together with the key and nonce it was made with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FullSignature {
    pub nonce: Nonce,
    pub pubkey: PublicKeyBundle,
    pub signature: Signature,
}
