use crate::bns::hash::sha256;
use crate::{Error, Result};
use hex::ToHex;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of a hash identifier. The chain treats an escrow arbiter starting with it as a hash
/// lock.
pub const HASH_ID_PREFIX: &[u8; 12] = b"hash/sha256/";

/// Length of a complete hash identifier: the prefix and a SHA256 digest.
pub const HASH_IDENTIFIER_SIZE: usize = 12 + Hashlock::SIZE;

/// The secret of a swap.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Preimage(#[serde(with = "hex::serde")] pub Vec<u8>);

impl Preimage {
    pub const RANDOM_SIZE: usize = 32;

    pub fn new(data: &[u8]) -> Result<Preimage> {
        if data.is_empty() {
            return Err(Error::BadArgument("preimage must not be empty".to_string()));
        }
        Ok(Preimage(data.to_vec()))
    }

    /// A fresh secret of 32 random bytes.
    pub fn random() -> Preimage {
        let mut data = vec![0; Self::RANDOM_SIZE];
        rand::thread_rng().fill_bytes(&mut data);
        Preimage(data)
    }

    pub fn hashlock(&self) -> Hashlock {
        Hashlock(sha256(&self.0))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// The secret is only printed by length until it is public.
impl fmt::Debug for Preimage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Preimage({} bytes)", self.0.len())
    }
}

/// SHA256 of a preimage.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hashlock(#[serde(with = "hex::serde")] pub [u8; 32]);

impl Hashlock {
    pub const SIZE: usize = 32;

    /// True if the preimage opens this lock.
    pub fn matches(&self, preimage: &Preimage) -> bool {
        preimage.hashlock() == *self
    }

    /// The identifier stored in the arbiter of a hash locked escrow.
    pub fn to_identifier(&self) -> Vec<u8> {
        let mut id = Vec::with_capacity(HASH_IDENTIFIER_SIZE);
        id.extend_from_slice(HASH_ID_PREFIX);
        id.extend_from_slice(&self.0);
        id
    }
}

impl fmt::Debug for Hashlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hashlock({})", self.0.encode_hex::<String>())
    }
}

/// The hash identifier of a preimage: the prefix followed by the SHA256 of the preimage.
pub fn hash_identifier(preimage: &[u8]) -> Vec<u8> {
    Hashlock(sha256(preimage)).to_identifier()
}

/// True if the bytes start with the hash identifier prefix.
///
/// This checks the format only, the bytes may be shorter or longer than a full identifier.
pub fn is_hash_identifier(bytes: &[u8]) -> bool {
    bytes.starts_with(HASH_ID_PREFIX)
}

/// The hashlock inside a hash identifier.
pub fn hash_from_identifier(bytes: &[u8]) -> Result<Hashlock> {
    if !is_hash_identifier(bytes) {
        return Err(Error::NotAHashIdentifier);
    }
    if bytes.len() != HASH_IDENTIFIER_SIZE {
        return Err(Error::BadData(format!(
            "hash identifier must be {} bytes, got {}",
            HASH_IDENTIFIER_SIZE,
            bytes.len()
        )));
    }
    let mut hash = [0; Hashlock::SIZE];
    hash.copy_from_slice(&bytes[HASH_ID_PREFIX.len()..]);
    Ok(Hashlock(hash))
}
