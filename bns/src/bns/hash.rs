use crate::Error;
use hex::{FromHex, ToHex};
use ring::digest::{digest, SHA256, SHA512};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// SHA256 of the data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let d = digest(&SHA256, data);
    let mut out = [0; 32];
    out.copy_from_slice(d.as_ref());
    out
}

/// SHA512 of the data.
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let d = digest(&SHA512, data);
    let mut out = [0; 64];
    out.copy_from_slice(d.as_ref());
    out
}

/// The identifier of a transaction on the chain: the first 20 bytes of the SHA256 of the
/// posted bytes.
///
/// The chain displays and searches for it as upper case hex.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId {
    pub raw: [u8; 20],
}

impl TransactionId {
    pub const SIZE: usize = 20;

    /// Compute the identifier of the posted transaction bytes.
    pub fn from_posted(bytes: &[u8]) -> TransactionId {
        let mut raw = [0; Self::SIZE];
        raw.copy_from_slice(&sha256(bytes)[..Self::SIZE]);
        TransactionId { raw }
    }
}

impl FromHex for TransactionId {
    type Error = Error;

    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self, Self::Error> {
        let bytes = hex::decode(hex)?;
        if bytes.len() != Self::SIZE {
            return Err(Error::BadArgument(format!(
                "transaction id must be 20 bytes, got {}",
                bytes.len()
            )));
        }
        let mut raw = [0; Self::SIZE];
        raw.copy_from_slice(&bytes);
        Ok(TransactionId { raw })
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw.encode_hex_upper::<String>())
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TransactionId({})", self)
    }
}

impl Serialize for TransactionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TransactionId::from_hex(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_known_value() {
        assert_eq!(
            sha256(b"abc"),
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn sha512_known_value() {
        assert_eq!(
            sha512(b"abc")[..8],
            hex!("ddaf35a193617aba")
        );
    }

    #[test]
    fn id_display_is_upper_hex() {
        let id = TransactionId::from_posted(b"abc");
        assert_eq!(id.to_string(), "BA7816BF8F01CFEA414140DE5DAE2223B00361A3");
        let back = TransactionId::from_hex("ba7816bf8f01cfea414140de5dae2223b00361a3").unwrap();
        assert_eq!(back, id);
        assert!(TransactionId::from_hex("ba78").is_err());
    }

    #[test]
    fn id_serde() {
        let id = TransactionId::from_posted(b"abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"BA7816BF8F01CFEA414140DE5DAE2223B00361A3\"");
        let back: TransactionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
