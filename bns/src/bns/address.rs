use crate::bns::hash::sha256;
use crate::bns::keys::PublicKeyBundle;
use crate::bns::params::address_prefix;
use crate::{Error, Result};
use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use hex::{FromHex, ToHex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The raw form of a chain address: the first 20 bytes of the SHA256 of the key identifier.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    pub raw: [u8; 20],
}

impl Address {
    pub const SIZE: usize = 20;

    pub fn from_slice(slice: &[u8]) -> Result<Address> {
        if slice.len() != Self::SIZE {
            return Err(Error::InvalidAddress(format!(
                "address must be 20 bytes, got {}",
                slice.len()
            )));
        }
        let mut raw = [0; Self::SIZE];
        raw.copy_from_slice(slice);
        Ok(Address { raw })
    }

    /// Encode as bech32 with the given human readable prefix.
    pub fn to_bech32(&self, prefix: &str) -> Result<String> {
        encode_address(self, prefix)
    }
}

/// An address string split into its human readable prefix and raw address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAddress {
    pub prefix: String,
    pub address: Address,
}

/// The identifier of a key: the algorithm prefix followed by the key bytes.
pub fn key_identifier(pubkey: &PublicKeyBundle) -> Vec<u8> {
    let prefix = pubkey.algo.address_prefix();
    let mut identifier = Vec::with_capacity(prefix.len() + pubkey.data.len());
    identifier.extend_from_slice(prefix);
    identifier.extend_from_slice(&pubkey.data);
    identifier
}

/// Derive the address of a public key.
pub fn key_to_address(pubkey: &PublicKeyBundle) -> Address {
    let mut raw = [0; Address::SIZE];
    raw.copy_from_slice(&sha256(&key_identifier(pubkey))[..Address::SIZE]);
    Address { raw }
}

pub fn encode_address(address: &Address, prefix: &str) -> Result<String> {
    let hrp = Hrp::parse(prefix)
        .map_err(|e| Error::InvalidAddress(format!("bad prefix {:?}: {}", prefix, e)))?;
    bech32::encode::<Bech32>(hrp, &address.raw)
        .map_err(|e| Error::InvalidAddress(e.to_string()))
}

/// Decode a bech32 address string.
///
/// Only the original bech32 checksum is accepted and the payload must be exactly 20 bytes.
pub fn decode_address(s: &str) -> Result<DecodedAddress> {
    let checked = CheckedHrpstring::new::<Bech32>(s)
        .map_err(|e| Error::InvalidAddress(format!("{}: {}", s, e)))?;
    let payload: Vec<u8> = checked.byte_iter().collect();
    Ok(DecodedAddress {
        prefix: checked.hrp().to_lowercase(),
        address: Address::from_slice(&payload)?,
    })
}

/// True if the string is a valid address with the expected prefix.
pub fn is_valid_address(s: &str, expected_prefix: &str) -> bool {
    match decode_address(s) {
        Ok(decoded) => decoded.prefix == expected_prefix,
        Err(_) => false,
    }
}

/// The bech32 address of a key on the given chain.
pub fn identity_to_address(chain_id: &str, pubkey: &PublicKeyBundle) -> Result<String> {
    encode_address(&key_to_address(pubkey), address_prefix(chain_id))
}

impl FromHex for Address {
    type Error = Error;

    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self> {
        Address::from_slice(&hex::decode(hex)?)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw.encode_hex::<String>())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(s).map_err(serde::de::Error::custom)
    }
}
