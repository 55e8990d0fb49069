use serde::{Deserialize, Serialize};

/// The chain id reserved for the BNS main network.
///
/// The main network has no genesis yet, so this is a placeholder and not a published chain
/// id. Every other chain id is treated as a test network.
pub const BNS_MAINNET_CHAIN_ID: &str = "iov-mainnet";

/// Address prefix on the main network.
pub const MAINNET_ADDRESS_PREFIX: &str = "iov";

/// Address prefix on every other network.
pub const TESTNET_ADDRESS_PREFIX: &str = "tiov";

/// Fractional digits of every token amount on the chain.
pub const BNS_FRACTIONAL_DIGITS: u32 = 9;

/// Longest memo, in bytes, the chain accepts.
pub const MAX_MEMO_LENGTH: usize = 128;

/// Longest chain id that fits into the sign bytes.
pub const MAX_CHAIN_ID_LENGTH: usize = 255;

/// The bech32 prefix of addresses on the chain.
pub fn address_prefix(chain_id: &str) -> &'static str {
    if chain_id == BNS_MAINNET_CHAIN_ID {
        MAINNET_ADDRESS_PREFIX
    } else {
        TESTNET_ADDRESS_PREFIX
    }
}

/// How the sign bytes are transformed before being handed to the signing algorithm.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrehashType {
    /// The sign bytes are signed as they are. Ed25519 hashes with SHA512 internally.
    #[default]
    None,
    Sha256,
    Sha512,
}

/// Codec configuration for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    pub chain_id: String,
    pub address_prefix: String,
    #[serde(default)]
    pub prehash: PrehashType,
}

impl ChainParams {
    pub fn for_chain(chain_id: &str) -> ChainParams {
        ChainParams {
            chain_id: chain_id.to_string(),
            address_prefix: address_prefix(chain_id).to_string(),
            prehash: PrehashType::None,
        }
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        ChainParams::for_chain(BNS_MAINNET_CHAIN_ID)
    }
}
