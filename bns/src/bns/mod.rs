/// The bns module contains the BNS transaction types, their wire encoding and the codec that
/// produces sign bytes and transaction ids.

pub mod address;
pub mod amount;
mod codec;
pub mod hash;
pub mod hashlock;
mod keys;
pub mod messages;
pub mod params;
pub mod tx;

pub use self::address::{
    decode_address, encode_address, identity_to_address, is_valid_address, key_to_address,
    Address, DecodedAddress,
};
pub use self::amount::{decode_amount, encode_amount, Amount};
pub use self::codec::{append_sign_bytes, BnsCodec, SigningJob, SIGN_CODE_V1};
pub use self::hash::TransactionId;
pub use self::hashlock::{
    hash_from_identifier, hash_identifier, is_hash_identifier, Hashlock, Preimage,
    HASH_ID_PREFIX,
};
pub use self::keys::{Algorithm, FullSignature, Nonce, PrivateKeyBundle, PublicKeyBundle, Signature};
pub use self::params::{address_prefix, ChainParams, PrehashType};
pub use self::tx::{
    AddAddressToUsernameTx, BaseTx, ChainAddressPair, ChainInfo, RegisterBlockchainTx,
    RegisterUsernameTx, RemoveAddressFromUsernameTx, SendTx, SetNameTx, SignedTransaction,
    SwapClaimTx, SwapId, SwapOfferTx, SwapTimeoutTx, UnsignedTransaction,
};
