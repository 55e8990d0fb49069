//! The protobuf messages of the BNS transaction format and of the records returned by chain
//! queries.
//!
//! These are plain wire structures: every field is present with its protobuf default, zero
//! values are left off the wire and restored on read. The domain types in [crate::bns::tx] are
//! built from them.

use crate::wire::{
    bool_size, bytes_size, int32_size, int64_size, message_size, put_bool, put_bytes, put_int32,
    put_int64, put_message, put_raw_bytes, put_string, read_field, string_size, delimited_size,
    Encodable, Field, MessageKind, TX_FEES_FIELD, TX_PREIMAGE_FIELD, TX_SIGNATURES_FIELD,
};
use crate::{Error, Result};
use bytes::{Buf, BufMut, Bytes};

fn put_optional(buffer: &mut dyn BufMut, field: u32, value: &Option<impl Encodable>) -> Result<()> {
    match value {
        Some(v) => put_message(buffer, field, v),
        None => Ok(()),
    }
}

fn optional_size(field: u32, value: &Option<impl Encodable>) -> u64 {
    value.as_ref().map(|v| message_size(field, v)).unwrap_or(0)
}

fn put_repeated(buffer: &mut dyn BufMut, field: u32, values: &[impl Encodable]) -> Result<()> {
    for v in values {
        put_message(buffer, field, v)?;
    }
    Ok(())
}

fn repeated_size(field: u32, values: &[impl Encodable]) -> u64 {
    values.iter().map(|v| message_size(field, v)).sum()
}

/// A token amount on the wire: whole units, billionths and the ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Coin {
    pub whole: i64,
    pub fractional: i64,
    pub ticker: String,
}

impl Encodable for Coin {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut coin = Coin::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => coin.whole = field.as_int64()?,
                2 => coin.fractional = field.as_int64()?,
                3 => coin.ticker = field.as_string()?,
                _ => {}
            }
        }
        Ok(coin)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_int64(buffer, 1, self.whole)?;
        put_int64(buffer, 2, self.fractional)?;
        put_string(buffer, 3, &self.ticker)
    }

    fn encoded_size(&self) -> u64 {
        int64_size(1, self.whole) + int64_size(2, self.fractional) + string_size(3, &self.ticker)
    }
}

// PublicKey, PrivateKey and Signature share one layout: a oneof with the ed25519 bytes as
// field 1.
macro_rules! ed25519_message {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name {
            pub ed25519: Vec<u8>,
        }

        impl Encodable for $name {
            fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
                let mut msg = $name::default();
                while buffer.has_remaining() {
                    let field = read_field(buffer)?;
                    if field.number == 1 {
                        msg.ed25519 = field.as_bytes()?;
                    }
                }
                Ok(msg)
            }

            fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
                put_bytes(buffer, 1, &self.ed25519)
            }

            fn encoded_size(&self) -> u64 {
                bytes_size(1, &self.ed25519)
            }
        }
    };
}

ed25519_message!(
    /// `crypto.PublicKey`
    PublicKey
);
ed25519_message!(
    /// `crypto.PrivateKey`
    PrivateKey
);
ed25519_message!(
    /// `crypto.Signature`
    Signature
);

/// One signature of a transaction with the signer's key and nonce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StdSignature {
    pub sequence: i64,
    pub pubkey: Option<PublicKey>,
    pub signature: Option<Signature>,
}

impl Encodable for StdSignature {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut sig = StdSignature::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => sig.sequence = field.as_int64()?,
                2 => sig.pubkey = Some(field.as_message()?),
                4 => sig.signature = Some(field.as_message()?),
                _ => {}
            }
        }
        Ok(sig)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_int64(buffer, 1, self.sequence)?;
        put_optional(buffer, 2, &self.pubkey)?;
        put_optional(buffer, 4, &self.signature)
    }

    fn encoded_size(&self) -> u64 {
        int64_size(1, self.sequence)
            + optional_size(2, &self.pubkey)
            + optional_size(4, &self.signature)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendMsg {
    pub src: Vec<u8>,
    pub dest: Vec<u8>,
    pub amount: Option<Coin>,
    pub memo: String,
}

impl Encodable for SendMsg {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = SendMsg::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.src = field.as_bytes()?,
                2 => msg.dest = field.as_bytes()?,
                3 => msg.amount = Some(field.as_message()?),
                4 => msg.memo = field.as_string()?,
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_bytes(buffer, 1, &self.src)?;
        put_bytes(buffer, 2, &self.dest)?;
        put_optional(buffer, 3, &self.amount)?;
        put_string(buffer, 4, &self.memo)
    }

    fn encoded_size(&self) -> u64 {
        bytes_size(1, &self.src)
            + bytes_size(2, &self.dest)
            + optional_size(3, &self.amount)
            + string_size(4, &self.memo)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeInfo {
    pub payer: Vec<u8>,
    pub fees: Option<Coin>,
}

impl Encodable for FeeInfo {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = FeeInfo::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.payer = field.as_bytes()?,
                2 => msg.fees = Some(field.as_message()?),
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_bytes(buffer, 1, &self.payer)?;
        put_optional(buffer, 2, &self.fees)
    }

    fn encoded_size(&self) -> u64 {
        bytes_size(1, &self.payer) + optional_size(2, &self.fees)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetWalletNameMsg {
    pub address: Vec<u8>,
    pub name: String,
}

impl Encodable for SetWalletNameMsg {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = SetWalletNameMsg::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.address = field.as_bytes()?,
                2 => msg.name = field.as_string()?,
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_bytes(buffer, 1, &self.address)?;
        put_string(buffer, 2, &self.name)
    }

    fn encoded_size(&self) -> u64 {
        bytes_size(1, &self.address) + string_size(2, &self.name)
    }
}

/// Creates an escrow. A hash locked swap puts the hash identifier into `arbiter`.
///
/// The stored escrow record returned by chain queries has the same layout, see [Escrow].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateEscrowMsg {
    pub sender: Vec<u8>,
    pub arbiter: Vec<u8>,
    pub recipient: Vec<u8>,
    pub amount: Vec<Coin>,
    pub timeout: i64,
    pub memo: String,
}

/// An escrow record as stored on the chain.
pub type Escrow = CreateEscrowMsg;

impl Encodable for CreateEscrowMsg {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = CreateEscrowMsg::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.sender = field.as_bytes()?,
                2 => msg.arbiter = field.as_bytes()?,
                3 => msg.recipient = field.as_bytes()?,
                4 => msg.amount.push(field.as_message()?),
                5 => msg.timeout = field.as_int64()?,
                6 => msg.memo = field.as_string()?,
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_bytes(buffer, 1, &self.sender)?;
        put_bytes(buffer, 2, &self.arbiter)?;
        put_bytes(buffer, 3, &self.recipient)?;
        put_repeated(buffer, 4, &self.amount)?;
        put_int64(buffer, 5, self.timeout)?;
        put_string(buffer, 6, &self.memo)
    }

    fn encoded_size(&self) -> u64 {
        bytes_size(1, &self.sender)
            + bytes_size(2, &self.arbiter)
            + bytes_size(3, &self.recipient)
            + repeated_size(4, &self.amount)
            + int64_size(5, self.timeout)
            + string_size(6, &self.memo)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseEscrowMsg {
    pub escrow_id: Vec<u8>,
    pub amount: Vec<Coin>,
}

impl Encodable for ReleaseEscrowMsg {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = ReleaseEscrowMsg::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.escrow_id = field.as_bytes()?,
                2 => msg.amount.push(field.as_message()?),
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_bytes(buffer, 1, &self.escrow_id)?;
        put_repeated(buffer, 2, &self.amount)
    }

    fn encoded_size(&self) -> u64 {
        bytes_size(1, &self.escrow_id) + repeated_size(2, &self.amount)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnEscrowMsg {
    pub escrow_id: Vec<u8>,
}

impl Encodable for ReturnEscrowMsg {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = ReturnEscrowMsg::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            if field.number == 1 {
                msg.escrow_id = field.as_bytes()?;
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_bytes(buffer, 1, &self.escrow_id)
    }

    fn encoded_size(&self) -> u64 {
        bytes_size(1, &self.escrow_id)
    }
}

/// An address of a username on some other chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainAddress {
    pub chain_id: String,
    pub address: String,
}

impl Encodable for ChainAddress {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = ChainAddress::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.chain_id = field.as_string()?,
                2 => msg.address = field.as_string()?,
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_string(buffer, 1, &self.chain_id)?;
        put_string(buffer, 2, &self.address)
    }

    fn encoded_size(&self) -> u64 {
        string_size(1, &self.chain_id) + string_size(2, &self.address)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsernameDetails {
    pub addresses: Vec<ChainAddress>,
}

impl Encodable for UsernameDetails {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = UsernameDetails::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            if field.number == 1 {
                msg.addresses.push(field.as_message()?);
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_repeated(buffer, 1, &self.addresses)
    }

    fn encoded_size(&self) -> u64 {
        repeated_size(1, &self.addresses)
    }
}

/// Registers a username, the token id is the username itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUsernameMsg {
    pub id: Vec<u8>,
    pub owner: Vec<u8>,
    pub details: Option<UsernameDetails>,
}

impl Encodable for IssueUsernameMsg {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = IssueUsernameMsg::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.id = field.as_bytes()?,
                2 => msg.owner = field.as_bytes()?,
                4 => msg.details = Some(field.as_message()?),
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_bytes(buffer, 1, &self.id)?;
        put_bytes(buffer, 2, &self.owner)?;
        put_optional(buffer, 4, &self.details)
    }

    fn encoded_size(&self) -> u64 {
        bytes_size(1, &self.id) + bytes_size(2, &self.owner) + optional_size(4, &self.details)
    }
}

/// Adds an address to, or removes an address from, a username.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainAddressMsg {
    pub username_id: Vec<u8>,
    pub chain_id: String,
    pub address: String,
}

impl Encodable for ChainAddressMsg {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = ChainAddressMsg::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.username_id = field.as_bytes()?,
                2 => msg.chain_id = field.as_string()?,
                3 => msg.address = field.as_string()?,
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_bytes(buffer, 1, &self.username_id)?;
        put_string(buffer, 2, &self.chain_id)?;
        put_string(buffer, 3, &self.address)
    }

    fn encoded_size(&self) -> u64 {
        bytes_size(1, &self.username_id)
            + string_size(2, &self.chain_id)
            + string_size(3, &self.address)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    pub chain_id: String,
    pub network_id: String,
    pub name: String,
    pub enabled: bool,
    pub production: bool,
    pub main_ticker_id: Vec<u8>,
}

impl Encodable for Chain {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = Chain::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.chain_id = field.as_string()?,
                2 => msg.network_id = field.as_string()?,
                3 => msg.name = field.as_string()?,
                4 => msg.enabled = field.as_bool()?,
                5 => msg.production = field.as_bool()?,
                6 => msg.main_ticker_id = field.as_bytes()?,
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_string(buffer, 1, &self.chain_id)?;
        put_string(buffer, 2, &self.network_id)?;
        put_string(buffer, 3, &self.name)?;
        put_bool(buffer, 4, self.enabled)?;
        put_bool(buffer, 5, self.production)?;
        put_bytes(buffer, 6, &self.main_ticker_id)
    }

    fn encoded_size(&self) -> u64 {
        string_size(1, &self.chain_id)
            + string_size(2, &self.network_id)
            + string_size(3, &self.name)
            + bool_size(4, self.enabled)
            + bool_size(5, self.production)
            + bytes_size(6, &self.main_ticker_id)
    }
}

/// The codec an IOV-compatible chain uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IovCodec {
    pub codec: String,
    pub codec_config: String,
}

impl Encodable for IovCodec {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = IovCodec::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.codec = field.as_string()?,
                2 => msg.codec_config = field.as_string()?,
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_string(buffer, 1, &self.codec)?;
        put_string(buffer, 2, &self.codec_config)
    }

    fn encoded_size(&self) -> u64 {
        string_size(1, &self.codec) + string_size(2, &self.codec_config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockchainDetails {
    pub chain: Option<Chain>,
    pub iov: Option<IovCodec>,
}

impl Encodable for BlockchainDetails {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = BlockchainDetails::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.chain = Some(field.as_message()?),
                2 => msg.iov = Some(field.as_message()?),
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_optional(buffer, 1, &self.chain)?;
        put_optional(buffer, 2, &self.iov)
    }

    fn encoded_size(&self) -> u64 {
        optional_size(1, &self.chain) + optional_size(2, &self.iov)
    }
}

/// Registers a blockchain, the token id is the chain id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueBlockchainMsg {
    pub owner: Vec<u8>,
    pub id: Vec<u8>,
    pub details: Option<BlockchainDetails>,
}

impl Encodable for IssueBlockchainMsg {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = IssueBlockchainMsg::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.owner = field.as_bytes()?,
                2 => msg.id = field.as_bytes()?,
                3 => msg.details = Some(field.as_message()?),
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_bytes(buffer, 1, &self.owner)?;
        put_bytes(buffer, 2, &self.id)?;
        put_optional(buffer, 3, &self.details)
    }

    fn encoded_size(&self) -> u64 {
        bytes_size(1, &self.owner) + bytes_size(2, &self.id) + optional_size(3, &self.details)
    }
}

/// The account record of a signer: its key and the next nonce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserData {
    pub pubkey: Option<PublicKey>,
    pub sequence: i64,
}

impl Encodable for UserData {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = UserData::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.pubkey = Some(field.as_message()?),
                2 => msg.sequence = field.as_int64()?,
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_optional(buffer, 1, &self.pubkey)?;
        put_int64(buffer, 2, self.sequence)
    }

    fn encoded_size(&self) -> u64 {
        optional_size(1, &self.pubkey) + int64_size(2, self.sequence)
    }
}

/// The balance record of an address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wallet {
    pub coins: Vec<Coin>,
    pub name: String,
}

impl Encodable for Wallet {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = Wallet::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                1 => msg.coins.push(field.as_message()?),
                2 => msg.name = field.as_string()?,
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_repeated(buffer, 1, &self.coins)?;
        put_string(buffer, 2, &self.name)
    }

    fn encoded_size(&self) -> u64 {
        repeated_size(1, &self.coins) + string_size(2, &self.name)
    }
}

/// Ticker metadata. The ticker itself is the key of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub name: String,
    pub sig_figs: i32,
}

impl Encodable for Token {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = Token::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                2 => msg.name = field.as_string()?,
                3 => msg.sig_figs = field.as_int32()?,
                _ => {}
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        put_string(buffer, 2, &self.name)?;
        put_int32(buffer, 3, self.sig_figs)
    }

    fn encoded_size(&self) -> u64 {
        string_size(2, &self.name) + int32_size(3, self.sig_figs)
    }
}

/// The keys or the values of a chain query, one entry per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub results: Vec<Vec<u8>>,
}

impl Encodable for ResultSet {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut msg = ResultSet::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            if field.number == 1 {
                msg.results.push(field.as_bytes()?);
            }
        }
        Ok(msg)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        for r in &self.results {
            put_raw_bytes(buffer, 1, r)?;
        }
        Ok(())
    }

    fn encoded_size(&self) -> u64 {
        self.results
            .iter()
            .map(|r| delimited_size(1, r.len() as u64))
            .sum()
    }
}

/// The message carried by a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxSum {
    Send(SendMsg),
    SetName(SetWalletNameMsg),
    CreateEscrow(CreateEscrowMsg),
    ReleaseEscrow(ReleaseEscrowMsg),
    ReturnEscrow(ReturnEscrowMsg),
    IssueUsername(IssueUsernameMsg),
    AddUsernameAddress(ChainAddressMsg),
    RemoveUsernameAddress(ChainAddressMsg),
    IssueBlockchain(IssueBlockchainMsg),
    /// A message kind without a domain transaction, kept as its raw bytes.
    Other(MessageKind, Bytes),
}

impl TxSum {
    pub fn kind(&self) -> MessageKind {
        match self {
            TxSum::Send(_) => MessageKind::Send,
            TxSum::SetName(_) => MessageKind::SetName,
            TxSum::CreateEscrow(_) => MessageKind::CreateEscrow,
            TxSum::ReleaseEscrow(_) => MessageKind::ReleaseEscrow,
            TxSum::ReturnEscrow(_) => MessageKind::ReturnEscrow,
            TxSum::IssueUsername(_) => MessageKind::IssueUsername,
            TxSum::AddUsernameAddress(_) => MessageKind::AddUsernameAddress,
            TxSum::RemoveUsernameAddress(_) => MessageKind::RemoveUsernameAddress,
            TxSum::IssueBlockchain(_) => MessageKind::IssueBlockchain,
            TxSum::Other(kind, _) => *kind,
        }
    }

    fn message(&self) -> Option<&dyn Encodable> {
        match self {
            TxSum::Send(m) => Some(m),
            TxSum::SetName(m) => Some(m),
            TxSum::CreateEscrow(m) => Some(m),
            TxSum::ReleaseEscrow(m) => Some(m),
            TxSum::ReturnEscrow(m) => Some(m),
            TxSum::IssueUsername(m) => Some(m),
            TxSum::AddUsernameAddress(m) => Some(m),
            TxSum::RemoveUsernameAddress(m) => Some(m),
            TxSum::IssueBlockchain(m) => Some(m),
            TxSum::Other(_, _) => None,
        }
    }

    fn read(kind: MessageKind, field: &Field) -> Result<TxSum> {
        Ok(match kind {
            MessageKind::Send => TxSum::Send(field.as_message()?),
            MessageKind::SetName => TxSum::SetName(field.as_message()?),
            MessageKind::CreateEscrow => TxSum::CreateEscrow(field.as_message()?),
            MessageKind::ReleaseEscrow => TxSum::ReleaseEscrow(field.as_message()?),
            MessageKind::ReturnEscrow => TxSum::ReturnEscrow(field.as_message()?),
            MessageKind::IssueUsername => TxSum::IssueUsername(field.as_message()?),
            MessageKind::AddUsernameAddress => TxSum::AddUsernameAddress(field.as_message()?),
            MessageKind::RemoveUsernameAddress => {
                TxSum::RemoveUsernameAddress(field.as_message()?)
            }
            MessageKind::IssueBlockchain => TxSum::IssueBlockchain(field.as_message()?),
            other => TxSum::Other(other, Bytes::from(field.as_bytes()?)),
        })
    }

    fn write(&self, buffer: &mut dyn BufMut) -> Result<()> {
        let field = self.kind().field_number();
        match (self, self.message()) {
            (_, Some(m)) => put_message(buffer, field, m),
            (TxSum::Other(_, raw), None) => put_raw_bytes(buffer, field, raw),
            (_, None) => Ok(()),
        }
    }

    fn size(&self) -> u64 {
        let field = self.kind().field_number();
        match (self, self.message()) {
            (_, Some(m)) => message_size(field, m),
            (TxSum::Other(_, raw), None) => delimited_size(field, raw.len() as u64),
            (_, None) => 0,
        }
    }
}

/// The transaction envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxMsg {
    pub sum: Option<TxSum>,
    pub fees: Option<FeeInfo>,
    pub signatures: Vec<StdSignature>,
    pub preimage: Vec<u8>,
}

impl Encodable for TxMsg {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self> {
        let mut tx = TxMsg::default();
        while buffer.has_remaining() {
            let field = read_field(buffer)?;
            match field.number {
                TX_FEES_FIELD => tx.fees = Some(field.as_message()?),
                TX_SIGNATURES_FIELD => tx.signatures.push(field.as_message()?),
                TX_PREIMAGE_FIELD => tx.preimage = field.as_bytes()?,
                n => {
                    if let Some(kind) = MessageKind::from_field_number(n) {
                        if let Some(current) = &tx.sum {
                            if current.kind() != kind {
                                return Err(Error::AmbiguousUnion {
                                    first: current.kind().to_string(),
                                    second: kind.to_string(),
                                });
                            }
                        }
                        tx.sum = Some(TxSum::read(kind, &field)?);
                    }
                }
            }
        }
        Ok(tx)
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        if let Some(sum) = &self.sum {
            sum.write(buffer)?;
        }
        put_optional(buffer, TX_FEES_FIELD, &self.fees)?;
        put_repeated(buffer, TX_SIGNATURES_FIELD, &self.signatures)?;
        put_bytes(buffer, TX_PREIMAGE_FIELD, &self.preimage)
    }

    fn encoded_size(&self) -> u64 {
        self.sum.as_ref().map(|s| s.size()).unwrap_or(0)
            + optional_size(TX_FEES_FIELD, &self.fees)
            + repeated_size(TX_SIGNATURES_FIELD, &self.signatures)
            + bytes_size(TX_PREIMAGE_FIELD, &self.preimage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn coin_known_encoding() {
        let coin = Coin {
            whole: 878,
            fractional: 1567000,
            ticker: "IOV".to_string(),
        };
        let bin = hex!("08ee061098d25f1a03494f56");
        assert_eq!(coin.to_bytes().unwrap(), bin);
        assert_eq!(coin.encoded_size(), bin.len() as u64);
        assert_eq!(Coin::from_bytes(&bin).unwrap(), coin);
    }

    #[test]
    fn coin_zero_fields_are_absent() {
        let coin = Coin {
            whole: 250,
            fractional: 0,
            ticker: "ETH".to_string(),
        };
        assert_eq!(coin.to_bytes().unwrap(), hex!("08fa011a03455448"));
        assert_eq!(Coin::default().to_bytes().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn public_key_known_encoding() {
        let key = PublicKey {
            ed25519: hex!("507629b5f1d3946efb8fde961e146359e33610fa1536185d44fdd5011ca011d5")
                .to_vec(),
        };
        let bin = key.to_bytes().unwrap();
        assert_eq!(bin[..2], hex!("0a20"));
        assert_eq!(bin.len(), 34);
        assert_eq!(PublicKey::from_bytes(&bin).unwrap(), key);
    }

    #[test]
    fn unknown_fields_are_skipped() {
        // ticker "IOV", then unknown varint field 9 and unknown bytes field 10
        let bin = hex!("1a03494f5648075203010203");
        let coin = Coin::from_bytes(&bin).unwrap();
        assert_eq!(coin.ticker, "IOV");
        assert_eq!(coin.whole, 0);
    }

    #[test]
    fn wrong_wire_type_is_rejected() {
        // whole encoded as bytes
        let bin = hex!("0a0101");
        assert!(matches!(
            Coin::from_bytes(&bin),
            Err(Error::MalformedWireData(_))
        ));
    }

    #[test]
    fn escrow_timeout_omitted_when_zero() {
        let mut msg = CreateEscrowMsg {
            sender: vec![1; 20],
            recipient: vec![2; 20],
            ..Default::default()
        };
        let without = msg.to_bytes().unwrap();
        msg.timeout = 7890;
        let with = msg.to_bytes().unwrap();
        assert_eq!(with.len(), without.len() + 3);
        assert_eq!(CreateEscrowMsg::from_bytes(&with).unwrap(), msg);
        assert_eq!(msg.encoded_size(), with.len() as u64);
    }

    #[test]
    fn result_set_keeps_empty_entries() {
        let set = ResultSet {
            results: vec![vec![], b"abc".to_vec()],
        };
        let bin = set.to_bytes().unwrap();
        assert_eq!(bin, hex!("0a000a03616263"));
        assert_eq!(set.encoded_size(), bin.len() as u64);
        assert_eq!(ResultSet::from_bytes(&bin).unwrap(), set);
    }

    #[test]
    fn token_sig_figs() {
        let token = Token {
            name: "Ethereum".to_string(),
            sig_figs: 18,
        };
        let bin = token.to_bytes().unwrap();
        assert_eq!(Token::from_bytes(&bin).unwrap(), token);
    }

    #[test]
    fn token_without_sig_figs() {
        let token = Token {
            name: "X".to_string(),
            sig_figs: 0,
        };
        let bin = token.to_bytes().unwrap();
        assert_eq!(bin, hex!("120158"));
        assert_eq!(token.encoded_size(), 3);
        assert_eq!(Token::from_bytes(&bin).unwrap(), token);
    }

    #[test]
    fn std_signature_zero_sequence() {
        let sig = StdSignature::default();
        assert!(sig.to_bytes().unwrap().is_empty());
        assert_eq!(sig.encoded_size(), 0);

        let sig = StdSignature {
            sequence: 5,
            ..Default::default()
        };
        assert_eq!(sig.to_bytes().unwrap(), hex!("0805"));
        assert_eq!(StdSignature::from_bytes(&hex!("0805")).unwrap(), sig);
    }

    #[test]
    fn blockchain_details_nested() {
        let msg = IssueBlockchainMsg {
            owner: vec![9; 20],
            id: b"ethereum-eip155-1".to_vec(),
            details: Some(BlockchainDetails {
                chain: Some(Chain {
                    chain_id: "ethereum-eip155-1".to_string(),
                    name: "Ethereum".to_string(),
                    enabled: true,
                    ..Default::default()
                }),
                iov: Some(IovCodec {
                    codec: "eth".to_string(),
                    codec_config: "{}".to_string(),
                }),
            }),
        };
        let bin = msg.to_bytes().unwrap();
        assert_eq!(msg.encoded_size(), bin.len() as u64);
        assert_eq!(IssueBlockchainMsg::from_bytes(&bin).unwrap(), msg);
    }

    #[test]
    fn envelope_keeps_unsupported_messages() {
        let tx = TxMsg {
            sum: Some(TxSum::Other(MessageKind::NewToken, Bytes::from_static(b"\x0a\x01\x01"))),
            ..Default::default()
        };
        let bin = tx.to_bytes().unwrap();
        assert_eq!(bin, hex!("12030a0101"));
        assert_eq!(TxMsg::from_bytes(&bin).unwrap(), tx);
    }

    #[test]
    fn envelope_rejects_two_messages() {
        // returnEscrow followed by setName
        let bin = hex!("32030a01011a00");
        assert!(matches!(
            TxMsg::from_bytes(&bin),
            Err(Error::AmbiguousUnion { .. })
        ));
    }

    #[test]
    fn envelope_repeated_message_keeps_last() {
        let bin = hex!("32030a010132030a0102");
        let tx = TxMsg::from_bytes(&bin).unwrap();
        assert_eq!(
            tx.sum,
            Some(TxSum::ReturnEscrow(ReturnEscrowMsg {
                escrow_id: vec![2]
            }))
        );
    }
}
