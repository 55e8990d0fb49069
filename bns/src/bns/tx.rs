use crate::bns::address::{key_to_address, Address};
use crate::bns::amount::{decode_amount, encode_amount, Amount};
use crate::bns::hashlock::{hash_from_identifier, Hashlock, Preimage};
use crate::bns::keys::{
    Algorithm, FullSignature, Nonce, PrivateKeyBundle, PublicKeyBundle, Signature,
};
use crate::bns::messages;
use crate::bns::messages::{
    BlockchainDetails, ChainAddress, ChainAddressMsg, CreateEscrowMsg, FeeInfo, IovCodec,
    IssueBlockchainMsg, IssueUsernameMsg, ReleaseEscrowMsg, ReturnEscrowMsg, SendMsg,
    SetWalletNameMsg, StdSignature, TxMsg, TxSum, UsernameDetails,
};
use crate::bns::params::MAX_MEMO_LENGTH;
use crate::wire::Encodable;
use crate::{Error, Result};
use hex::ToHex;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fields every transaction carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTx {
    pub chain_id: String,
    pub signer: PublicKeyBundle,
    pub fee: Option<Amount>,
}

impl BaseTx {
    pub fn new(chain_id: &str, signer: PublicKeyBundle) -> BaseTx {
        BaseTx {
            chain_id: chain_id.to_string(),
            signer,
            fee: None,
        }
    }

    pub fn signer_address(&self) -> Address {
        key_to_address(&self.signer)
    }
}

/// The id of an escrow on the chain, used to claim or return a swap.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SwapId(#[serde(with = "hex::serde")] pub Vec<u8>);

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0.encode_hex::<String>())
    }
}

impl fmt::Debug for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SwapId({})", self)
    }
}

/// An address of a username on some chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainAddressPair {
    pub chain_id: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub chain_id: String,
    pub name: String,
    pub enabled: bool,
    pub production: bool,
    pub network_id: Option<String>,
    pub main_ticker_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTx {
    pub base: BaseTx,
    pub recipient: Address,
    pub amount: Amount,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetNameTx {
    pub base: BaseTx,
    pub name: String,
}

/// Locks funds for the recipient until the preimage of the hashlock is shown or the timeout
/// height passes. Both legs of a swap are offers on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOfferTx {
    pub base: BaseTx,
    pub recipient: Address,
    pub amounts: Vec<Amount>,
    pub timeout_height: u64,
    pub hashlock: Hashlock,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapClaimTx {
    pub base: BaseTx,
    pub swap_id: SwapId,
    pub preimage: Preimage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapTimeoutTx {
    pub base: BaseTx,
    pub swap_id: SwapId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBlockchainTx {
    pub base: BaseTx,
    pub chain: ChainInfo,
    pub codec_name: String,
    pub codec_config: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUsernameTx {
    pub base: BaseTx,
    pub username: String,
    pub addresses: Vec<ChainAddressPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddAddressToUsernameTx {
    pub base: BaseTx,
    pub username: String,
    pub payload: ChainAddressPair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveAddressFromUsernameTx {
    pub base: BaseTx,
    pub username: String,
    pub payload: ChainAddressPair,
}

/// A transaction before signing. Exactly one kind is set, as in the wire envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsignedTransaction {
    Send(SendTx),
    SetName(SetNameTx),
    SwapOffer(SwapOfferTx),
    SwapClaim(SwapClaimTx),
    SwapTimeout(SwapTimeoutTx),
    RegisterBlockchain(RegisterBlockchainTx),
    RegisterUsername(RegisterUsernameTx),
    AddAddressToUsername(AddAddressToUsernameTx),
    RemoveAddressFromUsername(RemoveAddressFromUsernameTx),
}

impl UnsignedTransaction {
    pub fn base(&self) -> &BaseTx {
        match self {
            UnsignedTransaction::Send(tx) => &tx.base,
            UnsignedTransaction::SetName(tx) => &tx.base,
            UnsignedTransaction::SwapOffer(tx) => &tx.base,
            UnsignedTransaction::SwapClaim(tx) => &tx.base,
            UnsignedTransaction::SwapTimeout(tx) => &tx.base,
            UnsignedTransaction::RegisterBlockchain(tx) => &tx.base,
            UnsignedTransaction::RegisterUsername(tx) => &tx.base,
            UnsignedTransaction::AddAddressToUsername(tx) => &tx.base,
            UnsignedTransaction::RemoveAddressFromUsername(tx) => &tx.base,
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.base().chain_id
    }

    pub fn signer(&self) -> &PublicKeyBundle {
        &self.base().signer
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            UnsignedTransaction::Send(_) => "send",
            UnsignedTransaction::SetName(_) => "set_name",
            UnsignedTransaction::SwapOffer(_) => "swap_offer",
            UnsignedTransaction::SwapClaim(_) => "swap_claim",
            UnsignedTransaction::SwapTimeout(_) => "swap_timeout",
            UnsignedTransaction::RegisterBlockchain(_) => "register_blockchain",
            UnsignedTransaction::RegisterUsername(_) => "register_username",
            UnsignedTransaction::AddAddressToUsername(_) => "add_address_to_username",
            UnsignedTransaction::RemoveAddressFromUsername(_) => "remove_address_from_username",
        }
    }
}

/// A transaction with at least one signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: UnsignedTransaction,
    pub primary_signature: FullSignature,
    pub other_signatures: Vec<FullSignature>,
}

impl SignedTransaction {
    pub fn new(transaction: UnsignedTransaction, primary_signature: FullSignature) -> Self {
        SignedTransaction {
            transaction,
            primary_signature,
            other_signatures: Vec::new(),
        }
    }

    pub fn signatures(&self) -> impl Iterator<Item = &FullSignature> {
        std::iter::once(&self.primary_signature).chain(self.other_signatures.iter())
    }
}

fn encode_pubkey(pubkey: &PublicKeyBundle) -> Result<messages::PublicKey> {
    match pubkey.algo {
        Algorithm::Ed25519 => {
            if pubkey.data.len() != PublicKeyBundle::ED25519_SIZE {
                return Err(Error::BadArgument(format!(
                    "ed25519 public key must be 32 bytes, got {}",
                    pubkey.data.len()
                )));
            }
            Ok(messages::PublicKey {
                ed25519: pubkey.data.clone(),
            })
        }
        other => Err(Error::UnsupportedAlgorithm(format!(
            "{} keys cannot be encoded",
            other
        ))),
    }
}

/// The wire form of a private key, as kept by key stores.
pub fn encode_privkey(privkey: &PrivateKeyBundle) -> Result<messages::PrivateKey> {
    match privkey.algo {
        Algorithm::Ed25519 => Ok(messages::PrivateKey {
            ed25519: privkey.data.clone(),
        }),
        other => Err(Error::UnsupportedAlgorithm(format!(
            "{} keys cannot be encoded",
            other
        ))),
    }
}

pub fn decode_privkey(privkey: &messages::PrivateKey) -> Result<PrivateKeyBundle> {
    if privkey.ed25519.is_empty() {
        return Err(Error::MalformedWireData("private key without key bytes".to_string()));
    }
    Ok(PrivateKeyBundle::ed25519(&privkey.ed25519))
}

fn encode_signature(signature: &Signature) -> Result<messages::Signature> {
    match signature.algo {
        Algorithm::Ed25519 => Ok(messages::Signature {
            ed25519: signature.data.clone(),
        }),
        other => Err(Error::UnsupportedAlgorithm(format!(
            "{} signatures cannot be encoded",
            other
        ))),
    }
}

pub fn encode_full_signature(sig: &FullSignature) -> Result<StdSignature> {
    Ok(StdSignature {
        sequence: sig.nonce.0,
        pubkey: Some(encode_pubkey(&sig.pubkey)?),
        signature: Some(encode_signature(&sig.signature)?),
    })
}

/// An absent optional string is an empty string on the wire, so `Some("")` has no encoding.
fn encode_optional_string(value: &Option<String>, what: &str) -> Result<String> {
    match value {
        Some(v) if v.is_empty() => Err(Error::BadArgument(format!(
            "{} must be None instead of empty",
            what
        ))),
        Some(v) => Ok(v.clone()),
        None => Ok(String::new()),
    }
}

fn encode_memo(memo: &Option<String>) -> Result<String> {
    let memo = encode_optional_string(memo, "memo")?;
    if memo.len() > MAX_MEMO_LENGTH {
        return Err(Error::BadArgument(format!(
            "memo is {} bytes, at most {} allowed",
            memo.len(),
            MAX_MEMO_LENGTH
        )));
    }
    Ok(memo)
}

fn encode_amounts(amounts: &[Amount]) -> Result<Vec<messages::Coin>> {
    amounts.iter().map(encode_amount).collect()
}

fn encode_height(height: u64) -> Result<i64> {
    i64::try_from(height)
        .map_err(|_| Error::BadArgument(format!("height {} does not fit into int64", height)))
}

fn encode_chain_address(pair: &ChainAddressPair) -> ChainAddress {
    ChainAddress {
        chain_id: pair.chain_id.clone(),
        address: pair.address.clone(),
    }
}

/// Map a domain transaction onto the message of the envelope.
pub fn build_msg(tx: &UnsignedTransaction) -> Result<TxSum> {
    let sender = tx.base().signer_address().raw.to_vec();
    let sum = match tx {
        UnsignedTransaction::Send(send) => TxSum::Send(SendMsg {
            src: sender,
            dest: send.recipient.raw.to_vec(),
            amount: Some(encode_amount(&send.amount)?),
            memo: encode_memo(&send.memo)?,
        }),
        UnsignedTransaction::SetName(set) => TxSum::SetName(SetWalletNameMsg {
            address: sender,
            name: set.name.clone(),
        }),
        UnsignedTransaction::SwapOffer(offer) => TxSum::CreateEscrow(CreateEscrowMsg {
            sender,
            arbiter: offer.hashlock.to_identifier(),
            recipient: offer.recipient.raw.to_vec(),
            amount: encode_amounts(&offer.amounts)?,
            timeout: encode_height(offer.timeout_height)?,
            memo: encode_memo(&offer.memo)?,
        }),
        UnsignedTransaction::SwapClaim(claim) => TxSum::ReleaseEscrow(ReleaseEscrowMsg {
            escrow_id: claim.swap_id.0.clone(),
            amount: Vec::new(),
        }),
        UnsignedTransaction::SwapTimeout(timeout) => TxSum::ReturnEscrow(ReturnEscrowMsg {
            escrow_id: timeout.swap_id.0.clone(),
        }),
        UnsignedTransaction::RegisterBlockchain(reg) => TxSum::IssueBlockchain(IssueBlockchainMsg {
            owner: sender,
            id: reg.chain.chain_id.as_bytes().to_vec(),
            details: Some(BlockchainDetails {
                chain: Some(messages::Chain {
                    chain_id: reg.chain.chain_id.clone(),
                    network_id: encode_optional_string(&reg.chain.network_id, "network id")?,
                    name: reg.chain.name.clone(),
                    enabled: reg.chain.enabled,
                    production: reg.chain.production,
                    main_ticker_id: encode_optional_string(
                        &reg.chain.main_ticker_id,
                        "main ticker id",
                    )?
                    .into_bytes(),
                }),
                iov: Some(IovCodec {
                    codec: reg.codec_name.clone(),
                    codec_config: reg.codec_config.clone(),
                }),
            }),
        }),
        UnsignedTransaction::RegisterUsername(reg) => TxSum::IssueUsername(IssueUsernameMsg {
            id: reg.username.as_bytes().to_vec(),
            owner: sender,
            details: Some(UsernameDetails {
                addresses: reg.addresses.iter().map(encode_chain_address).collect(),
            }),
        }),
        UnsignedTransaction::AddAddressToUsername(add) => {
            TxSum::AddUsernameAddress(ChainAddressMsg {
                username_id: add.username.as_bytes().to_vec(),
                chain_id: add.payload.chain_id.clone(),
                address: add.payload.address.clone(),
            })
        }
        UnsignedTransaction::RemoveAddressFromUsername(remove) => {
            TxSum::RemoveUsernameAddress(ChainAddressMsg {
                username_id: remove.username.as_bytes().to_vec(),
                chain_id: remove.payload.chain_id.clone(),
                address: remove.payload.address.clone(),
            })
        }
    };
    Ok(sum)
}

/// The envelope of an unsigned transaction: message, fee and preimage, no signatures.
pub fn build_unsigned_tx(tx: &UnsignedTransaction) -> Result<TxMsg> {
    let fees = match &tx.base().fee {
        Some(fee) => Some(FeeInfo {
            payer: Vec::new(),
            fees: Some(encode_amount(fee)?),
        }),
        None => None,
    };
    let preimage = match tx {
        UnsignedTransaction::SwapClaim(claim) => claim.preimage.0.clone(),
        _ => Vec::new(),
    };
    Ok(TxMsg {
        sum: Some(build_msg(tx)?),
        fees,
        signatures: Vec::new(),
        preimage,
    })
}

/// The envelope of a signed transaction, primary signature first.
pub fn build_signed_tx(tx: &SignedTransaction) -> Result<TxMsg> {
    let mut msg = build_unsigned_tx(&tx.transaction)?;
    msg.signatures = tx
        .signatures()
        .map(encode_full_signature)
        .collect::<Result<Vec<_>>>()?;
    Ok(msg)
}

pub fn encode_unsigned(tx: &UnsignedTransaction) -> Result<Vec<u8>> {
    trace!("encoding unsigned {} transaction", tx.kind_name());
    build_unsigned_tx(tx)?.to_bytes()
}

pub fn encode_signed(tx: &SignedTransaction) -> Result<Vec<u8>> {
    trace!(
        "encoding {} transaction with {} signatures",
        tx.transaction.kind_name(),
        1 + tx.other_signatures.len()
    );
    build_signed_tx(tx)?.to_bytes()
}

fn decode_pubkey(pubkey: &Option<messages::PublicKey>) -> Result<PublicKeyBundle> {
    match pubkey {
        Some(key) if key.ed25519.len() == PublicKeyBundle::ED25519_SIZE => {
            Ok(PublicKeyBundle::ed25519(&key.ed25519))
        }
        Some(key) => Err(Error::MalformedWireData(format!(
            "ed25519 public key must be 32 bytes, got {}",
            key.ed25519.len()
        ))),
        None => Err(Error::MalformedWireData(
            "signature without public key".to_string(),
        )),
    }
}

pub fn decode_full_signature(sig: &StdSignature) -> Result<FullSignature> {
    let signature = sig.signature.as_ref().ok_or_else(|| {
        Error::MalformedWireData("signature without signature bytes".to_string())
    })?;
    Ok(FullSignature {
        nonce: Nonce(sig.sequence),
        pubkey: decode_pubkey(&sig.pubkey)?,
        signature: Signature::ed25519(&signature.ed25519),
    })
}

fn decode_memo(memo: &str) -> Option<String> {
    match memo {
        "" => None,
        m => Some(m.to_string()),
    }
}

fn decode_address(bytes: &[u8]) -> Result<Address> {
    Address::from_slice(bytes)
}

fn decode_height(height: i64) -> Result<u64> {
    u64::try_from(height)
        .map_err(|_| Error::MalformedWireData(format!("negative height {}", height)))
}

fn decode_utf8(bytes: &[u8], what: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::MalformedWireData(format!("{} is not valid UTF-8", what)))
}

fn decode_optional_string(s: &str) -> Option<String> {
    match s {
        "" => None,
        v => Some(v.to_string()),
    }
}

fn decode_chain_address(address: &ChainAddress) -> ChainAddressPair {
    ChainAddressPair {
        chain_id: address.chain_id.clone(),
        address: address.address.clone(),
    }
}

fn check_sender(field: &str, raw: &[u8], base: &BaseTx) {
    if !raw.is_empty() && raw != base.signer_address().raw {
        warn!(
            "{} {} does not match signer address {}",
            field,
            raw.encode_hex::<String>(),
            base.signer_address()
        );
    }
}

/// Rebuild the domain transaction from an envelope message.
pub fn parse_msg(base: BaseTx, msg: &TxMsg) -> Result<UnsignedTransaction> {
    let sum = msg
        .sum
        .as_ref()
        .ok_or_else(|| Error::UnknownTransactionKind("no message set".to_string()))?;
    let tx = match sum {
        TxSum::Send(send) => {
            check_sender("send source", &send.src, &base);
            let amount = send
                .amount
                .as_ref()
                .ok_or_else(|| Error::MalformedWireData("send without amount".to_string()))?;
            UnsignedTransaction::Send(SendTx {
                recipient: decode_address(&send.dest)?,
                amount: decode_amount(amount)?,
                memo: decode_memo(&send.memo),
                base,
            })
        }
        TxSum::SetName(set) => {
            check_sender("wallet address", &set.address, &base);
            UnsignedTransaction::SetName(SetNameTx {
                name: set.name.clone(),
                base,
            })
        }
        TxSum::CreateEscrow(escrow) => {
            check_sender("escrow sender", &escrow.sender, &base);
            UnsignedTransaction::SwapOffer(SwapOfferTx {
                recipient: decode_address(&escrow.recipient)?,
                amounts: escrow
                    .amount
                    .iter()
                    .map(decode_amount)
                    .collect::<Result<Vec<_>>>()?,
                timeout_height: decode_height(escrow.timeout)?,
                hashlock: hash_from_identifier(&escrow.arbiter)?,
                memo: decode_memo(&escrow.memo),
                base,
            })
        }
        TxSum::ReleaseEscrow(release) => UnsignedTransaction::SwapClaim(SwapClaimTx {
            swap_id: SwapId(release.escrow_id.clone()),
            preimage: Preimage::new(&msg.preimage).map_err(|_| {
                Error::MalformedWireData("swap claim without preimage".to_string())
            })?,
            base,
        }),
        TxSum::ReturnEscrow(ret) => UnsignedTransaction::SwapTimeout(SwapTimeoutTx {
            swap_id: SwapId(ret.escrow_id.clone()),
            base,
        }),
        TxSum::IssueBlockchain(issue) => {
            check_sender("blockchain owner", &issue.owner, &base);
            let details = issue.details.clone().unwrap_or_default();
            let chain = details.chain.unwrap_or_default();
            let iov = details.iov.unwrap_or_default();
            let main_ticker_id = match chain.main_ticker_id.is_empty() {
                true => None,
                false => Some(decode_utf8(&chain.main_ticker_id, "main ticker id")?),
            };
            UnsignedTransaction::RegisterBlockchain(RegisterBlockchainTx {
                chain: ChainInfo {
                    chain_id: chain.chain_id.clone(),
                    name: chain.name.clone(),
                    enabled: chain.enabled,
                    production: chain.production,
                    network_id: decode_optional_string(&chain.network_id),
                    main_ticker_id,
                },
                codec_name: iov.codec,
                codec_config: iov.codec_config,
                base,
            })
        }
        TxSum::IssueUsername(issue) => {
            check_sender("username owner", &issue.owner, &base);
            let addresses: Vec<ChainAddressPair> = issue
                .details
                .as_ref()
                .map(|d| d.addresses.iter().map(decode_chain_address).collect())
                .unwrap_or_default();
            UnsignedTransaction::RegisterUsername(RegisterUsernameTx {
                username: decode_utf8(&issue.id, "username")?,
                addresses,
                base,
            })
        }
        TxSum::AddUsernameAddress(add) => {
            UnsignedTransaction::AddAddressToUsername(AddAddressToUsernameTx {
                username: decode_utf8(&add.username_id, "username")?,
                payload: ChainAddressPair {
                    chain_id: add.chain_id.clone(),
                    address: add.address.clone(),
                },
                base,
            })
        }
        TxSum::RemoveUsernameAddress(remove) => {
            UnsignedTransaction::RemoveAddressFromUsername(RemoveAddressFromUsernameTx {
                username: decode_utf8(&remove.username_id, "username")?,
                payload: ChainAddressPair {
                    chain_id: remove.chain_id.clone(),
                    address: remove.address.clone(),
                },
                base,
            })
        }
        TxSum::Other(kind, _) => {
            return Err(Error::UnknownTransactionKind(format!(
                "{} is not supported",
                kind
            )))
        }
    };
    Ok(tx)
}

/// Rebuild a signed transaction from its envelope. The signer is the key of the first
/// signature.
pub fn parse_tx(msg: &TxMsg, chain_id: &str) -> Result<SignedTransaction> {
    let mut signatures = msg
        .signatures
        .iter()
        .map(decode_full_signature)
        .collect::<Result<Vec<_>>>()?
        .into_iter();
    let primary_signature = signatures.next().ok_or(Error::MissingSignature)?;
    let fee = match msg.fees.as_ref().and_then(|f| f.fees.as_ref()) {
        Some(coin) => Some(decode_amount(coin)?),
        None => None,
    };
    let base = BaseTx {
        chain_id: chain_id.to_string(),
        signer: primary_signature.pubkey.clone(),
        fee,
    };
    Ok(SignedTransaction {
        transaction: parse_msg(base, msg)?,
        primary_signature,
        other_signatures: signatures.collect(),
    })
}

/// Decode the posted bytes of a signed transaction.
pub fn decode_signed(bytes: &[u8], chain_id: &str) -> Result<SignedTransaction> {
    let result = TxMsg::from_bytes(bytes).and_then(|msg| parse_tx(&msg, chain_id));
    match &result {
        Ok(tx) => trace!("decoded {} transaction", tx.transaction.kind_name()),
        Err(e) => debug!("cannot decode {} byte transaction: {}", bytes.len(), e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const PUBKEY: [u8; 32] = hex!("507629b5f1d3946efb8fde961e146359e33610fa1536185d44fdd5011ca011d5");

    fn base(chain_id: &str) -> BaseTx {
        BaseTx::new(chain_id, PublicKeyBundle::ed25519(&PUBKEY))
    }

    fn signature(nonce: i64) -> FullSignature {
        FullSignature {
            nonce: Nonce(nonce),
            pubkey: PublicKeyBundle::ed25519(&PUBKEY),
            signature: Signature::ed25519(&[nonce as u8; 64]),
        }
    }

    fn round_trip(tx: UnsignedTransaction) {
        let chain_id = tx.chain_id().to_string();
        let signed = SignedTransaction {
            transaction: tx,
            primary_signature: signature(17),
            other_signatures: vec![signature(18)],
        };
        let bin = encode_signed(&signed).unwrap();
        let back = decode_signed(&bin, &chain_id).unwrap();
        assert_eq!(back, signed);
    }

    #[test]
    fn send_message_fields() {
        let tx = UnsignedTransaction::Send(SendTx {
            base: base("test-123"),
            recipient: Address {
                raw: hex!("6f0a3e37845b6a3c8ccbe6219199abc3ae0b26d9"),
            },
            amount: Amount::new("250000000000", 9, "ETH").unwrap(),
            memo: Some("Test payment".to_string()),
        });
        match build_msg(&tx).unwrap() {
            TxSum::Send(msg) => {
                assert_eq!(msg.src, hex!("acc00b8f2e26fd093894c5b1d87e03afab71cf99"));
                assert_eq!(msg.amount.unwrap().whole, 250);
                assert_eq!(msg.memo, "Test payment");
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn set_name_round_trip() {
        round_trip(UnsignedTransaction::SetName(SetNameTx {
            base: base("bns-mainnet"),
            name: "king*iov.one".to_string(),
        }));
    }

    #[test]
    fn swap_offer_round_trip() {
        round_trip(UnsignedTransaction::SwapOffer(SwapOfferTx {
            base: base("swap-a-doo"),
            recipient: Address {
                raw: hex!("123485cb38847474fe9febfd56ab67e14bcd56f3"),
            },
            amounts: vec![
                Amount::new("1000000000", 9, "IOV").unwrap(),
                Amount::new("42", 9, "ASH").unwrap(),
            ],
            timeout_height: 7890,
            hashlock: Preimage::new(b"my top secret phrase").unwrap().hashlock(),
            memo: None,
        }));
    }

    #[test]
    fn swap_claim_round_trip() {
        round_trip(UnsignedTransaction::SwapClaim(SwapClaimTx {
            base: base("swap-a-doo"),
            swap_id: SwapId(hex!("1234").to_vec()),
            preimage: Preimage::new(&hex!("00000000fffffffffff000000000")).unwrap(),
        }));
    }

    #[test]
    fn swap_timeout_round_trip() {
        round_trip(UnsignedTransaction::SwapTimeout(SwapTimeoutTx {
            base: base("swap-a-doo"),
            swap_id: SwapId(hex!("1234").to_vec()),
        }));
    }

    #[test]
    fn registrations_round_trip() {
        round_trip(UnsignedTransaction::RegisterBlockchain(RegisterBlockchainTx {
            base: base("bns-testnet"),
            chain: ChainInfo {
                chain_id: "ethereum-eip155-5777".to_string(),
                name: "Ganache".to_string(),
                enabled: true,
                production: false,
                network_id: Some("5777".to_string()),
                main_ticker_id: Some("ETH".to_string()),
            },
            codec_name: "eth".to_string(),
            codec_config: r#"{"chainId":5777}"#.to_string(),
        }));
        round_trip(UnsignedTransaction::RegisterUsername(RegisterUsernameTx {
            base: base("bns-testnet"),
            username: "alice".to_string(),
            addresses: vec![
                ChainAddressPair {
                    chain_id: "ethereum-eip155-5777".to_string(),
                    address: "0x695874053fcB8D9cF038ee4E53b7b24fB0baFa4c".to_string(),
                },
                ChainAddressPair {
                    chain_id: "lisk-198f2b61a8".to_string(),
                    address: "1234567890L".to_string(),
                },
            ],
        }));
        round_trip(UnsignedTransaction::AddAddressToUsername(AddAddressToUsernameTx {
            base: base("bns-testnet"),
            username: "alice".to_string(),
            payload: ChainAddressPair {
                chain_id: "lisk-198f2b61a8".to_string(),
                address: "1234567890L".to_string(),
            },
        }));
        round_trip(UnsignedTransaction::RemoveAddressFromUsername(
            RemoveAddressFromUsernameTx {
                base: base("bns-testnet"),
                username: "alice".to_string(),
                payload: ChainAddressPair {
                    chain_id: "lisk-198f2b61a8".to_string(),
                    address: "1234567890L".to_string(),
                },
            },
        ));
    }

    #[test]
    fn fee_round_trip() {
        let mut b = base("foo-bar-baz");
        b.fee = Some(Amount::new("5432", 9, "PSQL").unwrap());
        round_trip(UnsignedTransaction::Send(SendTx {
            base: b,
            recipient: Address {
                raw: hex!("009985cb38847474fe9febfd56ab67e14bcd56f3"),
            },
            amount: Amount::new("128079890911", 9, "FOO").unwrap(),
            memo: Some("One more fix!".to_string()),
        }));
    }

    #[test]
    fn private_key_wire_form() {
        let key = PrivateKeyBundle::ed25519(&[7; 64]);
        let bin = encode_privkey(&key).unwrap().to_bytes().unwrap();
        assert_eq!(bin[..2], hex!("0a40"));
        let back = decode_privkey(&messages::PrivateKey::from_bytes(&bin).unwrap()).unwrap();
        assert_eq!(back, key);
        assert!(decode_privkey(&messages::PrivateKey::default()).is_err());
    }

    #[test]
    fn memo_limit() {
        let tx = UnsignedTransaction::Send(SendTx {
            base: base("test-123"),
            recipient: Address::default(),
            amount: Amount::from_atomics(1, "IOV"),
            memo: Some("x".repeat(129)),
        });
        assert!(matches!(encode_unsigned(&tx), Err(Error::BadArgument(_))));
    }

    #[test]
    fn empty_optional_strings_are_rejected() {
        // "" is what None decodes from, so Some("") could never come back
        let send = SendTx {
            base: base("test-123"),
            recipient: Address::default(),
            amount: Amount::from_atomics(1, "IOV"),
            memo: Some(String::new()),
        };
        assert!(matches!(
            encode_unsigned(&UnsignedTransaction::Send(send.clone())),
            Err(Error::BadArgument(_))
        ));
        round_trip(UnsignedTransaction::Send(SendTx { memo: None, ..send }));

        let offer = SwapOfferTx {
            base: base("test-123"),
            recipient: Address::default(),
            amounts: vec![Amount::from_atomics(1, "IOV")],
            timeout_height: 10,
            hashlock: Preimage::new(b"x").unwrap().hashlock(),
            memo: Some(String::new()),
        };
        assert!(matches!(
            encode_unsigned(&UnsignedTransaction::SwapOffer(offer)),
            Err(Error::BadArgument(_))
        ));

        let chain = ChainInfo {
            chain_id: "ethereum-eip155-5777".to_string(),
            name: "Ganache".to_string(),
            enabled: true,
            production: false,
            network_id: Some(String::new()),
            main_ticker_id: None,
        };
        let register = |chain: ChainInfo| {
            UnsignedTransaction::RegisterBlockchain(RegisterBlockchainTx {
                base: base("bns-testnet"),
                chain,
                codec_name: "eth".to_string(),
                codec_config: "{}".to_string(),
            })
        };
        assert!(encode_unsigned(&register(chain.clone())).is_err());
        let ticker = ChainInfo {
            network_id: None,
            main_ticker_id: Some(String::new()),
            ..chain.clone()
        };
        assert!(encode_unsigned(&register(ticker)).is_err());
        round_trip(register(ChainInfo {
            network_id: None,
            ..chain
        }));
    }

    #[test]
    fn secp256k1_cannot_be_encoded() {
        let mut signed = SignedTransaction::new(
            UnsignedTransaction::SetName(SetNameTx {
                base: base("test-123"),
                name: "x".to_string(),
            }),
            signature(1),
        );
        signed.primary_signature.pubkey.algo = Algorithm::Secp256k1;
        assert!(matches!(
            encode_signed(&signed),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn offer_requires_hash_lock() {
        let msg = TxMsg {
            sum: Some(TxSum::CreateEscrow(CreateEscrowMsg {
                arbiter: vec![7; 20],
                recipient: vec![1; 20],
                ..Default::default()
            })),
            signatures: vec![encode_full_signature(&signature(1)).unwrap()],
            ..Default::default()
        };
        assert_eq!(
            parse_tx(&msg, "test-123"),
            Err(Error::NotAHashIdentifier)
        );
    }

    #[test]
    fn unsupported_kind() {
        let msg = TxMsg {
            sum: Some(TxSum::Other(
                crate::wire::MessageKind::UpdateEscrowParties,
                bytes::Bytes::new(),
            )),
            signatures: vec![encode_full_signature(&signature(1)).unwrap()],
            ..Default::default()
        };
        let bin = msg.to_bytes().unwrap();
        assert!(matches!(
            decode_signed(&bin, "test-123"),
            Err(Error::UnknownTransactionKind(_))
        ));
        let empty = TxMsg {
            signatures: msg.signatures.clone(),
            ..Default::default()
        };
        assert!(matches!(
            parse_tx(&empty, "test-123"),
            Err(Error::UnknownTransactionKind(_))
        ));
    }

    #[test]
    fn claim_requires_preimage() {
        let msg = TxMsg {
            sum: Some(TxSum::ReleaseEscrow(ReleaseEscrowMsg {
                escrow_id: vec![1, 2],
                amount: vec![],
            })),
            signatures: vec![encode_full_signature(&signature(1)).unwrap()],
            ..Default::default()
        };
        assert!(matches!(
            parse_tx(&msg, "test-123"),
            Err(Error::MalformedWireData(_))
        ));
    }
}
