use crate::bns::messages::{Coin, Escrow, ResultSet, Token, UserData, Wallet};
use crate::bns::params::{address_prefix, BNS_FRACTIONAL_DIGITS};
use crate::bns::{
    decode_amount, encode_address, key_to_address, Address, Amount, Hashlock, Nonce,
    PublicKeyBundle, SignedTransaction, SwapId, TransactionId, UnsignedTransaction,
};
use crate::bns::hashlock::{hash_from_identifier, is_hash_identifier};
use crate::swap::state::{AtomicSwap, Settlement, SwapData, SwapEvent};
use crate::wire::Encodable;
use crate::{Error, Result};
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key prefix of the escrow bucket.
pub const ESCROW_PREFIX: &[u8] = b"esc:";
/// Key prefix of the wallet bucket.
pub const WALLET_PREFIX: &[u8] = b"wllt:";
/// Key prefix of the token bucket.
pub const TOKEN_PREFIX: &[u8] = b"tkn:";
/// Key prefix of the signer bucket, holding nonces.
pub const USER_PREFIX: &[u8] = b"sigs:";

/// A record returned by a chain query together with its key, bucket prefix removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyed<T> {
    pub id: Vec<u8>,
    pub value: T,
}

impl<T: Encodable> Keyed<T> {
    pub fn decode(key: &[u8], value: &[u8], prefix: &[u8]) -> Result<Keyed<T>> {
        let id = key.strip_prefix(prefix).ok_or_else(|| {
            Error::BadData(format!(
                "key {} is not in bucket {}",
                hex::encode(key),
                String::from_utf8_lossy(prefix)
            ))
        })?;
        Ok(Keyed {
            id: id.to_vec(),
            value: T::from_bytes(value)?,
        })
    }
}

/// Pair up the key and value result sets of a query and decode each record.
pub fn decode_result_set<T: Encodable>(keys: &[u8], values: &[u8], prefix: &[u8]) -> Result<Vec<Keyed<T>>> {
    let keys = ResultSet::from_bytes(keys)?.results;
    let values = ResultSet::from_bytes(values)?.results;
    if keys.len() != values.len() {
        return Err(Error::BadData(format!(
            "query returned {} keys and {} values",
            keys.len(),
            values.len()
        )));
    }
    trace!("decoding {} query results", keys.len());
    keys.iter()
        .zip(values.iter())
        .map(|(k, v)| Keyed::decode(k, v, prefix))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub token_ticker: String,
    pub token_name: String,
    pub fractional_digits: u32,
}

impl TickerInfo {
    pub const UNKNOWN_NAME: &'static str = "<Unknown token>";

    pub fn unknown(token_ticker: &str) -> TickerInfo {
        TickerInfo {
            token_ticker: token_ticker.to_string(),
            token_name: TickerInfo::UNKNOWN_NAME.to_string(),
            fractional_digits: BNS_FRACTIONAL_DIGITS,
        }
    }
}

/// Token records are keyed by their ticker. All tokens on the chain use the same fractional
/// digits.
pub fn decode_token(token: &Keyed<Token>) -> Result<TickerInfo> {
    let ticker = String::from_utf8(token.id.clone())?;
    if !ticker.is_ascii() {
        return Err(Error::BadData(format!("ticker {:?} is not ASCII", ticker)));
    }
    Ok(TickerInfo {
        token_ticker: ticker,
        token_name: token.value.name.clone(),
        fractional_digits: BNS_FRACTIONAL_DIGITS,
    })
}

/// The signer record of an address: the nonce to sign with next and the key, once known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountNonce {
    pub address: Address,
    pub nonce: Nonce,
    pub pubkey: Option<PublicKeyBundle>,
}

pub fn decode_nonce(user: &Keyed<UserData>) -> Result<AccountNonce> {
    Ok(AccountNonce {
        address: Address::from_slice(&user.id)?,
        nonce: Nonce(user.value.sequence),
        pubkey: user
            .value
            .pubkey
            .as_ref()
            .map(|k| PublicKeyBundle::ed25519(&k.ed25519)),
    })
}

/// An amount with the name of its token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAmount {
    pub amount: Amount,
    pub token_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletData {
    pub address: String,
    pub balance: Vec<NamedAmount>,
}

/// Chain data that does not change while connected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainData {
    pub chain_id: String,
    pub tickers: BTreeMap<String, TickerInfo>,
}

impl ChainData {
    pub fn new(chain_id: &str, tickers: Vec<TickerInfo>) -> ChainData {
        ChainData {
            chain_id: chain_id.to_string(),
            tickers: tickers
                .into_iter()
                .map(|t| (t.token_ticker.clone(), t))
                .collect(),
        }
    }
}

/// A transaction accepted in a block. `result` is the data returned by the chain, for a swap
/// offer that is the id of the new escrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransaction {
    pub height: u64,
    pub transaction_id: TransactionId,
    pub result: Vec<u8>,
    pub signed: SignedTransaction,
}

/// Turns query records and confirmed transactions into domain values for one chain.
#[derive(Debug, Clone)]
pub struct Context {
    chain_data: ChainData,
}

impl Context {
    pub fn new(chain_data: ChainData) -> Context {
        Context { chain_data }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_data.chain_id
    }

    pub fn ticker(&self, token_ticker: &str) -> TickerInfo {
        match self.chain_data.tickers.get(token_ticker) {
            Some(info) => info.clone(),
            None => {
                warn!("no token info for ticker {}", token_ticker);
                TickerInfo::unknown(token_ticker)
            }
        }
    }

    pub fn coin(&self, coin: &Coin) -> Result<NamedAmount> {
        let amount = decode_amount(coin)?;
        let token_name = self.ticker(&amount.token_ticker).token_name;
        Ok(NamedAmount { amount, token_name })
    }

    /// The wallet name stored on chain is not returned.
    pub fn wallet(&self, wallet: &Keyed<Wallet>) -> Result<WalletData> {
        let address = Address::from_slice(&wallet.id)?;
        Ok(WalletData {
            address: encode_address(&address, address_prefix(self.chain_id()))?,
            balance: wallet
                .value
                .coins
                .iter()
                .map(|c| self.coin(c))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    /// An open swap from an escrow record. Escrows not controlled by a hashlock are rejected.
    pub fn swap_offer(&self, escrow: &Keyed<Escrow>) -> Result<AtomicSwap> {
        let hashlock = escrow_hashlock(&escrow.value.arbiter)?;
        let timeout_height = u64::try_from(escrow.value.timeout)
            .map_err(|_| Error::BadData(format!("negative timeout {}", escrow.value.timeout)))?;
        Ok(AtomicSwap::Open(SwapData {
            id: SwapId(escrow.id.clone()),
            sender: Address::from_slice(&escrow.value.sender)?,
            recipient: Address::from_slice(&escrow.value.recipient)?,
            hashlock,
            amounts: escrow
                .value
                .amount
                .iter()
                .map(decode_amount)
                .collect::<Result<Vec<_>>>()?,
            timeout_height,
            memo: match escrow.value.memo.as_str() {
                "" => None,
                m => Some(m.to_string()),
            },
        }))
    }

    /// The open swap created by a confirmed swap offer.
    pub fn swap_offer_from_tx(&self, tx: &ConfirmedTransaction) -> Result<AtomicSwap> {
        match &tx.signed.transaction {
            UnsignedTransaction::SwapOffer(offer) => {
                if tx.result.is_empty() {
                    return Err(Error::BadData(format!(
                        "swap offer {} has no escrow id",
                        tx.transaction_id
                    )));
                }
                Ok(AtomicSwap::Open(SwapData {
                    id: SwapId(tx.result.clone()),
                    sender: key_to_address(&offer.base.signer),
                    recipient: offer.recipient,
                    hashlock: offer.hashlock,
                    amounts: offer.amounts.clone(),
                    timeout_height: offer.timeout_height,
                    memo: offer.memo.clone(),
                }))
            }
            other => Err(Error::BadArgument(format!(
                "{} transaction is not a swap offer",
                other.kind_name()
            ))),
        }
    }

    /// The swap event carried by a confirmed transaction, if any.
    pub fn swap_event(&self, tx: &ConfirmedTransaction) -> Result<Option<SwapEvent>> {
        if let UnsignedTransaction::SwapOffer(_) = tx.signed.transaction {
            let swap = self.swap_offer_from_tx(tx)?;
            return Ok(Some(SwapEvent::Offered(swap.data().clone())));
        }
        Ok(Settlement::from_transaction(&tx.signed.transaction, tx.height).map(SwapEvent::Settled))
    }
}

fn escrow_hashlock(arbiter: &[u8]) -> Result<Hashlock> {
    if !is_hash_identifier(arbiter) {
        return Err(Error::BadData("escrow not controlled by a hashlock".to_string()));
    }
    hash_from_identifier(arbiter)
}
