use crate::bns::address::{identity_to_address, is_valid_address};
use crate::bns::hash::{sha256, sha512, TransactionId};
use crate::bns::keys::{Algorithm, FullSignature, Nonce, PublicKeyBundle};
use crate::bns::params::{ChainParams, PrehashType, MAX_CHAIN_ID_LENGTH};
use crate::bns::tx::{decode_signed, encode_signed, encode_unsigned, SignedTransaction, UnsignedTransaction};
use crate::{Error, Result};
use log::trace;
use ring::signature::{UnparsedPublicKey, ED25519};

/// Version prefix of the sign bytes.
pub const SIGN_CODE_V1: [u8; 4] = [0x00, 0xca, 0xfe, 0x00];

/// Build the sign bytes from the encoded unsigned transaction.
///
/// Layout: version prefix, chain id length (one byte), chain id, nonce (8 bytes big endian),
/// transaction bytes.
pub fn append_sign_bytes(tx_bytes: &[u8], chain_id: &str, nonce: Nonce) -> Result<Vec<u8>> {
    if !chain_id.is_ascii() {
        return Err(Error::BadArgument(format!(
            "chain id {:?} must be ASCII",
            chain_id
        )));
    }
    if chain_id.len() > MAX_CHAIN_ID_LENGTH {
        return Err(Error::ChainIdTooLong(chain_id.len()));
    }
    let mut bytes = Vec::with_capacity(SIGN_CODE_V1.len() + 1 + chain_id.len() + 8 + tx_bytes.len());
    bytes.extend_from_slice(&SIGN_CODE_V1);
    bytes.push(chain_id.len() as u8);
    bytes.extend_from_slice(chain_id.as_bytes());
    bytes.extend_from_slice(&nonce.0.to_be_bytes());
    bytes.extend_from_slice(tx_bytes);
    Ok(bytes)
}

/// The bytes a signer has to sign and how to prepare them for the signing algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningJob {
    pub bytes: Vec<u8>,
    pub prehash: PrehashType,
}

impl SigningJob {
    /// The message handed to the signing algorithm.
    pub fn message(&self) -> Vec<u8> {
        match self.prehash {
            PrehashType::None => self.bytes.clone(),
            PrehashType::Sha256 => sha256(&self.bytes).to_vec(),
            PrehashType::Sha512 => sha512(&self.bytes).to_vec(),
        }
    }
}

/// Transaction codec for one chain.
#[derive(Debug, Clone, Default)]
pub struct BnsCodec {
    pub params: ChainParams,
}

impl BnsCodec {
    pub fn new(params: ChainParams) -> BnsCodec {
        BnsCodec { params }
    }

    pub fn for_chain(chain_id: &str) -> BnsCodec {
        BnsCodec::new(ChainParams::for_chain(chain_id))
    }

    pub fn bytes_to_sign(&self, tx: &UnsignedTransaction, nonce: Nonce) -> Result<SigningJob> {
        let tx_bytes = encode_unsigned(tx)?;
        let bytes = append_sign_bytes(&tx_bytes, tx.chain_id(), nonce)?;
        trace!(
            "sign bytes for {} transaction, nonce {}: {} bytes",
            tx.kind_name(),
            nonce.0,
            bytes.len()
        );
        Ok(SigningJob {
            bytes,
            prehash: self.params.prehash,
        })
    }

    pub fn bytes_to_post(&self, tx: &SignedTransaction) -> Result<Vec<u8>> {
        encode_signed(tx)
    }

    /// The id of the transaction once it is posted.
    pub fn identifier(&self, tx: &SignedTransaction) -> Result<TransactionId> {
        Ok(TransactionId::from_posted(&self.bytes_to_post(tx)?))
    }

    /// Decode posted bytes. The chain id is not part of the encoding and has to be supplied.
    pub fn parse_bytes(&self, bytes: &[u8], chain_id: &str) -> Result<SignedTransaction> {
        decode_signed(bytes, chain_id)
    }

    pub fn identity_to_address(&self, pubkey: &PublicKeyBundle) -> Result<String> {
        identity_to_address(&self.params.chain_id, pubkey)
    }

    pub fn is_valid_address(&self, address: &str) -> bool {
        is_valid_address(address, &self.params.address_prefix)
    }

    /// Check one signature of a transaction against its sign bytes.
    pub fn verify_signature(&self, tx: &UnsignedTransaction, sig: &FullSignature) -> Result<bool> {
        if sig.pubkey.algo != Algorithm::Ed25519 || sig.signature.algo != Algorithm::Ed25519 {
            return Err(Error::UnsupportedAlgorithm(format!(
                "cannot verify {} signatures",
                sig.signature.algo
            )));
        }
        let job = self.bytes_to_sign(tx, sig.nonce)?;
        let key = UnparsedPublicKey::new(&ED25519, &sig.pubkey.data);
        Ok(key.verify(&job.message(), &sig.signature.data).is_ok())
    }

    /// Check every signature of a signed transaction.
    pub fn verify_all(&self, tx: &SignedTransaction) -> Result<bool> {
        for sig in tx.signatures() {
            if !self.verify_signature(&tx.transaction, sig)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
