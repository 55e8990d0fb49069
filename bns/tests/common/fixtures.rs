use bnscodec::bns::{
    Address, Amount, BaseTx, FullSignature, Nonce, PrivateKeyBundle, PublicKeyBundle, SendTx,
    Signature, SignedTransaction, UnsignedTransaction,
};
use hex_literal::hex;

pub const CHAIN_ID: &str = "test-123";

pub const PUBKEY: [u8; 32] = hex!("507629b5f1d3946efb8fde961e146359e33610fa1536185d44fdd5011ca011d5");
pub const SEED: [u8; 32] = hex!("516e6af7454f31fa56a43d112ea847c7e5aeea754f08385ca55935757161ad96");
pub const SIGNER_ADDRESS: [u8; 20] = hex!("acc00b8f2e26fd093894c5b1d87e03afab71cf99");
pub const RECIPIENT: [u8; 20] = hex!("6f0a3e37845b6a3c8ccbe6219199abc3ae0b26d9");

pub const SEND_TX_BIN: [u8; 70] = hex!(
    "0a440a14acc00b8f2e26fd093894c5b1d87e03afab71cf9912146f0a3e37845b6a3c8ccbe6219199abc3ae0b26d9"
    "1a0808fa011a03455448220c54657374207061796d656e74"
);

pub const SIGNATURE: [u8; 64] = hex!(
    "f838ecb02d960345fa101f1ecfa5acc18396d4e122cfb2f7f7af6b38e7318a4b"
    "2ddf7a5e5f5a214ed1c759780a2fe187c1c30effcfb4c6a0174e44133fe0630e"
);

pub const SIG2: [u8; 64] = hex!(
    "baddad00cafe00bece8675da9d005f2018b69820673d57f5500ae2728d3e5012"
    "a44c786133cd911cc40761cda9ccf9094c1bbe1dc11f2d568cc4998072819a0c"
);

/// Upper case hex of the first 20 bytes of sha256 over the signed transaction.
pub const SIGNED_TX_ID: &str = "AA8C75E0334843968E5EBA9FB0571A4EE4718C54";

pub fn sign_bytes() -> Vec<u8> {
    [&hex!("00cafe0008746573742d3132330000000000000011")[..], &SEND_TX_BIN[..]].concat()
}

pub fn signed_tx_bin() -> Vec<u8> {
    [
        &SEND_TX_BIN[..],
        &hex!("aa016a081112220a20")[..],
        &PUBKEY[..],
        &hex!("22420a40")[..],
        &SIGNATURE[..],
    ]
    .concat()
}

pub fn pubkey() -> PublicKeyBundle {
    PublicKeyBundle::ed25519(&PUBKEY)
}

pub fn private_key() -> PrivateKeyBundle {
    PrivateKeyBundle::ed25519(&[SEED, PUBKEY].concat())
}

pub fn send_tx() -> UnsignedTransaction {
    UnsignedTransaction::Send(SendTx {
        base: BaseTx::new(CHAIN_ID, pubkey()),
        recipient: Address { raw: RECIPIENT },
        amount: Amount::new("250000000000", 9, "ETH").unwrap(),
        memo: Some("Test payment".to_string()),
    })
}

pub fn full_signature() -> FullSignature {
    FullSignature {
        nonce: Nonce(17),
        pubkey: pubkey(),
        signature: Signature::ed25519(&SIGNATURE),
    }
}

pub fn signed_tx() -> SignedTransaction {
    SignedTransaction::new(send_tx(), full_signature())
}
