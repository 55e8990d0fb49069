//! Transaction codec for the BNS blockchain.
//!
//! This library encodes and decodes BNS transactions in their protobuf wire form, computes
//! sign bytes, transaction ids and bech32 addresses, and tracks hash locked atomic swaps
//! between BNS and a second chain.

/// Contains the BNS transaction types, addresses, amounts and the transaction codec.
pub mod bns;

/// Contains the atomic swap state machine and the cross chain timeout rules.
pub mod swap;

/// Contains the protobuf wire primitives.
pub mod wire;

mod result;
pub use result::{Error, Result};
