use hex::FromHexError;
use std::string::FromUtf8Error;

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;

/// Standard error type used in the library
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An argument provided is invalid
    BadArgument(String),
    /// The data provided is invalid
    BadData(String),
    /// The key or signature algorithm cannot be used here.
    UnsupportedAlgorithm(String),
    /// The address could not be decoded or is not valid for the chain.
    InvalidAddress(String),
    /// The bytes are not a well formed protobuf encoding of the expected message.
    MalformedWireData(String),
    /// The transaction envelope does not carry a supported message.
    UnknownTransactionKind(String),
    /// More than one message of the transaction envelope is set.
    AmbiguousUnion { first: String, second: String },
    /// The transaction carries no signature.
    MissingSignature,
    /// The chain id does not fit into the sign bytes.
    ChainIdTooLong(usize),
    /// The bytes do not start with the hash identifier prefix.
    NotAHashIdentifier,
    /// The amount does not use the fractional digits of the chain.
    FractionalDigitsMismatch { expected: u32, received: u32 },
    /// The swap is not in a state that allows the requested transition.
    SwapTransition { from: String, to: String },
    /// The counter leg of a swap would not expire before the offer leg.
    TimeoutOrdering {
        offer_secs: u64,
        counter_secs: u64,
        margin_secs: u64,
    },
    /// Hex string could not be decoded
    FromHexError(FromHexError),
    /// String conversion error
    Utf8Error(FromUtf8Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadArgument(s) => f.write_str(&format!("Bad argument: {}", s)),
            Error::BadData(s) => f.write_str(&format!("Bad data: {}", s)),
            Error::UnsupportedAlgorithm(s) => {
                f.write_str(&format!("Unsupported algorithm: {}", s))
            }
            Error::InvalidAddress(s) => f.write_str(&format!("Invalid address: {}", s)),
            Error::MalformedWireData(s) => f.write_str(&format!("Malformed wire data: {}", s)),
            Error::UnknownTransactionKind(s) => {
                f.write_str(&format!("Unknown transaction kind: {}", s))
            }
            Error::AmbiguousUnion { first, second } => f.write_str(&format!(
                "Ambiguous transaction: both {} and {} are set",
                first, second
            )),
            Error::MissingSignature => f.write_str("Transaction has no signature"),
            Error::ChainIdTooLong(len) => f.write_str(&format!(
                "Chain id too long: {} bytes, at most 255 allowed",
                len
            )),
            Error::NotAHashIdentifier => f.write_str("Not a hash identifier"),
            Error::FractionalDigitsMismatch { expected, received } => f.write_str(&format!(
                "Fractional digits mismatch: expected {}, got {}",
                expected, received
            )),
            Error::SwapTransition { from, to } => {
                f.write_str(&format!("Swap cannot move from {} to {}", from, to))
            }
            Error::TimeoutOrdering {
                offer_secs,
                counter_secs,
                margin_secs,
            } => f.write_str(&format!(
                "Counter leg expires in {}s, must be at least {}s before the offer leg ({}s)",
                counter_secs, margin_secs, offer_secs
            )),
            Error::FromHexError(e) => f.write_str(&format!("Hex decoding error: {}", e)),
            Error::Utf8Error(e) => f.write_str(&format!("UTF8 error: {}", e)),
        }
    }
}

impl std::error::Error for Error {}

impl From<FromHexError> for Error {
    fn from(e: FromHexError) -> Self {
        Error::FromHexError(e)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(e: FromUtf8Error) -> Self {
        Error::Utf8Error(e)
    }
}
