use crate::bns::messages::Coin;
use crate::bns::params::BNS_FRACTIONAL_DIGITS;
use crate::{Error, Result};
use num::{BigUint, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The number of atomic units in one whole token.
const FRACTION_DIVISOR: u64 = 1_000_000_000;

/// A fixed point token amount.
///
/// `quantity` is the amount in atomic units as a decimal string without leading zeros, so
/// `1.5 IOV` is `{ quantity: "1500000000", fractional_digits: 9, token_ticker: "IOV" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    pub quantity: String,
    pub fractional_digits: u32,
    pub token_ticker: String,
}

impl Amount {
    /// Create an amount, normalising the quantity.
    pub fn new(quantity: &str, fractional_digits: u32, token_ticker: &str) -> Result<Amount> {
        Ok(Amount {
            quantity: parse_quantity(quantity)?.to_string(),
            fractional_digits,
            token_ticker: token_ticker.to_string(),
        })
    }

    /// An amount of atomic units using the fractional digits of the chain.
    pub fn from_atomics(atomics: u64, token_ticker: &str) -> Amount {
        Amount {
            quantity: atomics.to_string(),
            fractional_digits: BNS_FRACTIONAL_DIGITS,
            token_ticker: token_ticker.to_string(),
        }
    }

    /// Parse an amount written for humans, such as `1.23 IOV` or `42CASH`.
    ///
    /// The ticker must be 3 or 4 upper case letters. The result uses the fractional digits
    /// of the chain.
    pub fn from_human(s: &str) -> Result<Amount> {
        let bad = || Error::BadArgument(format!("cannot parse amount {:?}", s));
        let s = s.trim();
        let ticker_start = s
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_uppercase())
            .last()
            .map(|(i, _)| i)
            .ok_or_else(bad)?;
        let ticker = &s[ticker_start..];
        if !(3..=4).contains(&ticker.len()) {
            return Err(bad());
        }
        let number = s[..ticker_start].trim_end();
        let (whole, fraction) = match number.split_once('.') {
            Some((w, f)) if !f.is_empty() => (w, f),
            Some(_) => return Err(bad()),
            None => (number, ""),
        };
        let digits = BNS_FRACTIONAL_DIGITS as usize;
        if whole.is_empty()
            || fraction.len() > digits
            || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(bad());
        }
        let padded = format!("{}{}{}", whole, fraction, "0".repeat(digits - fraction.len()));
        Amount::new(&padded, BNS_FRACTIONAL_DIGITS, ticker)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let digits = self.fractional_digits as usize;
        if digits == 0 {
            return write!(f, "{} {}", self.quantity, self.token_ticker);
        }
        let padded = format!("{:0>width$}", self.quantity, width = digits + 1);
        let (whole, fraction) = padded.split_at(padded.len() - digits);
        write!(f, "{}.{} {}", whole, fraction, self.token_ticker)
    }
}

fn parse_quantity(quantity: &str) -> Result<BigUint> {
    if quantity.is_empty() || !quantity.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::BadArgument(format!(
            "quantity must be a decimal number, got {:?}",
            quantity
        )));
    }
    BigUint::parse_bytes(quantity.as_bytes(), 10)
        .ok_or_else(|| Error::BadArgument(format!("invalid quantity {:?}", quantity)))
}

/// Convert an amount to its wire form.
///
/// The amount must use the fractional digits of the chain and the whole part must fit into
/// an int64.
pub fn encode_amount(amount: &Amount) -> Result<Coin> {
    if amount.fractional_digits != BNS_FRACTIONAL_DIGITS {
        return Err(Error::FractionalDigitsMismatch {
            expected: BNS_FRACTIONAL_DIGITS,
            received: amount.fractional_digits,
        });
    }
    let quantity = parse_quantity(&amount.quantity)?;
    let divisor = BigUint::from(FRACTION_DIVISOR);
    let whole = (&quantity / &divisor).to_i64().ok_or_else(|| {
        Error::BadArgument(format!("amount {} is too large", amount))
    })?;
    let fractional = (&quantity % &divisor).to_i64().unwrap_or_default();
    Ok(Coin {
        whole,
        fractional,
        ticker: amount.token_ticker.clone(),
    })
}

/// Convert a wire coin to an amount.
pub fn decode_amount(coin: &Coin) -> Result<Amount> {
    if coin.whole < 0 {
        return Err(Error::MalformedWireData(
            "component `whole` must not be negative".to_string(),
        ));
    }
    if coin.fractional < 0 || coin.fractional >= FRACTION_DIVISOR as i64 {
        return Err(Error::MalformedWireData(format!(
            "component `fractional` out of range: {}",
            coin.fractional
        )));
    }
    let quantity = BigUint::from(coin.whole as u64) * BigUint::from(FRACTION_DIVISOR)
        + BigUint::from(coin.fractional as u64);
    Ok(Amount {
        quantity: quantity.to_string(),
        fractional_digits: BNS_FRACTIONAL_DIGITS,
        token_ticker: coin.ticker.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(whole: i64, fractional: i64, ticker: &str) -> Coin {
        Coin {
            whole,
            fractional,
            ticker: ticker.to_string(),
        }
    }

    #[test]
    fn decode_examples() {
        let a = decode_amount(&coin(3, 123456789, "ASH")).unwrap();
        assert_eq!(a, Amount::new("3123456789", 9, "ASH").unwrap());
        let a = decode_amount(&coin(0, 1, "ASH")).unwrap();
        assert_eq!(a.quantity, "1");
        assert_eq!(a.fractional_digits, 9);
        assert_eq!(a.token_ticker, "ASH");
        let a = decode_amount(&coin(0, 0, "ASH")).unwrap();
        assert_eq!(a.quantity, "0");
    }

    #[test]
    fn decode_large_whole() {
        let a = decode_amount(&coin(i64::MAX, 999_999_999, "IOV")).unwrap();
        assert_eq!(a.quantity, "9223372036854775807999999999");
        assert_eq!(encode_amount(&a).unwrap(), coin(i64::MAX, 999_999_999, "IOV"));
    }

    #[test]
    fn decode_rejects_out_of_range() {
        assert!(matches!(
            decode_amount(&coin(-1, 0, "IOV")),
            Err(Error::MalformedWireData(_))
        ));
        assert!(decode_amount(&coin(0, -5, "IOV")).is_err());
        assert!(decode_amount(&coin(1, 1_000_000_000, "IOV")).is_err());
    }

    #[test]
    fn encode_examples() {
        let a = Amount::new("250000000000", 9, "ETH").unwrap();
        assert_eq!(encode_amount(&a).unwrap(), coin(250, 0, "ETH"));
        let a = Amount::new("1", 9, "ASH").unwrap();
        assert_eq!(encode_amount(&a).unwrap(), coin(0, 1, "ASH"));
        let a = Amount::new("128079890911", 9, "FOO").unwrap();
        assert_eq!(encode_amount(&a).unwrap(), coin(128, 79890911, "FOO"));
    }

    #[test]
    fn encode_requires_chain_digits() {
        let a = Amount::new("1000", 6, "USD").unwrap();
        assert_eq!(
            encode_amount(&a),
            Err(Error::FractionalDigitsMismatch {
                expected: 9,
                received: 6
            })
        );
    }

    #[test]
    fn encode_rejects_overflow() {
        let a = Amount::new("9223372036854775808000000000", 9, "IOV").unwrap();
        assert!(matches!(encode_amount(&a), Err(Error::BadArgument(_))));
    }

    #[test]
    fn quantity_must_be_digits() {
        assert!(Amount::new("", 9, "IOV").is_err());
        assert!(Amount::new("-1", 9, "IOV").is_err());
        assert!(Amount::new("1_000", 9, "IOV").is_err());
        assert!(Amount::new("1.5", 9, "IOV").is_err());
        assert_eq!(Amount::new("00042", 9, "IOV").unwrap().quantity, "42");
        assert_eq!(Amount::new("000", 9, "IOV").unwrap().quantity, "0");
    }

    #[test]
    fn human_amounts() {
        assert_eq!(
            Amount::from_human("1.23 IOV").unwrap(),
            Amount::new("1230000000", 9, "IOV").unwrap()
        );
        assert_eq!(Amount::from_human("42CASH").unwrap().quantity, "42000000000");
        assert_eq!(Amount::from_human("0.000000001 ASH").unwrap().quantity, "1");
        assert!(Amount::from_human("1.2 io").is_err());
        assert!(Amount::from_human("1.2 TOOLONG").is_err());
        assert!(Amount::from_human("1. IOV").is_err());
        assert!(Amount::from_human(".5 IOV").is_err());
        assert!(Amount::from_human("0.0000000001 IOV").is_err());
        assert!(Amount::from_human("IOV").is_err());
    }

    #[test]
    fn display() {
        let a = Amount::new("250000000000", 9, "ETH").unwrap();
        assert_eq!(a.to_string(), "250.000000000 ETH");
        let a = Amount::new("5432", 9, "PSQL").unwrap();
        assert_eq!(a.to_string(), "0.000005432 PSQL");
        let a = Amount::new("17", 0, "PTS").unwrap();
        assert_eq!(a.to_string(), "17 PTS");
    }
}
