// Amount - non-negative 256-bit quantity of native currency

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Decimals of the host's native currency unit (1 ether = 10^18 wei)
pub const NATIVE_DECIMALS: usize = 18;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmountError {
    #[error("Empty amount string")]
    Empty,

    #[error("Invalid digit in amount: {0}")]
    InvalidDigit(String),

    #[error("Too many fractional digits: at most {max}, got {got}")]
    TooPrecise { max: usize, got: usize },

    #[error("Amount does not fit in 256 bits")]
    Overflow,
}

/// Value in base units, with unsigned 256-bit semantics.
///
/// All arithmetic is checked; there is no wrapping or saturating variant.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Amount = Amount(U256([0; 4]));
    pub const MAX: Amount = Amount(U256([u64::MAX; 4]));

    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(U256::from(value))
    }

    pub fn from_u128(value: u128) -> Self {
        Self(U256::from(value))
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Parse a base-unit integer in decimal notation
    pub fn from_dec_str(s: &str) -> Result<Self, AmountError> {
        parse_digits(s).map(Amount)
    }

    /// Parse a decimal string such as `"0.5"` into base units with the given
    /// number of decimals.
    pub fn parse_units(s: &str, decimals: usize) -> Result<Self, AmountError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if frac.len() > decimals {
            return Err(AmountError::TooPrecise {
                max: decimals,
                got: frac.len(),
            });
        }

        let whole = if whole.is_empty() { U256::zero() } else { parse_digits(whole)? };
        let frac_value = if frac.is_empty() {
            U256::zero()
        } else {
            let padded = format!("{:0<width$}", frac, width = decimals);
            parse_digits(&padded)?
        };

        let scale = checked_pow10(decimals)?;
        whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(frac_value))
            .map(Amount)
            .ok_or(AmountError::Overflow)
    }

    /// Parse a decimal amount of the native unit (18 decimals)
    pub fn parse_ether(s: &str) -> Result<Self, AmountError> {
        Self::parse_units(s, NATIVE_DECIMALS)
    }

    /// Render as a decimal string with the given number of decimals,
    /// trailing fractional zeros trimmed.
    pub fn format_units(&self, decimals: usize) -> String {
        let digits = self.0.to_string();
        if decimals == 0 {
            return digits;
        }

        let padded = format!("{:0>width$}", digits, width = decimals + 1);
        let (whole, frac) = padded.split_at(padded.len() - decimals);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, frac)
        }
    }
}

fn parse_digits(s: &str) -> Result<U256, AmountError> {
    if s.is_empty() {
        return Err(AmountError::Empty);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidDigit(s.to_string()));
    }
    U256::from_dec_str(s).map_err(|_| AmountError::Overflow)
}

fn checked_pow10(exp: usize) -> Result<U256, AmountError> {
    let ten = U256::from(10u8);
    (0..exp).try_fold(U256::one(), |acc, _| acc.checked_mul(ten).ok_or(AmountError::Overflow))
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}
