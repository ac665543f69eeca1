//! Integers wider than `i64`
//!
//! Integer literals are not bounded in the environment. Anything that does
//! not fit an `i64` is kept exactly as a [`BigInteger`]: a sign and its
//! canonical digit string.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// An exact integer of any magnitude
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigInteger {
    negative: bool,
    /// Base-10 digits without leading zeros ("0" for zero)
    digits: String,
}

/// Reasons a string is not an integer literal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBigIntegerError {
    #[error("empty integer literal")]
    Empty,
    #[error("invalid digit in integer literal")]
    InvalidDigit,
}

impl BigInteger {
    /// Whether the value is below zero
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Absolute value as canonical base-10 digits
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The value as an `i64`, if it fits
    pub fn to_i64(&self) -> Option<i64> {
        self.to_string().parse().ok()
    }

    /// The value as an `i128`, if it fits
    pub fn to_i128(&self) -> Option<i128> {
        self.to_string().parse().ok()
    }

    /// Nearest f64 (lossy, infinite past `f64::MAX`)
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl FromStr for BigInteger {
    type Err = ParseBigIntegerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        if unsigned.is_empty() {
            return Err(ParseBigIntegerError::Empty);
        }
        if !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseBigIntegerError::InvalidDigit);
        }

        let trimmed = unsigned.trim_start_matches('0');
        if trimmed.is_empty() {
            return Ok(Self::from(0i64));
        }

        Ok(Self {
            negative,
            digits: trimmed.to_string(),
        })
    }
}

impl From<i64> for BigInteger {
    fn from(i: i64) -> Self {
        Self {
            negative: i < 0,
            digits: i.unsigned_abs().to_string(),
        }
    }
}

impl From<i128> for BigInteger {
    fn from(i: i128) -> Self {
        Self {
            negative: i < 0,
            digits: i.unsigned_abs().to_string(),
        }
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.digits)
    }
}

// Numbers while they fit 128 bits, exact text beyond that
impl Serialize for BigInteger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_i128() {
            Some(i) => serializer.serialize_i128(i),
            None => serializer.collect_str(self),
        }
    }
}
