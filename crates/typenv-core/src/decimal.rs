//! Exact base-10 numbers
//!
//! Environment values such as prices or rates must not go through binary
//! floating point. [`Decimal`] keeps the literal exactly as an integer
//! coefficient and a decimal scale.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Largest exponent accepted in scientific notation (`1e400` is rejected)
const MAX_EXPONENT: i64 = 255;

/// An exact decimal number: `coefficient * 10^-scale`
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    coefficient: i128,
    scale: u32,
}

/// Reasons a string is not a decimal literal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDecimalError {
    #[error("empty decimal literal")]
    Empty,
    #[error("invalid decimal literal")]
    Invalid,
    #[error("decimal literal out of range")]
    Overflow,
}

impl Decimal {
    /// Create a decimal from its coefficient and scale
    pub fn new(coefficient: i128, scale: u32) -> Self {
        Self { coefficient, scale }
    }

    /// The unscaled integer value
    pub fn coefficient(&self) -> i128 {
        self.coefficient
    }

    /// Number of digits after the decimal point
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Nearest f64 (lossy)
    pub fn to_f64(&self) -> f64 {
        // Going through the text form avoids compounding rounding errors
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Same value with trailing fractional zeros removed (`1.100` -> `1.1`)
    pub fn normalized(&self) -> Self {
        let mut coefficient = self.coefficient;
        let mut scale = self.scale;
        while scale > 0 && coefficient % 10 == 0 {
            coefficient /= 10;
            scale -= 1;
        }
        if coefficient == 0 {
            scale = 0;
        }
        Self { coefficient, scale }
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseDecimalError::Empty);
        }

        let (negative, unsigned) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };

        let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
            Some(idx) => {
                let exp: i64 = unsigned[idx + 1..]
                    .parse()
                    .map_err(|_| ParseDecimalError::Invalid)?;
                if exp.abs() > MAX_EXPONENT {
                    return Err(ParseDecimalError::Overflow);
                }
                (&unsigned[..idx], exp)
            }
            None => (unsigned, 0),
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseDecimalError::Invalid);
        }

        let mut coefficient: i128 = 0;
        for c in int_part.chars().chain(frac_part.chars()) {
            let digit = c.to_digit(10).ok_or(ParseDecimalError::Invalid)?;
            coefficient = coefficient
                .checked_mul(10)
                .and_then(|v| v.checked_add(i128::from(digit)))
                .ok_or(ParseDecimalError::Overflow)?;
        }

        let mut scale = frac_part.len() as i64 - exponent;
        while scale < 0 {
            coefficient = coefficient
                .checked_mul(10)
                .ok_or(ParseDecimalError::Overflow)?;
            scale += 1;
        }
        let scale = u32::try_from(scale).map_err(|_| ParseDecimalError::Overflow)?;

        if negative {
            coefficient = -coefficient;
        }

        Ok(Self { coefficient, scale })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.coefficient.unsigned_abs().to_string();
        let sign = if self.coefficient < 0 { "-" } else { "" };
        let scale = self.scale as usize;

        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }

        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        a.coefficient == b.coefficient && a.scale == b.scale
    }
}

impl Eq for Decimal {}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let n = self.normalized();
        n.coefficient.hash(state);
        n.scale.hash(state);
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
