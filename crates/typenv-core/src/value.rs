//! Typed values produced by environment lookups
//!
//! A raw environment string becomes one of a small set of scalars:
//! boolean, integer (of any width), float, exact decimal or the unchanged
//! string.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::bigint::BigInteger;
use crate::decimal::Decimal;
use crate::error::Error;

/// A typed environment value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Integer value outside the `i64` range
    BigInteger(BigInteger),
    /// Floating point value
    Float(f64),
    /// Exact decimal value (only produced on request)
    Decimal(Decimal),
    /// String value
    String(String),
}

impl Value {
    /// Check if this value is a boolean
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Check if this value is an integer of any width
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::BigInteger(_))
    }

    /// Check if this value is a float
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Check if this value is a decimal
    pub fn is_decimal(&self) -> bool {
        matches!(self, Value::Decimal(_))
    }

    /// Check if this value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Get as boolean if this is a Bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as i128 if this is an integer that fits
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Integer(i) => Some(*i as i128),
            Value::BigInteger(b) => b.to_i128(),
            _ => None,
        }
    }

    /// Get the wide integer if this is a BigInteger
    pub fn as_big_integer(&self) -> Option<&BigInteger> {
        match self {
            Value::BigInteger(b) => Some(b),
            _ => None,
        }
    }

    /// Get as f64 if this is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            Value::BigInteger(b) => Some(b.to_f64()),
            Value::Decimal(d) => Some(d.to_f64()),
            _ => None,
        }
    }

    /// Get as decimal if this is a Decimal
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Get as str if this is a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Integer(_) | Value::BigInteger(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::BigInteger(b) => write!(f, "{}", b),
            Value::Float(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<BigInteger> for Value {
    fn from(b: BigInteger) -> Self {
        match b.to_i64() {
            Some(i) => Value::Integer(i),
            None => Value::BigInteger(b),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// Explicit conversion target for a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Boolean via the configured alias sets
    Bool,
    /// Signed integer, widened past `i64` when needed
    Integer,
    /// 64-bit float
    Float,
    /// Exact decimal
    Decimal,
    /// Raw string, never fails
    String,
}

impl TargetType {
    /// Short name used in messages and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Bool => "bool",
            TargetType::Integer => "int",
            TargetType::Float => "float",
            TargetType::Decimal => "decimal",
            TargetType::String => "str",
        }
    }

    /// Construct a value of this type from raw text, or describe why not.
    ///
    /// `Bool` accepts only Rust's `true`/`false` literals here; lookups
    /// resolve boolean targets through the getter's alias sets instead.
    pub(crate) fn construct(&self, raw: &str) -> Result<Value, String> {
        match self {
            TargetType::Bool => raw.parse::<bool>().map(Value::Bool).map_err(|e| e.to_string()),
            TargetType::Integer => parse_integer(raw),
            TargetType::Float => raw.parse::<f64>().map(Value::Float).map_err(|e| e.to_string()),
            TargetType::Decimal => raw
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|e| e.to_string()),
            TargetType::String => Ok(Value::String(raw.to_string())),
        }
    }
}

/// Parse an integer literal: `i64` when it fits, [`BigInteger`] otherwise
pub(crate) fn parse_integer(raw: &str) -> Result<Value, String> {
    match raw.parse::<i64>() {
        Ok(i) => Ok(Value::Integer(i)),
        Err(_) => raw
            .parse::<BigInteger>()
            .map(Value::BigInteger)
            .map_err(|e| e.to_string()),
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Ok(TargetType::Bool),
            "int" | "integer" => Ok(TargetType::Integer),
            "float" => Ok(TargetType::Float),
            "decimal" => Ok(TargetType::Decimal),
            "str" | "string" => Ok(TargetType::String),
            other => Err(Error::parse(format!("Unknown target type: {}", other))
                .with_help("Use one of: bool, int, float, decimal, str")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_checks() {
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Integer(42).is_integer());
        assert!(Value::Float(2.5).is_float());
        assert!(Value::Decimal(Decimal::new(11, 1)).is_decimal());
        assert!(Value::String("hello".into()).is_string());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(42).as_i64(), Some(42));
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::Integer(42).as_f64(), Some(42.0));
        assert_eq!(Value::Decimal(Decimal::new(25, 1)).as_f64(), Some(2.5));
        assert_eq!(Value::String("hello".into()).as_str(), Some("hello"));
        assert_eq!(Value::String("1".into()).as_i64(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(Value::Float(1.23).to_string(), "1.23");
        assert_eq!(Value::Decimal(Decimal::new(110, 2)).to_string(), "1.10");
        assert_eq!(Value::from("raw").to_string(), "raw");
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Bool(true),
            Value::Integer(3),
            Value::Decimal(Decimal::new(11, 1)),
            Value::from("x"),
        ])
        .unwrap();
        assert_eq!(json, r#"[true,3,"1.1","x"]"#);
    }

    #[test]
    fn test_target_type_from_str() {
        assert_eq!("bool".parse::<TargetType>().unwrap(), TargetType::Bool);
        assert_eq!("Boolean".parse::<TargetType>().unwrap(), TargetType::Bool);
        assert_eq!("INT".parse::<TargetType>().unwrap(), TargetType::Integer);
        assert_eq!("decimal".parse::<TargetType>().unwrap(), TargetType::Decimal);
        assert_eq!("string".parse::<TargetType>().unwrap(), TargetType::String);
        assert!("complex".parse::<TargetType>().is_err());
    }

    #[test]
    fn test_target_type_construct() {
        assert_eq!(TargetType::Integer.construct("42"), Ok(Value::Integer(42)));
        assert_eq!(TargetType::Float.construct("4.2"), Ok(Value::Float(4.2)));
        assert_eq!(
            TargetType::Decimal.construct("1.1"),
            Ok(Value::Decimal(Decimal::new(11, 1)))
        );
        assert_eq!(
            TargetType::String.construct(" padded "),
            Ok(Value::from(" padded "))
        );
        assert_eq!(TargetType::Bool.construct("true"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_target_type_construct_reports_cause() {
        assert_eq!(
            TargetType::Integer.construct("4.2"),
            Err("invalid digit in integer literal".to_string())
        );
        assert_eq!(
            TargetType::Float.construct("abc"),
            Err("invalid float literal".to_string())
        );
        assert_eq!(
            TargetType::Decimal.construct(""),
            Err("empty decimal literal".to_string())
        );
        assert!(TargetType::Bool.construct("yes").is_err());
    }

    #[test]
    fn test_parse_integer_widens_past_i64() {
        assert_eq!(
            parse_integer("9223372036854775807"),
            Ok(Value::Integer(i64::MAX))
        );

        let wide = parse_integer("9223372036854775808").unwrap();
        assert!(wide.is_integer());
        assert_eq!(wide.as_i64(), None);
        assert_eq!(wide.as_i128(), Some(i64::MAX as i128 + 1));
        assert_eq!(wide.to_string(), "9223372036854775808");
        assert_eq!(wide.type_name(), "integer");
    }

    #[test]
    fn test_big_integer_into_value_narrows() {
        assert_eq!(
            Value::from(BigInteger::from(7i64)),
            Value::Integer(7)
        );
        assert!(matches!(
            Value::from(BigInteger::from(i128::MAX)),
            Value::BigInteger(_)
        ));
    }
}
