//! typenv-core: typed environment variable lookup
//!
//! Environment variables are strings. This crate turns them into booleans,
//! numbers or exact decimals, either on request or by guessing from
//! configurable boolean aliases and number patterns.
//!
//! # Example
//!
//! ```rust
//! use typenv_core::{EnvVarGetter, Lookup, MapEnv, TargetType, Value};
//!
//! let env = MapEnv::new()
//!     .with("DEBUG", "yes")
//!     .with("WORKERS", "4")
//!     .with("PRICE", "19.99");
//! let getter = EnvVarGetter::with_env(env);
//!
//! assert_eq!(getter.get("DEBUG").unwrap(), Some(Value::Bool(true)));
//! assert_eq!(getter.get("WORKERS").unwrap(), Some(Value::Integer(4)));
//!
//! let price = getter
//!     .resolve("PRICE", &Lookup::new().with_target(TargetType::Decimal))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(price.to_string(), "19.99");
//! ```

pub mod bigint;
pub mod decimal;
pub mod environment;
pub mod error;
pub mod options;
pub mod value;

mod getter;

pub use bigint::BigInteger;
pub use decimal::Decimal;
pub use environment::{Environment, MapEnv, ProcessEnv};
pub use error::{Error, ErrorKind, Result};
pub use getter::{split_list, EnvVarGetter, Lookup, NumberPattern};
pub use options::GetterOptions;
pub use value::{TargetType, Value};

/// Resolve `name` from the process environment with a default-configured
/// getter.
///
/// Each call builds a fresh getter; keep an [`EnvVarGetter`] around to tune
/// aliases or patterns once.
pub fn getenv_typed(name: &str, lookup: &Lookup) -> Result<Option<Value>> {
    EnvVarGetter::new().resolve(name, lookup)
}
