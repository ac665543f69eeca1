//! Serializable getter configuration
//!
//! [`GetterOptions`] is the on-disk form of an [`EnvVarGetter`]'s tunables.
//! Every field is optional; unset fields keep the getter defaults.
//!
//! ```yaml
//! true_bool_values: ["yes", "on"]
//! false_bool_values: ["no", "off"]
//! int_pattern: '^\d+$'
//! ```
//!
//! [`EnvVarGetter`]: crate::EnvVarGetter

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default aliases that resolve to `true`
pub const TRUE_BOOL_VALUES: &[&str] = &["1", "y", "yes", "t", "true", "True", "on"];

/// Default aliases that resolve to `false`
pub const FALSE_BOOL_VALUES: &[&str] = &["0", "n", "no", "f", "false", "False", "off"];

/// Default integer literal pattern
pub const INT_PATTERN: &str = r"^[-+]?\d+$";

/// Default float literal pattern
pub const FLOAT_PATTERN: &str = r"^[-+]?(\d+\.\d*|\.\d+)([eE][-+]?\d+)?$";

/// Getter configuration as loaded from a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetterOptions {
    /// Aliases for `true` (replaces the defaults entirely)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_bool_values: Option<Vec<String>>,
    /// Aliases for `false` (replaces the defaults entirely)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_bool_values: Option<Vec<String>>,
    /// Regex text matching integer literals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_pattern: Option<String>,
    /// Regex text matching float literals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_pattern: Option<String>,
}

impl GetterOptions {
    /// Options with every field set to the built-in defaults
    pub fn defaults() -> Self {
        Self {
            true_bool_values: Some(TRUE_BOOL_VALUES.iter().map(|s| s.to_string()).collect()),
            false_bool_values: Some(FALSE_BOOL_VALUES.iter().map(|s| s.to_string()).collect()),
            int_pattern: Some(INT_PATTERN.to_string()),
            float_pattern: Some(FLOAT_PATTERN.to_string()),
        }
    }

    /// Parse options from a YAML (or JSON) document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document means "no overrides"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| Error::parse(e.to_string()))
    }

    /// Load options from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading getter options from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("{}: {}", path.display(), e))
                .with_help("Check that the options file exists and is readable")
        })?;

        Self::from_yaml(&content).map_err(|e| {
            e.with_help(format!("Fix the syntax of {}", path.display()))
        })
    }

    /// Serialize options to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::parse(e.to_string()))
    }
}
