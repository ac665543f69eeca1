//! Error types for typenv
//!
//! Errors are structured: a kind, the variable they concern (if any),
//! the underlying cause and an actionable help message.

use std::fmt;

/// Result type alias for typenv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for typenv operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Environment variable the error concerns (e.g., "DATABASE_PORT")
    pub var_name: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// Variable is unset, has no default and was required
    #[error("Environment variable not set")]
    MissingVariable,
    /// Explicit boolean target, but the raw value is not a known alias
    #[error("Invalid boolean value: '{value}'")]
    InvalidBooleanValue { value: String },
    /// Explicit non-boolean target, but the raw value could not be converted
    #[error("Cannot convert '{value}' to {target}")]
    TypeConversion { value: String, target: String },
    /// Invalid getter configuration (bad pattern, read-only or unknown option)
    #[error("Configuration error")]
    Configuration,
    /// Error parsing an options document
    #[error("Parse error")]
    Parse,
    /// I/O error (options file not found, etc.)
    #[error("I/O error")]
    Io,
}

impl Error {
    /// Create a missing variable error
    pub fn missing_variable(var_name: impl Into<String>) -> Self {
        let var = var_name.into();
        Self {
            kind: ErrorKind::MissingVariable,
            help: Some(format!(
                "Set the {} environment variable or provide a default",
                var
            )),
            var_name: Some(var),
            cause: None,
        }
    }

    /// Create an invalid boolean value error
    pub fn invalid_bool(var_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidBooleanValue {
                value: value.into(),
            },
            var_name: Some(var_name.into()),
            help: Some("Use one of the configured true or false boolean values".into()),
            cause: None,
        }
    }

    /// Create a type conversion error
    pub fn type_conversion(
        var_name: impl Into<String>,
        value: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let target = target.into();
        Self {
            kind: ErrorKind::TypeConversion {
                value: value.into(),
                target: target.clone(),
            },
            var_name: Some(var_name.into()),
            help: Some(format!("Ensure the value can be converted to {}", target)),
            cause: None,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Configuration,
            var_name: None,
            help: None,
            cause: Some(message.into()),
        }
    }

    /// Create an error for an attempt to write a derived, read-only option
    pub fn read_only(option: impl Into<String>, derived_from: &str) -> Self {
        let option = option.into();
        Self {
            kind: ErrorKind::Configuration,
            var_name: None,
            help: Some(format!("Set '{}' instead; '{}' follows it", derived_from, option)),
            cause: Some(format!("'{}' is read-only", option)),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Parse,
            var_name: None,
            help: None,
            cause: Some(message.into()),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io,
            var_name: None,
            help: None,
            cause: Some(message.into()),
        }
    }

    /// Add variable context to the error
    pub fn with_var_name(mut self, var_name: impl Into<String>) -> Self {
        self.var_name = Some(var_name.into());
        self
    }

    /// Add the underlying cause to the error
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Whether this error reports an unset variable
    pub fn is_missing_variable(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingVariable)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(var_name) = &self.var_name {
            write!(f, "\n  Variable: {}", var_name)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
