//! Error types for the Exemplar engine
//!
//! Lookups, merges, injection and transforms are total and report misses
//! as absent values. Only validation and JSON text conversion can fail.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum Error {
    /// Data did not match a validation spec
    #[error("Invalid data: {}", .errors.join(" | "))]
    Validation { errors: Vec<String> },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(errors: Vec<String>) -> Self {
        Error::Validation { errors }
    }

    /// Collected validation messages, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            Error::Validation { errors } => Some(errors),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = Error::validation(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(err.to_string(), "Invalid data: first | second");
        assert_eq!(err.validation_errors().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_json_conversion() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error: "));
        assert!(err.validation_errors().is_none());
        assert!(std::error::Error::source(&err).is_some());
    }
}
