//! Error types and handling for the CLI
//!
//! Every failure maps onto a distinct process exit code.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from exemplar-core, including failed validation
    #[error("{0}")]
    Core(#[from] exemplar_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {} ({})", path.display(), expected, reason)]
    InvalidFormat {
        path: PathBuf,
        expected: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Failure carrying ad-hoc context
    #[error("{0:#}")]
    Context(#[from] anyhow::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) | Self::Context(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::InvalidFormat { .. } => 4,
            Self::Config(_) => 5,
            Self::Json(_) => 6,
            Self::Yaml(_) => 7,
            Self::Other { .. } => 99,
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    // Validation failures read better one per line
    let text = match error {
        Error::Core(core) => match core.validation_errors() {
            Some(errors) => format!("Invalid data:\n  {}", errors.join("\n  ")),
            None => core.to_string(),
        },
        other => other.to_string(),
    };

    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), text)
    } else {
        format!("Error: {}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            Error::Io(io::Error::new(io::ErrorKind::Other, "boom")),
            Error::Core(exemplar_core::Error::validation(vec!["bad".to_string()])),
            Error::FileNotFound {
                path: PathBuf::from("x.json"),
            },
            Error::InvalidFormat {
                path: PathBuf::from("x.json"),
                expected: "JSON".to_string(),
                reason: "eof".to_string(),
            },
            Error::config("nope"),
            Error::other("other"),
        ];
        let codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 99]);
    }

    #[test]
    fn test_format_validation_error() {
        let err = Error::Core(exemplar_core::Error::validation(vec![
            "Expected string at a, found number: 1".to_string(),
            "Unexpected keys at <root>: z".to_string(),
        ]));
        assert_eq!(
            format_error(&err, false),
            "Error: Invalid data:\n  Expected string at a, found number: 1\n  Unexpected keys at <root>: z"
        );
    }

    #[test]
    fn test_format_plain_error() {
        let err = Error::FileNotFound {
            path: PathBuf::from("missing.json"),
        };
        assert_eq!(format_error(&err, false), "Error: File not found: missing.json");
    }

    #[test]
    fn test_context_error() {
        let err: Error = anyhow::anyhow!("inner").context("reading data.json").into();
        assert_eq!(err.to_string(), "reading data.json: inner");
        assert_eq!(err.exit_code(), 1);
    }
}
