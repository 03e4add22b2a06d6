//! Error types for the document redaction library.
//!
//! Parsing is the only stage that can fail on user input. Detection and
//! redaction operate on text a parser already produced and never return
//! errors; "nothing selected" is reported as an unchanged document, not here.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Error type for all parse, registry and export operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Error occurred while reading an input file
    #[error("IO error for path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input was malformed or unreadable for the chosen parser
    #[error("Failed to parse '{filename}': {reason}")]
    Parse {
        filename: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No registered parser claims the file
    #[error("Unsupported format for '{filename}'")]
    UnsupportedFormat { filename: String },

    /// Regex compilation error
    #[error("Pattern error for '{pattern}': {reason}")]
    PatternError { pattern: String, reason: String },

    /// Invalid configuration or parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// Writing the redacted artifact failed
    #[error("Export to '{}' failed: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RedactorError {
    /// Builds a parse error carrying the underlying cause.
    pub fn parse<E>(filename: impl Into<String>, reason: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parse {
            filename: filename.into(),
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Builds a parse error with no underlying cause.
    pub fn parse_msg(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            filename: filename.into(),
            reason: reason.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_parse_error_display() {
        let err = RedactorError::parse_msg("report.pdf", "no pages");
        assert_eq!(err.to_string(), "Failed to parse 'report.pdf': no pages");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let io_err = io::Error::new(io::ErrorKind::InvalidData, "truncated");
        let err = RedactorError::parse("data.csv", "read failed", io_err);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("data.csv"));
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = RedactorError::UnsupportedFormat {
            filename: "image.bmp".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported format for 'image.bmp'");
    }
}
