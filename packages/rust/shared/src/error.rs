//! Error types for EndorseTrack.
//!
//! Library crates use [`EndorseTrackError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! `Parse` and `Date` errors are per-statement: the pipeline downgrades them
//! (the affected fields stay absent) and still emits the record.

use std::path::PathBuf;

/// Top-level error type for all EndorseTrack operations.
#[derive(Debug, thiserror::Error)]
pub enum EndorseTrackError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A reference tag or citation template has unparseable internal structure.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A raw date string failed the grammar chosen for it.
    #[error("date error: {0}")]
    Date(String),

    /// Database or storage layer error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (empty document, bad identifier, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EndorseTrackError>;

impl EndorseTrackError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a date error from any displayable message.
    pub fn date(msg: impl Into<String>) -> Self {
        Self::Date(msg.into())
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = EndorseTrackError::config("missing db path");
        assert_eq!(err.to_string(), "config error: missing db path");

        let err = EndorseTrackError::date("\"32 Foo 2016\" does not match %d %b %Y");
        assert!(err.to_string().contains("32 Foo 2016"));
    }
}
