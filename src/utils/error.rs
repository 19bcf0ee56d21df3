//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! None of these ever reach the host runtime: the engine logs them and
//! degrades to "skip and continue".

use crate::runtime::MethodId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the runtime metadata accessor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Metadata unavailable for method {0}")]
    Unavailable(MethodId),
}

/// Errors that can occur while opening, writing or reading a symbol map
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Symbol map unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write symbol map: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read symbol map {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed symbol map line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}

/// Errors that can occur while loading a recorded event log
#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("Failed to read event log: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported event log version: {0}")]
    UnsupportedVersion(String),

    #[error("Duplicate method id in method table: {0}")]
    DuplicateMethod(MethodId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_error_display() {
        let err = MetadataError::Unavailable(MethodId(0x2a));
        assert_eq!(err.to_string(), "Metadata unavailable for method 0x2a");
    }

    #[test]
    fn test_output_error_display() {
        let err = OutputError::MalformedLine {
            line: 3,
            reason: "missing length".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed symbol map line 3: missing length");

        let err = OutputError::ReadFailed {
            path: PathBuf::from("/tmp/perf-1.map"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "Failed to read symbol map /tmp/perf-1.map: gone");
    }
}
