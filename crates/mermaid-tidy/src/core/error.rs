//! Core error types for diagram tidying
//!
//! Parsing itself never fails: unknown lines are preserved and malformed init
//! blocks fall back to defaults. The errors here cover the parts around it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while tidying diagrams and the documents that hold them
#[derive(Error, Debug)]
pub enum TidyError {
    #[error("Init block error: {message}")]
    InitBlock { message: String },

    #[error("Round-trip check failed: {message}")]
    RoundTrip { message: String },

    #[error("Failed to format diagram at position {offset}: {reason}")]
    DiagramFailed { offset: usize, reason: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("Failed to read file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TidyError {
    /// Create a new init block error
    pub fn init_block(message: impl Into<String>) -> Self {
        Self::InitBlock {
            message: message.into(),
        }
    }

    /// Create a new round-trip error
    pub fn round_trip(message: impl Into<String>) -> Self {
        Self::RoundTrip {
            message: message.into(),
        }
    }

    /// Create a new per-diagram failure located at `offset` bytes into its document
    pub fn diagram_failed(offset: usize, reason: impl std::fmt::Display) -> Self {
        Self::DiagramFailed {
            offset,
            reason: reason.to_string(),
        }
    }

    /// Create a new config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_block_error() {
        let error = TidyError::init_block("unexpected token");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Init block error"));
        assert!(error_msg.contains("unexpected token"));
    }

    #[test]
    fn test_round_trip_error() {
        let error = TidyError::round_trip("node A lost its label");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Round-trip check failed"));
        assert!(error_msg.contains("node A"));
    }

    #[test]
    fn test_diagram_failed_wraps_reason() {
        let inner = TidyError::round_trip("connection 2 changed");
        let error = TidyError::diagram_failed(120, &inner);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("position 120"));
        assert!(error_msg.contains("connection 2 changed"));
    }

    #[test]
    fn test_read_error_mentions_path() {
        let error = TidyError::Read {
            path: PathBuf::from("docs/guide.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("docs/guide.md"));
        assert!(error_msg.contains("missing"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: TidyError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
