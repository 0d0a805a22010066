//! CLI error types.

use std::{io, path::PathBuf};

use proxtrace_core::TracingError;
use proxtrace_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur while running a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Key state machine rejected an operation.
    #[error("key state error: {0}")]
    Tracing(#[from] TracingError),

    /// Key material could not be derived or decoded.
    #[error("key error: {0}")]
    Crypto(#[from] CryptoError),

    /// A key file line could not be parsed.
    ///
    /// Line numbers start at 1.
    #[error("{}:{line}: {reason}", path.display())]
    KeyFile {
        /// File being read
        path: PathBuf,
        /// Offending line
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_file_error_display() {
        let err = CliError::KeyFile {
            path: PathBuf::from("disclosed.txt"),
            line: 3,
            reason: "missing index".to_string(),
        };
        assert_eq!(err.to_string(), "disclosed.txt:3: missing index");
    }
}
