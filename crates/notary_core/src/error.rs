//! Error types for NotaryDB core.

use notary_storage::EngineError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in NotaryDB core operations.
///
/// A record that is simply absent is never an error; lookups return
/// `Ok(None)` for that case.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The key/value engine reported an error.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// I/O error outside the engine (store directory, version marker).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store directory does not exist and creation was not requested.
    #[error("store not found: {}", path.display())]
    NotFound {
        /// The missing store directory.
        path: PathBuf,
    },

    /// The store directory exists but the caller asked for a fresh store.
    #[error("store already exists: {}", path.display())]
    AlreadyExists {
        /// The existing store directory.
        path: PathBuf,
    },

    /// The on-disk version marker names a schema this build does not implement.
    #[error("unsupported schema version: {version}")]
    UnsupportedVersion {
        /// Raw version read from the marker.
        version: i32,
    },

    /// Stored bytes could not be decoded into the expected record type.
    #[error("failed to decode {kind}: {message}")]
    Deserialization {
        /// Name of the record type being decoded.
        kind: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// A record field is too long for its `u32` length prefix.
    #[error("{kind} field of {len} bytes exceeds the u32 length prefix")]
    RecordTooLarge {
        /// Name of the record type being encoded.
        kind: &'static str,
        /// Length or count that did not fit.
        len: usize,
    },

    /// A hex string could not be parsed.
    #[error("invalid hex: {message}")]
    InvalidHex {
        /// Description of the problem.
        message: String,
    },

    /// The store has been closed.
    #[error("store is closed")]
    DatabaseClosed,
}

impl CoreError {
    /// Creates a deserialization error.
    pub fn deserialization(kind: &'static str, message: impl Into<String>) -> Self {
        Self::Deserialization {
            kind,
            message: message.into(),
        }
    }

    /// Creates an invalid hex error.
    pub fn invalid_hex(message: impl Into<String>) -> Self {
        Self::InvalidHex {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by how the store location was specified.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::AlreadyExists { .. })
    }
}
