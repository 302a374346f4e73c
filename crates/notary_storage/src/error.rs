//! Error types for engine operations.

use std::io;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The redb engine reported an error.
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    /// A write was rejected by the engine.
    #[error("write rejected: {0}")]
    WriteRejected(String),

    /// The engine is closed.
    #[error("engine is closed")]
    Closed,
}

macro_rules! impl_from_redb {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for EngineError {
                fn from(err: $ty) -> Self {
                    Self::Redb(err.into())
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
