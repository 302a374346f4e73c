//! # NotaryDB Storage
//!
//! Ordered key/value engine abstraction for NotaryDB.
//!
//! This crate provides the lowest-level storage layer. Engines are
//! **opaque sorted byte stores**: they map byte keys to byte values and
//! know nothing about tables, entries, or blocks. NotaryDB owns the
//! keyspace layout on top of them.
//!
//! ## Design Principles
//!
//! - Engines expose point reads, point writes, and atomic write batches
//! - A [`WriteBatch`] commits as one unit or not at all
//! - No knowledge of NotaryDB record formats
//! - Engines must be `Send` so a store handle can be shared behind a lock
//!
//! ## Available Engines
//!
//! - [`InMemoryEngine`] - For testing and ephemeral stores
//! - [`RedbEngine`] - Persistent engine backed by `redb`
//! - [`CountingEngine`] - Wrapper that records calls for tests
//!
//! ## Example
//!
//! ```rust
//! use notary_storage::{InMemoryEngine, KvEngine, WriteBatch, WriteOptions};
//!
//! let mut engine = InMemoryEngine::new();
//! let mut batch = WriteBatch::new();
//! batch.stage_put(b"a".to_vec(), b"1".to_vec());
//! batch.stage_put(b"b".to_vec(), b"2".to_vec());
//! batch.commit(&mut engine, &WriteOptions::default()).unwrap();
//!
//! assert_eq!(engine.get(b"a").unwrap(), Some(b"1".to_vec()));
//! assert!(batch.is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod batch;
mod counting;
mod error;
mod memory;
mod options;
mod redb_engine;

pub use backend::KvEngine;
pub use batch::{BatchOp, WriteBatch};
pub use counting::{CallCounts, CountingEngine};
pub use error::{EngineError, EngineResult};
pub use memory::InMemoryEngine;
pub use options::{EngineOptions, WriteOptions};
pub use redb_engine::{RedbEngine, DATA_FILE};
