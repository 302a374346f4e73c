//! # NotaryDB Core
//!
//! Embedded persistence for a notarization ledger.
//!
//! This crate provides:
//! - A flat, tag-prefixed keyspace over an ordered key/value engine
//! - Atomic insertion of an entry together with its queue marker
//! - Point lookups of entries and their provenance records
//! - Resolution of an entry's provenance branch
//! - Store lifecycle: create/attach, schema version gate, close, sync
//!
//! The engine itself lives in `notary_storage`; any [`notary_storage::KvEngine`]
//! can back a [`NotaryDb`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod config;
mod database;
mod dir;
mod entry;
mod error;
mod handle;
pub mod keys;
mod provenance;
mod types;
mod version;

pub use codec::BinaryCodec;
pub use config::Config;
pub use database::NotaryDb;
pub use dir::{StoreDir, MARKER_SUFFIX};
pub use entry::{Entry, EntryStore, QueueStatus};
pub use error::{CoreError, CoreResult};
pub use handle::StoreHandle;
pub use provenance::{EbInfo, EntryInfo, EntryInfoBranch, FbBatch};
pub use types::{ChainId, Hash, HASH_SIZE};
pub use version::{SchemaVersion, UNREADABLE_VERSION};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
