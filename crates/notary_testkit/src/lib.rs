//! # NotaryDB Testkit
//!
//! Test utilities for NotaryDB.
//!
//! This crate provides:
//! - Test fixtures for in-memory and on-disk stores
//! - Property-based test generators using proptest
//! - Seeding helpers that play the role of the indexing stage
//! - Byte-level test vectors for the keyspace and queue format
//! - An integration harness that checks reads against a model
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notary_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_temp_store(|db| {
//!         let hash = db.insert_entry(&sample_entry(1), &sample_chain(1)).unwrap();
//!         assert!(db.fetch_entry_by_hash(&hash).unwrap().is_some());
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod seed;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::IntegrationHarness;
    pub use crate::seed::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use seed::*;
pub use vectors::*;
