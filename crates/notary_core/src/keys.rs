//! Keyspace layout.
//!
//! All records share one flat, byte-ordered keyspace. The first byte of
//! every key is a table tag, so tables never collide:
//!
//! ```text
//! ENTRY        tag ++ entry_hash(32)                          -> Entry
//! ENTRY_QUEUE  tag ++ chain_id(32) ++ ts(8 BE) ++ entry_hash(32) -> status(1)
//! ENTRY_INFO   tag ++ entry_hash(32)                          -> EntryInfo
//! EB_INFO      tag ++ eb_hash(32)                             -> EbInfo
//! FB_BATCH     tag ++ fb_hash(32)                             -> FbBatch
//! ```
//!
//! The queue timestamp is big-endian so that byte order within a chain
//! equals chronological order.

use crate::types::{ChainId, Hash, HASH_SIZE};

/// Logical table tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Table {
    /// Entry blobs by entry hash.
    Entry = 0,
    /// Pending-confirmation markers by chain, time, and entry hash.
    EntryQueue = 1,
    /// Entry-block locations by entry hash.
    EntryInfo = 2,
    /// Federated-block locations by entry-block hash.
    EbInfo = 3,
    /// Anchoring batches by federated-block hash.
    FbBatch = 4,
}

impl Table {
    /// Every table, in tag order.
    pub const ALL: [Table; 5] = [
        Table::Entry,
        Table::EntryQueue,
        Table::EntryInfo,
        Table::EbInfo,
        Table::FbBatch,
    ];

    /// Returns the one-byte key prefix of this table.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Looks up a table by tag.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|table| table.tag() == tag)
    }
}

/// Length of a key made of a tag and one hash.
pub const HASH_KEY_LEN: usize = 1 + HASH_SIZE;

/// Length of an entry-queue key.
pub const QUEUE_KEY_LEN: usize = 1 + HASH_SIZE + 8 + HASH_SIZE;

fn hash_key(table: Table, hash: &Hash) -> Vec<u8> {
    let mut key = Vec::with_capacity(HASH_KEY_LEN);
    key.push(table.tag());
    key.extend_from_slice(hash.as_bytes());
    key
}

/// Key of an entry blob.
#[must_use]
pub fn entry_key(entry_hash: &Hash) -> Vec<u8> {
    hash_key(Table::Entry, entry_hash)
}

/// Key of an entry-queue marker.
#[must_use]
pub fn entry_queue_key(chain_id: &ChainId, timestamp: u64, entry_hash: &Hash) -> Vec<u8> {
    let mut key = Vec::with_capacity(QUEUE_KEY_LEN);
    key.push(Table::EntryQueue.tag());
    key.extend_from_slice(chain_id.as_bytes());
    key.extend_from_slice(&timestamp.to_be_bytes());
    key.extend_from_slice(entry_hash.as_bytes());
    key
}

/// Key prefix shared by every queue marker of `chain_id`.
#[must_use]
pub fn entry_queue_prefix(chain_id: &ChainId) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + HASH_SIZE);
    key.push(Table::EntryQueue.tag());
    key.extend_from_slice(chain_id.as_bytes());
    key
}

/// Key of an entry's entry-block location.
#[must_use]
pub fn entry_info_key(entry_hash: &Hash) -> Vec<u8> {
    hash_key(Table::EntryInfo, entry_hash)
}

/// Key of an entry block's federated-block location.
#[must_use]
pub fn eb_info_key(eb_hash: &Hash) -> Vec<u8> {
    hash_key(Table::EbInfo, eb_hash)
}

/// Key of a federated block's anchoring batch.
#[must_use]
pub fn fb_batch_key(fb_hash: &Hash) -> Vec<u8> {
    hash_key(Table::FbBatch, fb_hash)
}
