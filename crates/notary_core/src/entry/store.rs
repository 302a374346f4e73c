//! Entry store operations.

use crate::codec::{read_record, BinaryCodec};
use crate::entry::{Entry, QueueStatus};
use crate::error::CoreResult;
use crate::handle::StoreHandle;
use crate::keys;
use crate::provenance::{self, EbInfo, EntryInfo, EntryInfoBranch, FbBatch};
use crate::types::{ChainId, Hash};
use notary_storage::KvEngine;

/// Entry-level operations over a [`StoreHandle`].
///
/// Every method takes the handle's lock for its whole duration. Writes
/// go through the handle's shared batch and commit before the lock is
/// released.
#[derive(Debug)]
pub struct EntryStore<'a, E> {
    handle: &'a StoreHandle<E>,
}

impl<'a, E: KvEngine> EntryStore<'a, E> {
    /// Creates an entry store over `handle`.
    pub fn new(handle: &'a StoreHandle<E>) -> Self {
        Self { handle }
    }

    /// Stores an encoded entry together with its queue marker.
    ///
    /// Both records commit in one batch: after success both are visible,
    /// after failure neither is. Writing the same entry again overwrites
    /// both records.
    pub fn insert_entry_and_queue(
        &self,
        entry_hash: &Hash,
        serialized_entry: &[u8],
        timestamp: u64,
        chain_id: &ChainId,
    ) -> CoreResult<()> {
        self.handle.commit(|batch| {
            batch.stage_put(keys::entry_key(entry_hash), serialized_entry);
            batch.stage_put(
                keys::entry_queue_key(chain_id, timestamp, entry_hash),
                vec![QueueStatus::InQueue.as_byte()],
            );
        })?;
        tracing::trace!(%entry_hash, %chain_id, timestamp, "entry queued");
        Ok(())
    }

    /// Encodes `entry`, stores it with its queue marker, and returns its hash.
    ///
    /// The queue marker uses the entry's own timestamp.
    pub fn insert_entry(&self, entry: &Entry, chain_id: &ChainId) -> CoreResult<Hash> {
        let bytes = entry.marshal_binary()?;
        let entry_hash = Hash::sha256(&bytes);
        self.insert_entry_and_queue(&entry_hash, &bytes, entry.timestamp, chain_id)?;
        Ok(entry_hash)
    }

    /// Gets an entry by hash.
    ///
    /// Returns `Ok(None)` if no entry is stored under `entry_hash`.
    pub fn fetch_entry_by_hash(&self, entry_hash: &Hash) -> CoreResult<Option<Entry>> {
        self.handle
            .read(|engine| read_record(engine, &keys::entry_key(entry_hash)))
    }

    /// Gets the entry-block location of an entry.
    pub fn fetch_entry_info_by_hash(&self, entry_hash: &Hash) -> CoreResult<Option<EntryInfo>> {
        self.handle
            .read(|engine| provenance::lookup_entry_info(engine, entry_hash))
    }

    /// Gets the federated-block location of an entry block.
    pub fn fetch_eb_info_by_hash(&self, eb_hash: &Hash) -> CoreResult<Option<EbInfo>> {
        self.handle
            .read(|engine| read_record(engine, &keys::eb_info_key(eb_hash)))
    }

    /// Gets the anchoring batch of a federated block.
    pub fn fetch_fb_batch_by_hash(&self, fb_hash: &Hash) -> CoreResult<Option<FbBatch>> {
        self.handle
            .read(|engine| read_record(engine, &keys::fb_batch_key(fb_hash)))
    }

    /// Resolves the full provenance branch of an entry.
    ///
    /// Links are followed in order under a single lock acquisition; the
    /// first missing link leaves it and every later field unset. Missing
    /// links are not errors.
    pub fn fetch_entry_info_branch_by_hash(&self, entry_hash: &Hash) -> CoreResult<EntryInfoBranch> {
        self.handle
            .read(|engine| provenance::resolve_branch(engine, entry_hash))
    }

    /// Gets the status byte of a queue marker.
    pub fn fetch_queue_status(
        &self,
        chain_id: &ChainId,
        timestamp: u64,
        entry_hash: &Hash,
    ) -> CoreResult<Option<QueueStatus>> {
        self.handle.read(|engine| {
            engine
                .get(&keys::entry_queue_key(chain_id, timestamp, entry_hash))?
                .map(|value| QueueStatus::decode(&value))
                .transpose()
        })
    }
}
