//! Provenance records and the entry-info branch resolver.
//!
//! An entry is anchored through three links, each written by an
//! indexing stage outside this crate:
//!
//! ```text
//! entry hash --EntryInfo--> entry block --EbInfo--> federated block --FbBatch
//! ```
//!
//! [`resolve_branch`] follows the links in order and stops at the first
//! one that is missing.

use crate::codec::{read_record, wire_len, BinaryCodec, Reader};
use crate::error::CoreResult;
use crate::keys;
use crate::types::{ChainId, Hash, HASH_SIZE};
use notary_storage::KvEngine;

/// Locates an entry inside the entry block that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Hash of the entry.
    pub entry_hash: Hash,
    /// Hash of the containing entry block.
    pub eb_hash: Hash,
    /// Height of the containing entry block.
    pub eb_block_num: u64,
    /// Position of the entry within the entry block.
    pub entry_index: u32,
}

impl BinaryCodec for EntryInfo {
    const KIND: &'static str = "EntryInfo";

    fn marshal_binary(&self) -> CoreResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(HASH_SIZE * 2 + 12);
        buf.extend_from_slice(self.entry_hash.as_bytes());
        buf.extend_from_slice(self.eb_hash.as_bytes());
        buf.extend_from_slice(&self.eb_block_num.to_be_bytes());
        buf.extend_from_slice(&self.entry_index.to_be_bytes());
        Ok(buf)
    }

    fn unmarshal_binary(data: &[u8]) -> CoreResult<Self> {
        let mut reader = Reader::new(Self::KIND, data);
        let info = Self {
            entry_hash: reader.hash()?,
            eb_hash: reader.hash()?,
            eb_block_num: reader.u64()?,
            entry_index: reader.u32()?,
        };
        reader.finish()?;
        Ok(info)
    }
}

/// Locates an entry block inside the federated block that anchors it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EbInfo {
    /// Hash of the entry block.
    pub eb_hash: Hash,
    /// Merkle root over the entry block's entries.
    pub merkle_root: Hash,
    /// Hash of the anchoring federated block.
    pub fb_hash: Hash,
    /// Height of the anchoring federated block.
    pub fb_block_num: u64,
    /// Chain the entry block belongs to.
    pub chain_id: ChainId,
}

impl BinaryCodec for EbInfo {
    const KIND: &'static str = "EbInfo";

    fn marshal_binary(&self) -> CoreResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(HASH_SIZE * 4 + 8);
        buf.extend_from_slice(self.eb_hash.as_bytes());
        buf.extend_from_slice(self.merkle_root.as_bytes());
        buf.extend_from_slice(self.fb_hash.as_bytes());
        buf.extend_from_slice(&self.fb_block_num.to_be_bytes());
        buf.extend_from_slice(self.chain_id.as_bytes());
        Ok(buf)
    }

    fn unmarshal_binary(data: &[u8]) -> CoreResult<Self> {
        let mut reader = Reader::new(Self::KIND, data);
        let info = Self {
            eb_hash: reader.hash()?,
            merkle_root: reader.hash()?,
            fb_hash: reader.hash()?,
            fb_block_num: reader.u64()?,
            chain_id: reader.chain_id()?,
        };
        reader.finish()?;
        Ok(info)
    }
}

/// Batch of federated blocks anchored together in one external transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FbBatch {
    /// Hashes of the federated blocks in the batch.
    pub fb_hashes: Vec<Hash>,
    /// Merkle root over `fb_hashes`.
    pub merkle_root: Hash,
    /// Hash of the anchoring transaction.
    pub btc_tx_hash: Hash,
    /// Offset of the transaction within its block.
    pub btc_tx_offset: u32,
    /// Height of the block holding the transaction.
    pub btc_block_height: u32,
    /// Hash of the block holding the transaction.
    pub btc_block_hash: Hash,
}

impl BinaryCodec for FbBatch {
    const KIND: &'static str = "FbBatch";

    fn marshal_binary(&self) -> CoreResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(HASH_SIZE * (self.fb_hashes.len() + 3) + 12);
        let count = wire_len(Self::KIND, self.fb_hashes.len())?;
        buf.extend_from_slice(&count.to_be_bytes());
        for hash in &self.fb_hashes {
            buf.extend_from_slice(hash.as_bytes());
        }
        buf.extend_from_slice(self.merkle_root.as_bytes());
        buf.extend_from_slice(self.btc_tx_hash.as_bytes());
        buf.extend_from_slice(&self.btc_tx_offset.to_be_bytes());
        buf.extend_from_slice(&self.btc_block_height.to_be_bytes());
        buf.extend_from_slice(self.btc_block_hash.as_bytes());
        Ok(buf)
    }

    fn unmarshal_binary(data: &[u8]) -> CoreResult<Self> {
        let mut reader = Reader::new(Self::KIND, data);
        let count = reader.count(HASH_SIZE)?;
        let mut fb_hashes = Vec::with_capacity(count);
        for _ in 0..count {
            fb_hashes.push(reader.hash()?);
        }
        let batch = Self {
            fb_hashes,
            merkle_root: reader.hash()?,
            btc_tx_hash: reader.hash()?,
            btc_tx_offset: reader.u32()?,
            btc_block_height: reader.u32()?,
            btc_block_hash: reader.hash()?,
        };
        reader.finish()?;
        Ok(batch)
    }
}

/// The resolved provenance path of one entry.
///
/// Each field is set only if every link before it resolved. The branch
/// is assembled at read time and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfoBranch {
    /// The entry the branch was resolved for.
    pub entry_hash: Hash,
    /// Entry-block location of the entry.
    pub entry_info: Option<EntryInfo>,
    /// Federated-block location of the entry block.
    pub eb_info: Option<EbInfo>,
    /// Anchoring batch of the federated block.
    pub fb_batch: Option<FbBatch>,
}

impl EntryInfoBranch {
    /// Creates a branch with no resolved links.
    #[must_use]
    pub fn new(entry_hash: Hash) -> Self {
        Self {
            entry_hash,
            entry_info: None,
            eb_info: None,
            fb_batch: None,
        }
    }

    /// Returns true if every link resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fb_batch.is_some()
    }
}

/// First link: the entry's location in an entry block.
pub(crate) fn lookup_entry_info<E>(engine: &E, entry_hash: &Hash) -> CoreResult<Option<EntryInfo>>
where
    E: KvEngine + ?Sized,
{
    read_record(engine, &keys::entry_info_key(entry_hash))
}

/// Second link: the entry block's location in a federated block.
pub(crate) fn lookup_eb_info<E>(engine: &E, info: &EntryInfo) -> CoreResult<Option<EbInfo>>
where
    E: KvEngine + ?Sized,
{
    read_record(engine, &keys::eb_info_key(&info.eb_hash))
}

/// Third link: the federated block's anchoring batch.
pub(crate) fn lookup_fb_batch<E>(engine: &E, eb_info: &EbInfo) -> CoreResult<Option<FbBatch>>
where
    E: KvEngine + ?Sized,
{
    read_record(engine, &keys::fb_batch_key(&eb_info.fb_hash))
}

/// Resolves the branch for `entry_hash`, stopping at the first missing link.
///
/// Missing links are not errors. Engine and decode errors are.
pub(crate) fn resolve_branch<E>(engine: &E, entry_hash: &Hash) -> CoreResult<EntryInfoBranch>
where
    E: KvEngine + ?Sized,
{
    let mut branch = EntryInfoBranch::new(*entry_hash);

    branch.entry_info = lookup_entry_info(engine, entry_hash)?;
    let Some(entry_info) = branch.entry_info.as_ref() else {
        return Ok(branch);
    };

    branch.eb_info = lookup_eb_info(engine, entry_info)?;
    let Some(eb_info) = branch.eb_info.as_ref() else {
        return Ok(branch);
    };

    branch.fb_batch = lookup_fb_batch(engine, eb_info)?;
    Ok(branch)
}
