//! Branch command implementation.

use notary_core::{EbInfo, EntryInfo, EntryInfoBranch, FbBatch, Hash};
use serde::Serialize;
use std::path::Path;

/// Printable view of a provenance branch.
#[derive(Debug, Serialize)]
pub struct BranchView {
    /// Entry hash.
    pub entry_hash: String,
    /// Entry-block location.
    pub entry_info: Option<EntryInfoView>,
    /// Federated-block location.
    pub eb_info: Option<EbInfoView>,
    /// Anchoring batch.
    pub fb_batch: Option<FbBatchView>,
}

/// Printable entry-block location.
#[derive(Debug, Serialize)]
pub struct EntryInfoView {
    /// Entry-block hash.
    pub eb_hash: String,
    /// Entry-block height.
    pub eb_block_num: u64,
    /// Position within the entry block.
    pub entry_index: u32,
}

/// Printable federated-block location.
#[derive(Debug, Serialize)]
pub struct EbInfoView {
    /// Entry-block Merkle root.
    pub merkle_root: String,
    /// Federated-block hash.
    pub fb_hash: String,
    /// Federated-block height.
    pub fb_block_num: u64,
    /// Chain ID.
    pub chain_id: String,
}

/// Printable anchoring batch.
#[derive(Debug, Serialize)]
pub struct FbBatchView {
    /// Federated blocks in the batch.
    pub fb_hashes: Vec<String>,
    /// Batch Merkle root.
    pub merkle_root: String,
    /// Anchoring transaction hash.
    pub btc_tx_hash: String,
    /// Transaction offset.
    pub btc_tx_offset: u32,
    /// Block height.
    pub btc_block_height: u32,
    /// Block hash.
    pub btc_block_hash: String,
}

impl From<&EntryInfo> for EntryInfoView {
    fn from(info: &EntryInfo) -> Self {
        Self {
            eb_hash: info.eb_hash.to_string(),
            eb_block_num: info.eb_block_num,
            entry_index: info.entry_index,
        }
    }
}

impl From<&EbInfo> for EbInfoView {
    fn from(info: &EbInfo) -> Self {
        Self {
            merkle_root: info.merkle_root.to_string(),
            fb_hash: info.fb_hash.to_string(),
            fb_block_num: info.fb_block_num,
            chain_id: info.chain_id.to_string(),
        }
    }
}

impl From<&FbBatch> for FbBatchView {
    fn from(batch: &FbBatch) -> Self {
        Self {
            fb_hashes: batch.fb_hashes.iter().map(ToString::to_string).collect(),
            merkle_root: batch.merkle_root.to_string(),
            btc_tx_hash: batch.btc_tx_hash.to_string(),
            btc_tx_offset: batch.btc_tx_offset,
            btc_block_height: batch.btc_block_height,
            btc_block_hash: batch.btc_block_hash.to_string(),
        }
    }
}

impl From<&EntryInfoBranch> for BranchView {
    fn from(branch: &EntryInfoBranch) -> Self {
        Self {
            entry_hash: branch.entry_hash.to_string(),
            entry_info: branch.entry_info.as_ref().map(Into::into),
            eb_info: branch.eb_info.as_ref().map(Into::into),
            fb_batch: branch.fb_batch.as_ref().map(Into::into),
        }
    }
}

/// Resolves the branch of an entry.
pub fn load(path: &Path, hash: &str) -> Result<BranchView, Box<dyn std::error::Error>> {
    let hash = Hash::from_hex(hash)?;
    let db = super::attach(path)?;
    let branch = db.fetch_entry_info_branch_by_hash(&hash)?;
    db.close()?;
    Ok(BranchView::from(&branch))
}

/// Runs the branch command.
pub fn run(path: &Path, hash: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let view = load(path, hash)?;
    match format {
        "json" => super::print_json(&view)?,
        _ => print_text_output(&view),
    }
    Ok(())
}

fn print_text_output(view: &BranchView) {
    println!("Entry {}", view.entry_hash);
    let Some(info) = &view.entry_info else {
        println!("  not yet in an entry block");
        return;
    };
    println!(
        "  entry block {} (height {}, index {})",
        info.eb_hash, info.eb_block_num, info.entry_index
    );
    let Some(eb) = &view.eb_info else {
        println!("  entry block not yet in a federated block");
        return;
    };
    println!("  federated block {} (height {})", eb.fb_hash, eb.fb_block_num);
    let Some(batch) = &view.fb_batch else {
        println!("  federated block not yet anchored");
        return;
    };
    println!(
        "  anchored in tx {} at height {}",
        batch.btc_tx_hash, batch.btc_block_height
    );
}
