//! CLI command implementations.

pub mod branch;
pub mod get;
pub mod info;
pub mod init;
pub mod put;

use notary_core::{Config, CoreResult, NotaryDb};
use notary_storage::RedbEngine;
use std::path::Path;

/// Attaches to an existing store.
pub(crate) fn attach(path: &Path) -> CoreResult<NotaryDb<RedbEngine>> {
    NotaryDb::open(path, Config::attach())
}

/// Formats bytes as lowercase hex.
pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Prints `value` as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
