//! Info command implementation.

use notary_core::StoreDir;
use notary_storage::DATA_FILE;
use serde::Serialize;
use std::path::Path;

/// Store inspection result.
#[derive(Debug, Serialize)]
pub struct InfoResult {
    /// Store path.
    pub path: String,
    /// Raw marker value, if a marker exists.
    pub marker: Option<i32>,
    /// Schema version the store opens with.
    pub schema_version: i32,
    /// Engine data file size in bytes.
    pub data_size: u64,
    /// Engine block cache size, if set.
    pub block_cache_bytes: Option<usize>,
    /// Engine open-file limit, if set.
    pub max_open_files: Option<u32>,
    /// Whether engine compression is enabled.
    pub compression: bool,
}

/// Collects store information.
///
/// The store is opened and closed again so an unsupported version is
/// reported as an error.
pub fn inspect(path: &Path) -> Result<InfoResult, Box<dyn std::error::Error>> {
    let marker = StoreDir::new(path).load_version()?;
    let db = super::attach(path)?;
    let version = db.schema_version();
    db.close()?;

    let options = version.engine_options();
    let data_size = std::fs::metadata(path.join(DATA_FILE))
        .map(|meta| meta.len())
        .unwrap_or(0);

    Ok(InfoResult {
        path: path.display().to_string(),
        marker,
        schema_version: version.as_i32(),
        data_size,
        block_cache_bytes: options.block_cache_bytes,
        max_open_files: options.max_open_files,
        compression: options.compression,
    })
}

/// Runs the info command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(path)?;
    match format {
        "json" => super::print_json(&result)?,
        _ => print_text_output(&result),
    }
    Ok(())
}

fn print_text_output(result: &InfoResult) {
    println!("NotaryDB Store");
    println!("==============");
    println!();
    println!("Path: {}", result.path);
    println!();
    println!("Schema:");
    match result.marker {
        Some(raw) => println!("  Marker:  {raw}"),
        None => println!("  Marker:  (none)"),
    }
    println!("  Version: v{}", result.schema_version);
    println!();
    println!("Engine:");
    println!("  Data size:    {} bytes", result.data_size);
    match result.block_cache_bytes {
        Some(bytes) => println!("  Block cache:  {bytes} bytes"),
        None => println!("  Block cache:  default"),
    }
    match result.max_open_files {
        Some(files) => println!("  Open files:   {files}"),
        None => println!("  Open files:   default"),
    }
    println!("  Compression:  {}", result.compression);
}
