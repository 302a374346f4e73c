//! Byte-level test vectors for NotaryDB.
//!
//! These vectors pin the on-disk format: key layouts, record encodings
//! and the version marker. Any store that reads the same files must
//! produce the same bytes.

use serde::{Deserialize, Serialize};

/// A test vector that can be exported as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// What the input is: a key family or a record kind.
    pub kind: String,
    /// Human-readable description.
    pub description: String,
    /// Input data (hex-encoded).
    pub input_hex: String,
    /// Expected output data (hex-encoded).
    pub expected_hex: String,
    /// Expected error kind (if this should fail).
    pub expected_error: Option<String>,
}

impl TestVector {
    fn ok(id: &str, kind: &str, description: &str, input_hex: String, expected_hex: String) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            description: description.into(),
            input_hex,
            expected_hex,
            expected_error: None,
        }
    }

    fn err(id: &str, kind: &str, description: &str, input_hex: String) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            description: description.into(),
            input_hex,
            expected_hex: String::new(),
            expected_error: Some(kind.into()),
        }
    }
}

fn fill(byte: &str, n: usize) -> String {
    byte.repeat(n)
}

/// Key layout vectors.
///
/// For queue keys the input is `chain_id ++ timestamp_be ++ entry_hash`;
/// for hash-keyed tables it is the hash alone.
pub fn key_vectors() -> Vec<TestVector> {
    vec![
        TestVector::ok(
            "queue_key_basic",
            "entry_queue_key",
            "chain 0x01.., timestamp 1700000000, hash 0xab..",
            format!("{}000000006553f100{}", fill("01", 32), fill("ab", 32)),
            format!("01{}000000006553f100{}", fill("01", 32), fill("ab", 32)),
        ),
        TestVector::ok(
            "queue_key_zero_time",
            "entry_queue_key",
            "timestamp zero sorts first within a chain",
            format!("{}0000000000000000{}", fill("ff", 32), fill("00", 32)),
            format!("01{}0000000000000000{}", fill("ff", 32), fill("00", 32)),
        ),
        TestVector::ok(
            "entry_key_basic",
            "entry_key",
            "entry blob keyed by hash",
            fill("ab", 32),
            format!("00{}", fill("ab", 32)),
        ),
        TestVector::ok(
            "entry_info_key_basic",
            "entry_info_key",
            "entry info keyed by entry hash",
            fill("ab", 32),
            format!("02{}", fill("ab", 32)),
        ),
        TestVector::ok(
            "eb_info_key_basic",
            "eb_info_key",
            "entry-block info keyed by entry-block hash",
            fill("22", 32),
            format!("03{}", fill("22", 32)),
        ),
        TestVector::ok(
            "fb_batch_key_basic",
            "fb_batch_key",
            "batch keyed by federated-block hash",
            fill("44", 32),
            format!("04{}", fill("44", 32)),
        ),
    ]
}

/// Record encoding vectors.
///
/// Valid inputs decode and re-encode to `expected_hex`.
pub fn record_vectors() -> Vec<TestVector> {
    let entry_info = format!(
        "{}{}000000000000000500000003",
        fill("11", 32),
        fill("22", 32)
    );
    vec![
        TestVector::ok(
            "entry_one_ext_id",
            "Entry",
            "timestamp 1, ext id \"a\", data \"hi\"",
            "0000000000000001000000010000000161000000026869".into(),
            "0000000000000001000000010000000161000000026869".into(),
        ),
        TestVector::ok(
            "entry_empty",
            "Entry",
            "no ext ids, empty data",
            "00000000000000000000000000000000".into(),
            "00000000000000000000000000000000".into(),
        ),
        TestVector::err(
            "entry_truncated",
            "Entry",
            "timestamp cut short",
            "00000000000000".into(),
        ),
        TestVector::err(
            "entry_bad_length",
            "Entry",
            "data length runs past the end",
            "000000000000000100000000000000ff6869".into(),
        ),
        TestVector::ok(
            "entry_info_basic",
            "EntryInfo",
            "block 5, index 3",
            entry_info.clone(),
            entry_info.clone(),
        ),
        TestVector::err(
            "entry_info_trailing",
            "EntryInfo",
            "one trailing byte",
            format!("{entry_info}ff"),
        ),
        TestVector::ok(
            "fb_batch_empty",
            "FbBatch",
            "no federated blocks, zeroed fields",
            format!("00000000{}0000000000000000{}", fill("00", 64), fill("00", 32)),
            format!("00000000{}0000000000000000{}", fill("00", 64), fill("00", 32)),
        ),
    ]
}

/// Version marker vectors.
///
/// The marker is a little-endian `i32`; a short file reads as -1.
pub fn marker_vectors() -> Vec<TestVector> {
    vec![
        TestVector::ok("marker_v0", "marker", "version 0", "00000000".into(), "00000000".into()),
        TestVector::ok("marker_v1", "marker", "version 1", "01000000".into(), "01000000".into()),
        TestVector::ok("marker_short", "marker", "two bytes", "0100".into(), "ffffffff".into()),
    ]
}

/// Returns every vector.
pub fn all_vectors() -> Vec<TestVector> {
    let mut vectors = key_vectors();
    vectors.extend(record_vectors());
    vectors.extend(marker_vectors());
    vectors
}

/// Exports every vector as pretty JSON.
pub fn export_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&all_vectors())
}

/// Decodes a hex string into bytes.
///
/// # Panics
///
/// Panics on invalid hex; vectors are fixed test data.
pub fn decode_hex(s: &str) -> Vec<u8> {
    assert!(s.len() % 2 == 0, "odd hex length: {s}");
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).expect("invalid hex"))
        .collect()
}

/// Encodes bytes as lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notary_core::keys;
    use notary_core::{BinaryCodec, ChainId, Entry, EntryInfo, FbBatch, Hash};

    fn hash_at(bytes: &[u8], at: usize) -> Hash {
        Hash::from_slice(&bytes[at..at + 32]).unwrap()
    }

    #[test]
    fn key_vectors_match_key_layout() {
        for v in key_vectors() {
            let input = decode_hex(&v.input_hex);
            let key = match v.kind.as_str() {
                "entry_queue_key" => {
                    let chain = ChainId::from_slice(&input[..32]).unwrap();
                    let ts = u64::from_be_bytes(input[32..40].try_into().unwrap());
                    keys::entry_queue_key(&chain, ts, &hash_at(&input, 40))
                }
                "entry_key" => keys::entry_key(&hash_at(&input, 0)),
                "entry_info_key" => keys::entry_info_key(&hash_at(&input, 0)),
                "eb_info_key" => keys::eb_info_key(&hash_at(&input, 0)),
                "fb_batch_key" => keys::fb_batch_key(&hash_at(&input, 0)),
                other => panic!("unknown key kind {other}"),
            };
            assert_eq!(encode_hex(&key), v.expected_hex, "{}", v.id);
        }
    }

    fn reencode(kind: &str, input: &[u8]) -> notary_core::CoreResult<Vec<u8>> {
        Ok(match kind {
            "Entry" => Entry::unmarshal_binary(input)?.marshal_binary()?,
            "EntryInfo" => EntryInfo::unmarshal_binary(input)?.marshal_binary()?,
            "FbBatch" => FbBatch::unmarshal_binary(input)?.marshal_binary()?,
            other => panic!("unknown record kind {other}"),
        })
    }

    #[test]
    fn record_vectors_match_codec() {
        for v in record_vectors() {
            let result = reencode(&v.kind, &decode_hex(&v.input_hex));
            match &v.expected_error {
                None => assert_eq!(encode_hex(&result.unwrap()), v.expected_hex, "{}", v.id),
                Some(_) => assert!(result.is_err(), "{} should fail", v.id),
            }
        }
    }

    #[test]
    fn marker_vectors_match_store_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = notary_core::StoreDir::new(&dir.path().join("db"));
        for v in marker_vectors() {
            std::fs::write(store.marker_path(), decode_hex(&v.input_hex)).unwrap();
            let version = store.load_version().unwrap().unwrap();
            assert_eq!(encode_hex(&version.to_le_bytes()), v.expected_hex, "{}", v.id);
        }
    }

    #[test]
    fn export_roundtrips_through_json() {
        let json = export_json().unwrap();
        let parsed: Vec<TestVector> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, all_vectors());
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = all_vectors().into_iter().map(|v| v.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
