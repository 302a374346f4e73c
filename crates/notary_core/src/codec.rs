//! Binary encoding of stored records.
//!
//! Every record stored by NotaryDB has a deterministic byte layout:
//! fixed-width big-endian integers, raw 32-byte hashes, and
//! `u32`-length-prefixed byte strings. Decoding rejects truncated input
//! and trailing bytes.

use crate::error::{CoreError, CoreResult};
use crate::types::{ChainId, Hash, HASH_SIZE};
use notary_storage::KvEngine;

/// Deterministic conversion of a record to and from bytes.
pub trait BinaryCodec: Sized {
    /// Record name used in decode errors.
    const KIND: &'static str;

    /// Encodes the record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RecordTooLarge`] if a length or count does not
    /// fit its `u32` prefix.
    fn marshal_binary(&self) -> CoreResult<Vec<u8>>;

    /// Decodes a record from exactly `data`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Deserialization`] if `data` is truncated,
    /// malformed, or has trailing bytes.
    fn unmarshal_binary(data: &[u8]) -> CoreResult<Self>;
}

/// Point-reads `key` and decodes the value as `T`.
///
/// An absent key is `Ok(None)`; undecodable bytes are an error.
pub(crate) fn read_record<T, E>(engine: &E, key: &[u8]) -> CoreResult<Option<T>>
where
    T: BinaryCodec,
    E: KvEngine + ?Sized,
{
    engine
        .get(key)?
        .map(|bytes| T::unmarshal_binary(&bytes))
        .transpose()
}

/// Converts a length or element count to its `u32` wire form.
pub(crate) fn wire_len(kind: &'static str, len: usize) -> CoreResult<u32> {
    u32::try_from(len).map_err(|_| CoreError::RecordTooLarge { kind, len })
}

/// Appends a `u32` length prefix followed by `bytes`.
pub(crate) fn put_var_bytes(kind: &'static str, buf: &mut Vec<u8>, bytes: &[u8]) -> CoreResult<()> {
    let len = wire_len(kind, bytes.len())?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Cursor over an encoded record.
pub(crate) struct Reader<'a> {
    kind: &'static str,
    data: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(kind: &'static str, data: &'a [u8]) -> Self {
        Self {
            kind,
            data,
            cursor: 0,
        }
    }

    fn take(&mut self, len: usize) -> CoreResult<&'a [u8]> {
        let end = self
            .cursor
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                CoreError::deserialization(
                    self.kind,
                    format!(
                        "truncated: need {len} bytes at offset {}, have {}",
                        self.cursor,
                        self.data.len() - self.cursor
                    ),
                )
            })?;
        let data = self.data;
        let slice = &data[self.cursor..end];
        self.cursor = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> CoreResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub(crate) fn u32(&mut self) -> CoreResult<u32> {
        self.take_array().map(u32::from_be_bytes)
    }

    pub(crate) fn u64(&mut self) -> CoreResult<u64> {
        self.take_array().map(u64::from_be_bytes)
    }

    pub(crate) fn hash(&mut self) -> CoreResult<Hash> {
        self.take_array::<HASH_SIZE>().map(Hash::from_bytes)
    }

    pub(crate) fn chain_id(&mut self) -> CoreResult<ChainId> {
        self.take_array::<HASH_SIZE>().map(ChainId::from_bytes)
    }

    pub(crate) fn var_bytes(&mut self) -> CoreResult<Vec<u8>> {
        let len = self.u32()? as usize;
        self.take(len).map(<[u8]>::to_vec)
    }

    /// Reads a `u32` element count, bounded by the bytes left so a corrupt
    /// count cannot trigger a huge allocation.
    pub(crate) fn count(&mut self, min_element_size: usize) -> CoreResult<usize> {
        let count = self.u32()? as usize;
        let remaining = self.data.len() - self.cursor;
        if count.saturating_mul(min_element_size.max(1)) > remaining {
            return Err(CoreError::deserialization(
                self.kind,
                format!("count {count} exceeds remaining {remaining} bytes"),
            ));
        }
        Ok(count)
    }

    pub(crate) fn finish(self) -> CoreResult<()> {
        if self.cursor != self.data.len() {
            return Err(CoreError::deserialization(
                self.kind,
                format!("{} trailing bytes", self.data.len() - self.cursor),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_reads_fields_in_order() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&7u32.to_be_bytes());
        buf.extend_from_slice(&9u64.to_be_bytes());
        put_var_bytes("Test", &mut buf, b"xyz").unwrap();
        buf.extend_from_slice(&[0x11; HASH_SIZE]);

        let mut reader = Reader::new("Test", &buf);
        assert_eq!(reader.u32().unwrap(), 7);
        assert_eq!(reader.u64().unwrap(), 9);
        assert_eq!(reader.var_bytes().unwrap(), b"xyz");
        assert_eq!(reader.hash().unwrap(), Hash::from_bytes([0x11; HASH_SIZE]));
        reader.finish().unwrap();
    }

    #[test]
    fn wire_len_rejects_oversized_fields() {
        assert_eq!(wire_len("Test", 3).unwrap(), 3);
        assert_eq!(wire_len("Test", u32::MAX as usize).unwrap(), u32::MAX);

        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            wire_len("Test", u32::MAX as usize + 1),
            Err(CoreError::RecordTooLarge { kind: "Test", len }) if len == u32::MAX as usize + 1
        ));
    }

    #[test]
    fn reader_rejects_truncation() {
        let mut reader = Reader::new("Test", &[0, 0, 0]);
        assert!(matches!(
            reader.u32(),
            Err(CoreError::Deserialization { kind: "Test", .. })
        ));
    }

    #[test]
    fn reader_rejects_trailing_bytes() {
        let buf = [0u8; 5];
        let mut reader = Reader::new("Test", &buf);
        reader.u32().unwrap();
        assert!(reader.finish().is_err());
    }

    #[test]
    fn reader_rejects_oversized_length_prefix() {
        let buf = u32::MAX.to_be_bytes();
        let mut reader = Reader::new("Test", &buf);
        assert!(reader.var_bytes().is_err());
    }

    #[test]
    fn reader_rejects_oversized_count() {
        let buf = 1000u32.to_be_bytes();
        let mut reader = Reader::new("Test", &buf);
        assert!(reader.count(HASH_SIZE).is_err());
    }
}
