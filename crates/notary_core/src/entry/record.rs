//! Entry record and queue status.

use crate::codec::{put_var_bytes, wire_len, BinaryCodec, Reader};
use crate::error::{CoreError, CoreResult};
use crate::types::Hash;

/// An immutable notarized data record.
///
/// An entry is identified by the SHA-256 hash of its encoded form, see
/// [`Entry::hash`].
///
/// # Encoding
///
/// ```text
/// timestamp      u64 BE
/// ext_id count   u32 BE
/// ext_ids        (u32 BE length ++ bytes) * count
/// data           u32 BE length ++ bytes
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    /// Creation time in seconds since the Unix epoch.
    pub timestamp: u64,
    /// External identifiers supplied by the submitter.
    pub ext_ids: Vec<Vec<u8>>,
    /// Opaque payload.
    pub data: Vec<u8>,
}

impl Entry {
    /// Creates an entry with no external identifiers.
    #[must_use]
    pub fn new(timestamp: u64, data: impl Into<Vec<u8>>) -> Self {
        Self {
            timestamp,
            ext_ids: Vec::new(),
            data: data.into(),
        }
    }

    /// Adds an external identifier.
    #[must_use]
    pub fn with_ext_id(mut self, ext_id: impl Into<Vec<u8>>) -> Self {
        self.ext_ids.push(ext_id.into());
        self
    }

    /// Returns the content hash of the encoded entry.
    ///
    /// # Errors
    ///
    /// Fails only if the entry cannot be encoded, see
    /// [`BinaryCodec::marshal_binary`].
    pub fn hash(&self) -> CoreResult<Hash> {
        Ok(Hash::sha256(&self.marshal_binary()?))
    }
}

impl BinaryCodec for Entry {
    const KIND: &'static str = "Entry";

    fn marshal_binary(&self) -> CoreResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(16 + self.data.len());
        buf.extend_from_slice(&self.timestamp.to_be_bytes());

        let count = wire_len(Self::KIND, self.ext_ids.len())?;
        buf.extend_from_slice(&count.to_be_bytes());
        for ext_id in &self.ext_ids {
            put_var_bytes(Self::KIND, &mut buf, ext_id)?;
        }

        put_var_bytes(Self::KIND, &mut buf, &self.data)?;
        Ok(buf)
    }

    fn unmarshal_binary(data: &[u8]) -> CoreResult<Self> {
        let mut reader = Reader::new(Self::KIND, data);
        let timestamp = reader.u64()?;

        let count = reader.count(4)?;
        let mut ext_ids = Vec::with_capacity(count);
        for _ in 0..count {
            ext_ids.push(reader.var_bytes()?);
        }

        let payload = reader.var_bytes()?;
        reader.finish()?;

        Ok(Self {
            timestamp,
            ext_ids,
            data: payload,
        })
    }
}

/// Status byte stored as the value of an entry-queue record.
///
/// NotaryDB only ever writes [`QueueStatus::InQueue`]. Later stages that
/// confirm entries own any further states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum QueueStatus {
    /// The entry is waiting to be included in an entry block.
    InQueue = 0,
}

impl QueueStatus {
    /// Returns the stored byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Parses a stored byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::InQueue),
            _ => None,
        }
    }

    /// Decodes a stored queue value, which must be exactly one known byte.
    pub(crate) fn decode(value: &[u8]) -> CoreResult<Self> {
        match value {
            [byte] => Self::from_byte(*byte).ok_or_else(|| {
                CoreError::deserialization("QueueStatus", format!("unknown status {byte:#04x}"))
            }),
            _ => Err(CoreError::deserialization(
                "QueueStatus",
                format!("expected 1 byte, got {}", value.len()),
            )),
        }
    }
}
