//! Core type definitions for NotaryDB.

use crate::error::{CoreError, CoreResult};
use sha2::{Digest, Sha256};
use std::fmt;

/// Size in bytes of every hash and chain identifier.
pub const HASH_SIZE: usize = 32;

/// Defines a fixed-size 32-byte identifier with hex display and parsing.
macro_rules! fixed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name([u8; HASH_SIZE]);

        impl $name {
            /// Creates the identifier from raw bytes.
            #[inline]
            #[must_use]
            pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
                Self(bytes)
            }

            /// Returns the raw bytes.
            #[inline]
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; HASH_SIZE] {
                &self.0
            }

            /// Creates the identifier from a slice.
            ///
            /// Returns `None` if the slice is not exactly 32 bytes.
            #[must_use]
            pub fn from_slice(slice: &[u8]) -> Option<Self> {
                <[u8; HASH_SIZE]>::try_from(slice).ok().map(Self)
            }

            /// Parses the identifier from 64 hex characters.
            ///
            /// # Errors
            ///
            /// Returns [`CoreError::InvalidHex`] if the input is not valid hex
            /// or has the wrong length.
            pub fn from_hex(s: &str) -> CoreResult<Self> {
                decode_hex(s).map(Self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for byte in &self.0 {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }

        impl From<[u8; HASH_SIZE]> for $name {
            fn from(bytes: [u8; HASH_SIZE]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

fixed_id!(
    /// A 32-byte content hash identifying an entry, entry block, or federated block.
    Hash
);

fixed_id!(
    /// A 32-byte identifier of the chain an entry belongs to.
    ChainId
);

impl Hash {
    /// Computes the SHA-256 hash of `data`.
    #[must_use]
    pub fn sha256(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut bytes = [0u8; HASH_SIZE];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }
}

fn decode_hex(s: &str) -> CoreResult<[u8; HASH_SIZE]> {
    let s = s.trim();
    if s.len() != HASH_SIZE * 2 {
        return Err(CoreError::invalid_hex(format!(
            "expected {} characters, got {}",
            HASH_SIZE * 2,
            s.len()
        )));
    }

    let mut out = [0u8; HASH_SIZE];
    for (i, pair) in s.as_bytes().chunks_exact(2).enumerate() {
        let hi = hex_digit(pair[0])?;
        let lo = hex_digit(pair[1])?;
        out[i] = (hi << 4) | lo;
    }
    Ok(out)
}

fn hex_digit(c: u8) -> CoreResult<u8> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(CoreError::invalid_hex(format!(
            "invalid character {:?}",
            char::from(c)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let hash = Hash::from_bytes([0xab; HASH_SIZE]);
        let text = hash.to_string();
        assert_eq!(text, "ab".repeat(HASH_SIZE));
        assert_eq!(Hash::from_hex(&text).unwrap(), hash);
        assert_eq!(Hash::from_hex(&text.to_uppercase()).unwrap(), hash);
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(matches!(
            ChainId::from_hex("abcd"),
            Err(CoreError::InvalidHex { .. })
        ));
        let bad = format!("zz{}", "00".repeat(HASH_SIZE - 1));
        assert!(matches!(
            ChainId::from_hex(&bad),
            Err(CoreError::InvalidHex { .. })
        ));
    }

    #[test]
    fn from_slice_checks_length() {
        assert!(Hash::from_slice(&[1u8; 31]).is_none());
        assert_eq!(
            Hash::from_slice(&[1u8; 32]),
            Some(Hash::from_bytes([1u8; 32]))
        );
    }

    #[test]
    fn sha256_known_vector() {
        let hash = Hash::sha256(b"abc");
        assert_eq!(
            hash.to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn debug_includes_type_name() {
        let chain = ChainId::from_bytes([0x01; HASH_SIZE]);
        assert_eq!(format!("{chain:?}"), format!("ChainId({})", "01".repeat(32)));
    }
}
