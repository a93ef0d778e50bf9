use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length in bytes of every [`Checksum`].
pub const CHECKSUM_LEN: usize = 32;

/// Integrity digest carried by a saved record.
///
/// Always exactly [`CHECKSUM_LEN`] bytes; the fixed-size array makes any other
/// length unrepresentable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum([u8; CHECKSUM_LEN]);

impl Checksum {
    /// Wrap a pre-computed digest.
    pub const fn from_bytes(bytes: [u8; CHECKSUM_LEN]) -> Self {
        Self(bytes)
    }

    /// Copy a digest out of a slice, rejecting anything but 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; CHECKSUM_LEN] =
            bytes.try_into().map_err(|_| TypeError::InvalidLength {
                expected: CHECKSUM_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; CHECKSUM_LEN] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.short_hex())
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; CHECKSUM_LEN]> for Checksum {
    fn from(bytes: [u8; CHECKSUM_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Checksum> for [u8; CHECKSUM_LEN] {
    fn from(checksum: Checksum) -> Self {
        checksum.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let sum = Checksum::from_bytes([0xAB; 32]);
        let parsed = Checksum::from_hex(&sum.to_hex()).unwrap();
        assert_eq!(sum, parsed);
    }

    #[test]
    fn from_slice_rejects_short_input() {
        let err = Checksum::from_slice(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 3
            }
        );
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            Checksum::from_hex("not hex"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn display_is_full_hex() {
        let sum = Checksum::from_bytes([1; 32]);
        let display = format!("{sum}");
        assert_eq!(display.len(), 64);
        assert_eq!(sum.short_hex(), "01010101");
    }

    #[test]
    fn serde_roundtrip() {
        let sum = Checksum::from_bytes([7; 32]);
        let json = serde_json::to_string(&sum).unwrap();
        let parsed: Checksum = serde_json::from_str(&json).unwrap();
        assert_eq!(sum, parsed);
    }
}
