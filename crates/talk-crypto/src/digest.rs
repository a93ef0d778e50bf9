use sha2::{Digest, Sha256};
use talk_types::Checksum;

/// Computes the integrity digest of a canonical byte sequence.
///
/// Implementations must be deterministic and order-sensitive, and always
/// produce a full 32-byte [`Checksum`].
pub trait DigestEngine: Send + Sync {
    /// Digest a complete byte sequence.
    fn digest(&self, data: &[u8]) -> Checksum;

    /// Check that `data` digests to `expected`.
    fn verify(&self, data: &[u8], expected: &Checksum) -> bool {
        self.digest(data) == *expected
    }
}

/// SHA-256 over the raw bytes, with no domain prefix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256Digest;

impl Sha256Digest {
    /// Digest several slices as if they were one contiguous buffer.
    pub fn digest_parts(&self, parts: &[&[u8]]) -> Checksum {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Checksum::from_bytes(hasher.finalize().into())
    }
}

impl DigestEngine for Sha256Digest {
    fn digest(&self, data: &[u8]) -> Checksum {
        Checksum::from_bytes(Sha256::digest(data).into())
    }
}
