//! Integrity digests for talk profiles.
//!
//! A saved record carries a SHA-256 digest of its canonical byte sequence:
//! every byte of the serialized record that precedes the checksum field.
//! The encoder and decoder both call into this crate, so the digest is
//! computed the same way on write and on read.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod digest;

pub use digest::{DigestEngine, Sha256Digest};
