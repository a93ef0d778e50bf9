//! Versioned binary format for `.talk` profile files.
//!
//! A `.talk` stream starts with a big-endian `int32` format version. The
//! [`Decoder`] reads that tag first and hands the rest of the stream to the
//! matching [`Layout`]; the [`Encoder`] only ever writes
//! [`FormatVersion::CURRENT`](talk_types::FormatVersion::CURRENT).
//!
//! # Integrity
//!
//! Current-version streams end with a SHA-256 digest of every byte that
//! precedes it. The encoder computes it from the buffer it just assembled and
//! the decoder recomputes it from the bytes it just read, so both sides digest
//! the same canonical sequence. Verification on read is on by default; see
//! [`DecodeOptions`].
//!
//! # Design Rules
//!
//! 1. Encoding and decoding are pure transformations: no I/O, no shared state.
//! 2. A failed decode yields no partial record.
//! 3. Unknown future versions are refused before any field is parsed.
//! 4. Length prefixes are validated against the remaining input before any
//!    allocation.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod layout;
pub mod wire;

pub use decoder::{peek_version, DecodeOptions, Decoder};
pub use encoder::Encoder;
pub use error::{CodecError, CodecResult};
pub use layout::Layout;

use talk_types::Record;

/// Encode with the default SHA-256 encoder.
pub fn encode(record: &mut Record) -> CodecResult<Vec<u8>> {
    Encoder::new().encode(record)
}

/// Decode with checksum verification enabled.
pub fn decode(data: &[u8]) -> CodecResult<Record> {
    Decoder::new().decode(data)
}
