use talk_crypto::{DigestEngine, Sha256Digest};
use talk_types::{Checksum, FormatVersion, Record, CHECKSUM_LEN};
use tracing::{debug, warn};

use crate::error::{CodecError, CodecResult};
use crate::layout::Layout;
use crate::wire::WireReader;

/// Decoder behaviour switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Recompute the digest of checksummed layouts and reject mismatches.
    pub verify_checksum: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            verify_checksum: true,
        }
    }
}

/// Parses `.talk` streams of any supported format version.
///
/// Decoding is a pure function of the input bytes: no state is kept between
/// calls and nothing is produced on failure.
#[derive(Clone, Debug, Default)]
pub struct Decoder<D = Sha256Digest> {
    options: DecodeOptions,
    digest: D,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_options(DecodeOptions::default())
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            options,
            digest: Sha256Digest,
        }
    }
}

impl<D: DigestEngine> Decoder<D> {
    pub fn with_digest(options: DecodeOptions, digest: D) -> Self {
        Self { options, digest }
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Decode a complete stream into a record.
    pub fn decode(&self, data: &[u8]) -> CodecResult<Record> {
        let mut reader = WireReader::new(data);
        let version = read_version(&mut reader)?;
        let layout = Layout::for_version(version);
        debug!(%version, len = data.len(), "decoding record");

        let record = layout.read_body(&mut reader)?;
        if !reader.is_exhausted() {
            return Err(CodecError::malformed(
                reader.offset(),
                format!(
                    "{} trailing bytes after {version} record",
                    reader.remaining()
                ),
            ));
        }

        if let Some(expected) = record.checksum {
            if self.options.verify_checksum {
                // The checksum is the final field, so the body is everything before it.
                self.verify(&data[..data.len() - CHECKSUM_LEN], expected)?;
            }
        }
        Ok(record)
    }

    fn verify(&self, body: &[u8], expected: Checksum) -> CodecResult<()> {
        let computed = self.digest.digest(body);
        if computed != expected {
            warn!(
                expected = %expected.short_hex(),
                computed = %computed.short_hex(),
                "checksum mismatch"
            );
            return Err(CodecError::ChecksumMismatch { expected, computed });
        }
        Ok(())
    }
}

/// Read only the leading version tag.
pub fn peek_version(data: &[u8]) -> CodecResult<FormatVersion> {
    read_version(&mut WireReader::new(data))
}

fn read_version(reader: &mut WireReader<'_>) -> CodecResult<FormatVersion> {
    let tag = reader.read_i32("version tag")?;
    match FormatVersion::from_tag(tag) {
        Some(version) => Ok(version),
        None if tag > FormatVersion::LATEST.tag() => Err(CodecError::UnsupportedVersion {
            version: tag,
            max: FormatVersion::LATEST.tag(),
        }),
        None => Err(CodecError::malformed(0, format!("invalid version tag {tag}"))),
    }
}
