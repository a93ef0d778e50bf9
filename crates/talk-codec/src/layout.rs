//! Per-version record layouts.
//!
//! Each [`Layout`] reads the fields that follow the version tag and produces
//! the same [`Record`] shape, leaving unset whatever its revision lacks.
//!
//! ```text
//! V1: name | clip count | (len, bytes, weight)* | image len (0 = none) | image bytes
//! V2: id[16] | created i64 | modified i64 | name | clip count | (len, bytes, weight)*
//!     | image count | (len, bytes)* | tag count | tag* | checksum[32]
//! ```

use talk_types::{Checksum, Clip, EpochMillis, FormatVersion, Record, RecordId, CHECKSUM_LEN};
use tracing::trace;

use crate::error::CodecResult;
use crate::wire::WireReader;

/// Smallest encoding of one clip: length prefix plus weight.
const MIN_CLIP_BYTES: usize = 8;
/// Smallest encoding of one image: length prefix.
const MIN_IMAGE_BYTES: usize = 4;
/// Smallest encoding of one tag: text length prefix.
const MIN_TAG_BYTES: usize = 2;

/// Decode strategy for one format revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    V1,
    V2,
}

impl Layout {
    pub fn for_version(version: FormatVersion) -> Self {
        match version {
            FormatVersion::V1 => Self::V1,
            FormatVersion::V2 => Self::V2,
        }
    }

    pub fn version(&self) -> FormatVersion {
        match self {
            Self::V1 => FormatVersion::V1,
            Self::V2 => FormatVersion::V2,
        }
    }

    /// Returns `true` if streams in this layout end with a checksum.
    pub fn has_checksum(&self) -> bool {
        matches!(self, Self::V2)
    }

    /// Parse every field after the version tag.
    pub fn read_body(&self, reader: &mut WireReader<'_>) -> CodecResult<Record> {
        match self {
            Self::V1 => read_v1(reader),
            Self::V2 => read_v2(reader),
        }
    }
}

fn read_v1(reader: &mut WireReader<'_>) -> CodecResult<Record> {
    let mut record = Record::new(reader.read_text("name")?);
    record.format_version = FormatVersion::V1;

    read_clips(reader, &mut record)?;

    let image = reader.read_blob("profile image")?;
    if !image.is_empty() {
        record.add_image(image);
    }
    Ok(record)
}

fn read_v2(reader: &mut WireReader<'_>) -> CodecResult<Record> {
    let id = RecordId::from_bytes(reader.read_array::<16>("identity")?);
    let created_at = EpochMillis::new(reader.read_i64("creation timestamp")?);
    let modified_at = EpochMillis::new(reader.read_i64("modification timestamp")?);

    let mut record = Record::new(reader.read_text("name")?);
    record.format_version = FormatVersion::V2;
    record.set_id(id);
    record.set_created_at(created_at);
    record.set_modified_at(modified_at);

    read_clips(reader, &mut record)?;

    let images = reader.read_count("images", MIN_IMAGE_BYTES)?;
    record.images.reserve(images);
    for _ in 0..images {
        record.add_image(reader.read_blob("image")?);
    }

    let tags = reader.read_count("tags", MIN_TAG_BYTES)?;
    record.tags.reserve(tags);
    for _ in 0..tags {
        record.add_tag(reader.read_text("tag")?);
    }

    let checksum = reader.read_array::<CHECKSUM_LEN>("checksum")?;
    record.set_checksum(Checksum::from_bytes(checksum));
    Ok(record)
}

fn read_clips(reader: &mut WireReader<'_>, record: &mut Record) -> CodecResult<()> {
    let count = reader.read_count("clips", MIN_CLIP_BYTES)?;
    record.clips.reserve(count);
    for index in 0..count {
        let audio = reader.read_blob("clip audio")?;
        let weight = reader.read_f32("clip weight")?;
        trace!(index, len = audio.len(), weight, "read clip");
        record.clips.push(Clip::new(audio, weight));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_maps_every_version() {
        for version in [FormatVersion::V1, FormatVersion::V2] {
            assert_eq!(Layout::for_version(version).version(), version);
        }
    }

    #[test]
    fn only_current_layout_carries_checksum() {
        assert!(!Layout::V1.has_checksum());
        assert!(Layout::V2.has_checksum());
    }

    #[test]
    fn v1_zero_length_image_means_absent() {
        let mut data = vec![0, 1, b'a'];
        data.extend_from_slice(&0i32.to_be_bytes()); // clips
        data.extend_from_slice(&0i32.to_be_bytes()); // image
        let record = Layout::V1.read_body(&mut WireReader::new(&data)).unwrap();
        assert_eq!(record.name, "a");
        assert!(record.images.is_empty());
        assert!(record.clips.is_empty());
    }

    #[test]
    fn v1_missing_image_field_is_malformed() {
        let mut data = vec![0, 1, b'a'];
        data.extend_from_slice(&0i32.to_be_bytes());
        let err = Layout::V1.read_body(&mut WireReader::new(&data)).unwrap_err();
        assert!(err.is_malformed());
    }
}
