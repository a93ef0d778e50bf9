use talk_crypto::{DigestEngine, Sha256Digest};
use talk_types::{EpochMillis, FormatVersion, Record, CHECKSUM_LEN};
use tracing::debug;

use crate::error::{CodecError, CodecResult};
use crate::wire::WireWriter;

/// Fixed-size prefix of a current-version stream: tag, identity, timestamps.
const HEADER_BYTES: usize = 4 + 16 + 8 + 8;

/// Serializes records into the current format version.
///
/// Encoding completes the record it is given: `created_at` is filled in if
/// unset, `modified_at` is refreshed, and the freshly computed checksum is
/// attached. The record must already have an identity.
#[derive(Clone, Debug, Default)]
pub struct Encoder<D = Sha256Digest> {
    digest: D,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            digest: Sha256Digest,
        }
    }
}

impl<D: DigestEngine> Encoder<D> {
    pub fn with_digest(digest: D) -> Self {
        Self { digest }
    }

    /// Encode, stamping the current wall-clock time as `modified_at`.
    pub fn encode(&self, record: &mut Record) -> CodecResult<Vec<u8>> {
        self.encode_at(record, EpochMillis::now())
    }

    /// Encode with an explicit modification time.
    ///
    /// On error the record is left untouched.
    pub fn encode_at(&self, record: &mut Record, now: EpochMillis) -> CodecResult<Vec<u8>> {
        let id = record.id.ok_or(CodecError::MissingIdentity)?;
        let created_at = record.created_at.unwrap_or(now);

        let mut w = WireWriter::with_capacity(encoded_size_hint(record));
        w.put_i32(FormatVersion::CURRENT.tag());
        w.put_raw(&id.to_bytes());
        w.put_i64(created_at.as_millis());
        w.put_i64(now.as_millis());
        w.put_text("name", &record.name)?;

        w.put_count("clips", record.clips.len())?;
        for clip in &record.clips {
            w.put_blob("clip audio", &clip.audio)?;
            w.put_f32(clip.weight);
        }

        w.put_count("images", record.images.len())?;
        for image in &record.images {
            w.put_blob("image", image)?;
        }

        w.put_count("tags", record.tags.len())?;
        for tag in &record.tags {
            w.put_text("tag", tag)?;
        }

        // Digest covers everything written so far and nothing after.
        let checksum = self.digest.digest(w.as_slice());
        if record.checksum.is_some_and(|old| old != checksum) {
            debug!(name = %record.name, "replacing stale checksum");
        }
        w.put_raw(checksum.as_bytes());

        record.format_version = FormatVersion::CURRENT;
        record.created_at = Some(created_at);
        record.modified_at = Some(now);
        record.checksum = Some(checksum);

        debug!(
            name = %record.name,
            bytes = w.len(),
            checksum = %checksum.short_hex(),
            "encoded record"
        );
        Ok(w.into_inner())
    }
}

fn encoded_size_hint(record: &Record) -> usize {
    let clips: usize = record.clips.iter().map(|c| 8 + c.audio.len()).sum();
    let images: usize = record.images.iter().map(|i| 4 + i.len()).sum();
    let tags: usize = record.tags.iter().map(|t| 2 + t.len()).sum();
    HEADER_BYTES + 2 + record.name.len() + 12 + clips + images + tags + CHECKSUM_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use talk_types::{Checksum, RecordId};

    fn greeting() -> Record {
        let mut record = Record::new("Greeting");
        record.set_id(RecordId::from_bytes([7; 16]));
        record.add_clip(vec![1, 2, 3], 0.7);
        record.add_clip(vec![4, 5, 6], 0.3);
        record.add_image(vec![10, 20, 30]);
        record.add_tag("funny");
        record.add_tag("test");
        record
    }

    #[test]
    fn missing_identity_is_rejected_without_side_effects() {
        let mut record = Record::new("anon");
        let before = record.clone();
        let err = Encoder::new().encode(&mut record).unwrap_err();
        assert_eq!(err, CodecError::MissingIdentity);
        assert_eq!(record, before);
    }

    #[test]
    fn header_layout() {
        let mut record = greeting();
        let bytes = Encoder::new()
            .encode_at(&mut record, EpochMillis::new(0x0102))
            .unwrap();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 2]);
        assert_eq!(&bytes[4..20], &[7; 16]);
        // created_at defaults to the encode time on first save
        assert_eq!(&bytes[20..28], &[0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(&bytes[28..36], &[0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(&bytes[36..38], &[0, 8]);
        assert_eq!(&bytes[38..46], b"Greeting");
    }

    #[test]
    fn checksum_is_digest_of_everything_before_it() {
        let mut record = greeting();
        let bytes = Encoder::new().encode(&mut record).unwrap();
        let (body, tail) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
        let expected = Sha256Digest.digest(body);
        assert_eq!(tail, expected.as_bytes());
        assert_eq!(record.checksum, Some(expected));
    }

    #[test]
    fn encoding_completes_the_record() {
        let mut record = greeting();
        record.format_version = FormatVersion::V1;
        Encoder::new()
            .encode_at(&mut record, EpochMillis::new(5_000))
            .unwrap();
        assert_eq!(record.format_version, FormatVersion::V2);
        assert_eq!(record.created_at, Some(EpochMillis::new(5_000)));
        assert_eq!(record.modified_at, Some(EpochMillis::new(5_000)));
        assert!(record.checksum.is_some());
    }

    #[test]
    fn resave_keeps_created_and_refreshes_modified() {
        let mut record = greeting();
        let encoder = Encoder::new();
        encoder.encode_at(&mut record, EpochMillis::new(1_000)).unwrap();
        let first = record.checksum;
        encoder.encode_at(&mut record, EpochMillis::new(2_000)).unwrap();
        assert_eq!(record.created_at, Some(EpochMillis::new(1_000)));
        assert_eq!(record.modified_at, Some(EpochMillis::new(2_000)));
        assert_ne!(record.checksum, first);
    }

    #[test]
    fn stale_checksum_is_replaced() {
        let mut record = greeting();
        record.set_checksum(Checksum::from_bytes([0; 32]));
        let bytes = Encoder::new().encode(&mut record).unwrap();
        let body = &bytes[..bytes.len() - CHECKSUM_LEN];
        assert_eq!(record.checksum, Some(Sha256Digest.digest(body)));
    }

    #[test]
    fn same_input_same_bytes() {
        let encoder = Encoder::new();
        let now = EpochMillis::new(42);
        let a = encoder.encode_at(&mut greeting(), now).unwrap();
        let b = encoder.encode_at(&mut greeting(), now).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oversized_tag_fails_and_leaves_record_untouched() {
        let mut record = greeting();
        record.add_tag("x".repeat(70_000));
        let before = record.clone();
        let err = Encoder::new().encode(&mut record).unwrap_err();
        assert!(matches!(err, CodecError::FieldTooLong { field: "tag", .. }));
        assert_eq!(record, before);
    }

    #[test]
    fn size_hint_is_exact_for_current_layout() {
        let mut record = greeting();
        let hint = encoded_size_hint(&record);
        let bytes = Encoder::new().encode(&mut record).unwrap();
        assert_eq!(hint, bytes.len());
    }
}
