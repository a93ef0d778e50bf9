use talk_codec::Encoder;
use talk_types::{Checksum, Clip, EpochMillis, FormatVersion, Record, RecordId};

use crate::error::{StoreError, StoreResult};
use crate::names::validate_record_name;

/// Name-keyed storage for talk profiles.
///
/// All implementations must satisfy these invariants:
/// - One blob per record name; saving a name replaces its previous blob.
/// - `save` completes the record in place: identity (if absent), timestamps,
///   and checksum are filled in once the blob is written. A failed save
///   leaves the record as it was.
/// - A reader never observes a partially written blob.
/// - All I/O and decode errors are propagated, never silently ignored.
pub trait ProfileStore: Send + Sync {
    /// Persist a record under its name.
    fn save(&self, record: &mut Record) -> StoreResult<()>;

    /// Load the record stored under `name`.
    ///
    /// Returns `NotFound` if no blob exists, `Corrupted` if it cannot be
    /// decoded or fails its checksum, and `UnsupportedVersion` if it was
    /// written by a newer format revision.
    fn load(&self, name: &str) -> StoreResult<Record>;

    /// Delete the blob stored under `name`. Returns `true` if one existed.
    fn delete(&self, name: &str) -> StoreResult<bool>;

    /// Check whether a blob is stored under `name`.
    fn exists(&self, name: &str) -> StoreResult<bool>;

    /// Names of all stored records, sorted.
    fn list(&self) -> StoreResult<Vec<String>>;

    /// Build a record from its parts, give it a fresh identity, and save it.
    ///
    /// Default implementation assembles the record and calls `save()`.
    fn create(
        &self,
        name: &str,
        clips: Vec<Clip>,
        images: Vec<Vec<u8>>,
        tags: Vec<String>,
    ) -> StoreResult<Record> {
        let mut record = Record::new(name);
        record.clips = clips;
        record.images = images;
        record.tags = tags;
        record.set_id(RecordId::new());
        self.save(&mut record)?;
        Ok(record)
    }
}

/// Fields that a save fills in.
#[derive(Clone, Copy)]
struct SaveStamp {
    format_version: FormatVersion,
    id: Option<RecordId>,
    created_at: Option<EpochMillis>,
    modified_at: Option<EpochMillis>,
    checksum: Option<Checksum>,
}

impl SaveStamp {
    fn capture(record: &Record) -> Self {
        Self {
            format_version: record.format_version,
            id: record.id,
            created_at: record.created_at,
            modified_at: record.modified_at,
            checksum: record.checksum,
        }
    }

    fn restore(self, record: &mut Record) {
        record.format_version = self.format_version;
        record.id = self.id;
        record.created_at = self.created_at;
        record.modified_at = self.modified_at;
        record.checksum = self.checksum;
    }
}

/// Shared save path: validate the key, assign identity, encode, and hand the
/// bytes to `write`. Returns the blob size.
///
/// The record keeps its completed identity, timestamps, and checksum only if
/// `write` succeeds; on any error it is restored to its state on entry.
pub(crate) fn save_blob<F>(encoder: &Encoder, record: &mut Record, write: F) -> StoreResult<usize>
where
    F: FnOnce(&[u8]) -> StoreResult<()>,
{
    validate_record_name(&record.name)?;
    let before = SaveStamp::capture(record);
    if record.id.is_none() {
        record.set_id(RecordId::new());
    }
    let result = encoder
        .encode(record)
        .map_err(|source| StoreError::Encode {
            name: record.name.clone(),
            source,
        })
        .and_then(|bytes| {
            write(&bytes)?;
            Ok(bytes.len())
        });
    if result.is_err() {
        before.restore(record);
    }
    result
}
