use std::collections::BTreeMap;
use std::sync::RwLock;

use talk_codec::{DecodeOptions, Decoder, Encoder};
use talk_types::Record;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::names::validate_record_name;
use crate::traits::{save_blob, ProfileStore};

/// In-memory profile store. Useful for testing.
///
/// Records are held as encoded blobs, so every load goes through the same
/// decode and checksum path as the file store.
#[derive(Debug, Default)]
pub struct InMemoryTalkStore {
    blobs: RwLock<BTreeMap<String, Vec<u8>>>,
    encoder: Encoder,
    decoder: Decoder,
}

impl InMemoryTalkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            decoder: Decoder::with_options(options),
            ..Self::default()
        }
    }

    /// Store raw bytes under `name`, bypassing the encoder.
    pub fn insert_raw(&self, name: impl Into<String>, bytes: Vec<u8>) {
        self.blobs
            .write()
            .expect("lock poisoned")
            .insert(name.into(), bytes);
    }

    /// Raw bytes stored under `name`.
    pub fn raw(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs
            .read()
            .expect("lock poisoned")
            .get(name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileStore for InMemoryTalkStore {
    fn save(&self, record: &mut Record) -> StoreResult<()> {
        let name = record.name.clone();
        let len = save_blob(&self.encoder, record, |bytes| {
            self.insert_raw(name.clone(), bytes.to_vec());
            Ok(())
        })?;
        debug!(name = %name, bytes = len, "saved record in memory");
        Ok(())
    }

    fn load(&self, name: &str) -> StoreResult<Record> {
        validate_record_name(name)?;
        let bytes = self.raw(name).ok_or_else(|| StoreError::NotFound {
            name: name.to_string(),
        })?;
        self.decoder
            .decode(&bytes)
            .map_err(|e| StoreError::from_decode(name, e))
    }

    fn delete(&self, name: &str) -> StoreResult<bool> {
        validate_record_name(name)?;
        Ok(self
            .blobs
            .write()
            .expect("lock poisoned")
            .remove(name)
            .is_some())
    }

    fn exists(&self, name: &str) -> StoreResult<bool> {
        validate_record_name(name)?;
        Ok(self
            .blobs
            .read()
            .expect("lock poisoned")
            .contains_key(name))
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .blobs
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talk_types::{Clip, FormatVersion};

    fn greeting() -> Record {
        let mut record = Record::new("Greeting");
        record.add_clip(vec![1, 2, 3], 0.7);
        record.add_clip(vec![4, 5, 6], 0.3);
        record.add_image(vec![10, 20, 30]);
        record.add_tag("funny");
        record.add_tag("test");
        record
    }

    #[test]
    fn save_and_load() {
        let store = InMemoryTalkStore::new();
        let mut record = greeting();
        store.save(&mut record).unwrap();
        let loaded = store.load("Greeting").unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.format_version, FormatVersion::V2);
    }

    #[test]
    fn missing_is_not_found() {
        let store = InMemoryTalkStore::new();
        assert!(matches!(
            store.load("Greeting"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn overwrite_replaces_blob() {
        let store = InMemoryTalkStore::new();
        store.save(&mut greeting()).unwrap();
        let mut second = Record::new("Greeting");
        second.add_clip(vec![9], 1.0);
        store.save(&mut second).unwrap();

        assert_eq!(store.len(), 1);
        let loaded = store.load("Greeting").unwrap();
        assert_eq!(loaded.clips, vec![Clip::new(vec![9], 1.0)]);
        assert!(loaded.images.is_empty());
    }

    #[test]
    fn delete_and_exists() {
        let store = InMemoryTalkStore::new();
        store.save(&mut greeting()).unwrap();
        assert!(store.exists("Greeting").unwrap());
        assert!(store.delete("Greeting").unwrap());
        assert!(!store.delete("Greeting").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn list_is_sorted() {
        let store = InMemoryTalkStore::new();
        for name in ["zeta", "alpha", "mid"] {
            store.save(&mut Record::new(name)).unwrap();
        }
        assert_eq!(store.list().unwrap(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn corrupted_blob_is_reported() {
        let store = InMemoryTalkStore::new();
        store.save(&mut greeting()).unwrap();
        let mut bytes = store.raw("Greeting").unwrap();
        bytes.truncate(bytes.len() - 1);
        store.insert_raw("Greeting", bytes);
        assert!(matches!(
            store.load("Greeting"),
            Err(StoreError::Corrupted { .. })
        ));
    }

    #[test]
    fn checksum_flip_tolerated_when_verification_off() {
        let store = InMemoryTalkStore::with_options(DecodeOptions {
            verify_checksum: false,
        });
        store.save(&mut greeting()).unwrap();
        let mut bytes = store.raw("Greeting").unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        store.insert_raw("Greeting", bytes);
        assert_eq!(store.load("Greeting").unwrap().name, "Greeting");
    }

    #[test]
    fn future_version_is_unsupported() {
        let store = InMemoryTalkStore::new();
        store.insert_raw("Next", 3i32.to_be_bytes().to_vec());
        assert!(matches!(
            store.load("Next"),
            Err(StoreError::UnsupportedVersion { version: 3, .. })
        ));
    }

    #[test]
    fn create_uses_default_implementation() {
        let store = InMemoryTalkStore::new();
        let record = store
            .create("Made", vec![Clip::new(vec![1], 0.5)], vec![], vec!["t".into()])
            .unwrap();
        assert_eq!(store.load("Made").unwrap(), record);
    }
}
