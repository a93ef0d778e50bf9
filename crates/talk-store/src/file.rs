use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use talk_codec::{DecodeOptions, Decoder, Encoder};
use talk_types::Record;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::names::validate_record_name;
use crate::resolver::DirectoryResolver;
use crate::traits::{save_blob, ProfileStore};

/// File extension of every stored profile.
pub const TALK_EXTENSION: &str = "talk";

/// Directory-backed profile store: one `<name>.talk` file per record.
///
/// Saves are written to a temporary file in the same directory, flushed, and
/// renamed over the target, so readers only ever see a complete blob or no
/// blob at all.
#[derive(Debug)]
pub struct TalkStore {
    root: PathBuf,
    config: StoreConfig,
    encoder: Encoder,
    decoder: Decoder,
}

impl TalkStore {
    /// Open a store in the directory named by `resolver`, creating it if needed.
    pub fn open(resolver: &dyn DirectoryResolver, config: StoreConfig) -> StoreResult<Self> {
        let root = resolver.resolve().map_err(StoreError::Resolve)?;
        Self::at(root, config)
    }

    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn at(root: impl Into<PathBuf>, config: StoreConfig) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        let decoder = Decoder::with_options(DecodeOptions {
            verify_checksum: config.verify_checksums,
        });
        info!(root = %root.display(), verify = config.verify_checksums, "opened talk store");
        Ok(Self {
            root,
            config,
            encoder: Encoder::new(),
            decoder,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Backing file for `name`.
    pub fn path_for(&self, name: &str) -> StoreResult<PathBuf> {
        validate_record_name(name)?;
        Ok(self.root.join(format!("{name}.{TALK_EXTENSION}")))
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> StoreResult<()> {
        let mut tmp =
            NamedTempFile::new_in(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        tmp.write_all(bytes)
            .map_err(|e| StoreError::io(tmp.path().to_path_buf(), e))?;
        if self.config.sync_on_write {
            tmp.as_file()
                .sync_all()
                .map_err(|e| StoreError::io(tmp.path().to_path_buf(), e))?;
        }
        // On failure the temp file is dropped and removed.
        tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
        Ok(())
    }

    fn read_blob(&self, name: &str, path: &Path) -> StoreResult<Vec<u8>> {
        let not_found = || StoreError::NotFound {
            name: name.to_string(),
        };
        let len = match fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => return Err(not_found()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        if len > self.config.max_blob_bytes {
            return Err(StoreError::Corrupted {
                name: name.to_string(),
                reason: format!(
                    "file is {len} bytes, limit is {}",
                    self.config.max_blob_bytes
                ),
            });
        }
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            // Deleted between the metadata check and the read.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

impl ProfileStore for TalkStore {
    fn save(&self, record: &mut Record) -> StoreResult<()> {
        let path = self.path_for(&record.name)?;
        let len = save_blob(&self.encoder, record, |bytes| self.write_atomic(&path, bytes))?;
        info!(name = %record.name, path = %path.display(), bytes = len, "saved record");
        Ok(())
    }

    fn load(&self, name: &str) -> StoreResult<Record> {
        let path = self.path_for(name)?;
        let bytes = self.read_blob(name, &path)?;
        let record = self
            .decoder
            .decode(&bytes)
            .map_err(|e| StoreError::from_decode(name, e))?;
        if record.name != name {
            warn!(file = name, stored = %record.name, "stored name differs from file name");
        }
        debug!(
            name,
            version = %record.format_version,
            clips = record.clip_count(),
            "loaded record"
        );
        Ok(record)
    }

    fn delete(&self, name: &str) -> StoreResult<bool> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(name, "deleted record");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn exists(&self, name: &str) -> StoreResult<bool> {
        let path = self.path_for(name)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.root, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TALK_EXTENSION)
                || !path.is_file()
            {
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => names.push(stem.to_string()),
                None => debug!(path = %path.display(), "skipping non-UTF-8 file name"),
            }
        }
        names.sort();
        Ok(names)
    }
}
