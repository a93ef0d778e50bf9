//! Durable storage for `.talk` voice profiles.
//!
//! Each record is kept as one encoded blob keyed by its name. The file
//! backend writes `<dir>/<name>.talk`; the in-memory backend keeps the same
//! bytes in a map so tests exercise the real codec.
//!
//! # Storage Backends
//!
//! All backends implement the [`ProfileStore`] trait:
//!
//! - [`TalkStore`] -- one file per record in a resolved directory
//! - [`InMemoryTalkStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. One blob per record name; a save replaces the previous blob whole.
//! 2. Writes go to a temporary sibling and are renamed into place.
//! 3. Identity is assigned on first save and never changes afterwards.
//! 4. The storage directory comes from a [`DirectoryResolver`], never a
//!    hard-coded path.
//! 5. All I/O and decode errors are propagated, never silently ignored.

pub mod config;
pub mod error;
pub mod file;
pub mod media;
pub mod memory;
pub mod names;
pub mod resolver;
pub mod traits;

use std::path::Path;

use talk_types::Record;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use file::{TalkStore, TALK_EXTENSION};
pub use media::{read_media, read_media_file, write_media_file};
pub use memory::InMemoryTalkStore;
pub use resolver::{DirectoryResolver, EnvDirectory, FixedDirectory, TALK_HOME_VAR};
pub use traits::ProfileStore;

/// Save `record` into `dir` with default settings, returning the completed
/// record.
pub fn save(dir: &Path, mut record: Record) -> StoreResult<Record> {
    TalkStore::at(dir, StoreConfig::default())?.save(&mut record)?;
    Ok(record)
}

/// Load the record named `name` from `dir` with default settings.
pub fn load(dir: &Path, name: &str) -> StoreResult<Record> {
    TalkStore::at(dir, StoreConfig::default())?.load(name)
}

/// Delete the record named `name` from `dir`. Returns `true` if it existed.
pub fn delete(dir: &Path, name: &str) -> StoreResult<bool> {
    TalkStore::at(dir, StoreConfig::default())?.delete(name)
}
