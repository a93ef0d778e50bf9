use std::io;
use std::path::PathBuf;

use talk_codec::CodecError;

/// Errors from profile store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No blob is stored under the requested name.
    #[error("talk file not found: {name}")]
    NotFound { name: String },

    /// The blob exists but is truncated, structurally invalid, or fails its
    /// checksum.
    #[error("talk file corrupted: {name}: {reason}")]
    Corrupted { name: String, reason: String },

    /// The blob was written by a newer format revision.
    #[error("talk file {name} uses format version {version}; this build reads up to {max}")]
    UnsupportedVersion {
        name: String,
        version: i32,
        max: i32,
    },

    /// The name cannot be used as a storage key.
    #[error("invalid record name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The record could not be serialized.
    #[error("cannot encode {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: CodecError,
    },

    /// I/O error from the underlying filesystem.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The injected directory capability could not produce a directory.
    #[error("cannot resolve storage directory: {0}")]
    Resolve(#[source] io::Error),

    /// Store configuration could not be parsed or rendered.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Translate a decode failure for the blob stored under `name`.
    pub(crate) fn from_decode(name: &str, err: CodecError) -> Self {
        match err {
            CodecError::UnsupportedVersion { version, max } => Self::UnsupportedVersion {
                name: name.to_string(),
                version,
                max,
            },
            other => Self::Corrupted {
                name: name.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// The record name this error concerns, if any.
    pub fn record_name(&self) -> Option<&str> {
        match self {
            Self::NotFound { name }
            | Self::Corrupted { name, .. }
            | Self::UnsupportedVersion { name, .. }
            | Self::InvalidName { name, .. }
            | Self::Encode { name, .. } => Some(name),
            Self::Io { .. } | Self::Resolve(_) | Self::Config(_) => None,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
