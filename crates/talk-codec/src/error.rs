use talk_types::Checksum;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unsupported format version {version} (this build reads up to {max})")]
    UnsupportedVersion { version: i32, max: i32 },

    #[error("malformed stream at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    #[error("checksum mismatch: stored {expected}, computed {computed}")]
    ChecksumMismatch {
        expected: Checksum,
        computed: Checksum,
    },

    #[error("record has no identity; assign one before encoding")]
    MissingIdentity,

    #[error("{field} is {len} bytes, limit is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("too many {field}: {count}, limit is {max}")]
    TooManyEntries {
        field: &'static str,
        count: usize,
        max: usize,
    },
}

impl CodecError {
    /// Structural damage or a failed integrity check: the stream cannot be
    /// trusted as a record.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::ChecksumMismatch { .. })
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            reason: reason.into(),
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
