use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::id::RecordId;
use crate::temporal::EpochMillis;

/// On-disk layout revision.
///
/// The set is closed: a stream that declares any other tag is either
/// malformed (tag below 1) or newer than this build understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormatVersion {
    /// Legacy layout: name, clips, at most one image. No identity,
    /// timestamps, tags, or checksum.
    V1,
    /// Current layout: adds identity, timestamps, multiple images, tags, and
    /// a trailing SHA-256 checksum.
    V2,
}

impl FormatVersion {
    /// The version every save writes.
    pub const CURRENT: Self = Self::V2;
    /// The highest version a reader of this build accepts.
    pub const LATEST: Self = Self::V2;

    /// Map a wire tag to a known version.
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            1 => Some(Self::V1),
            2 => Some(Self::V2),
            _ => None,
        }
    }

    /// The `int32` tag written at the head of every stream.
    pub fn tag(&self) -> i32 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.tag())
    }
}

/// One sound clip and its selection weight.
///
/// Audio bytes and weight travel together, so a record can never hold a
/// clip without a weight or a weight without a clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub audio: Vec<u8>,
    pub weight: f32,
}

impl Clip {
    pub fn new(audio: impl Into<Vec<u8>>, weight: f32) -> Self {
        Self {
            audio: audio.into(),
            weight,
        }
    }
}

/// A persisted talk profile.
///
/// Plain data: the mutators only append, and no semantic validation happens
/// here. Identity, timestamps, and checksum are completed by the encoder and
/// store at save time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Layout revision this instance was read from or last written as.
    pub format_version: FormatVersion,
    pub id: Option<RecordId>,
    pub created_at: Option<EpochMillis>,
    pub modified_at: Option<EpochMillis>,
    /// Display name, also the storage key.
    pub name: String,
    /// Clips in selection order.
    pub clips: Vec<Clip>,
    pub images: Vec<Vec<u8>>,
    pub tags: Vec<String>,
    pub checksum: Option<Checksum>,
}

impl Record {
    /// Create an empty, unsaved record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            format_version: FormatVersion::CURRENT,
            id: None,
            created_at: None,
            modified_at: None,
            name: name.into(),
            clips: Vec::new(),
            images: Vec::new(),
            tags: Vec::new(),
            checksum: None,
        }
    }

    /// Append a clip together with its weight.
    pub fn add_clip(&mut self, audio: impl Into<Vec<u8>>, weight: f32) {
        self.clips.push(Clip::new(audio, weight));
    }

    pub fn add_image(&mut self, image: impl Into<Vec<u8>>) {
        self.images.push(image.into());
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    pub fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    pub fn set_created_at(&mut self, at: EpochMillis) {
        self.created_at = Some(at);
    }

    pub fn set_modified_at(&mut self, at: EpochMillis) {
        self.modified_at = Some(at);
    }

    pub fn set_checksum(&mut self, checksum: Checksum) {
        self.checksum = Some(checksum);
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Weights in clip order.
    pub fn weights(&self) -> Vec<f32> {
        self.clips.iter().map(|c| c.weight).collect()
    }

    /// Returns `true` if this record came from a legacy (v1) stream.
    pub fn is_legacy(&self) -> bool {
        self.format_version == FormatVersion::V1
    }

    /// Blob-free view for display.
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            name: self.name.clone(),
            format_version: self.format_version.tag(),
            id: self.id.map(|id| id.to_string()),
            created_at: self.created_at.map(|t| t.as_millis()),
            modified_at: self.modified_at.map(|t| t.as_millis()),
            clip_sizes: self.clips.iter().map(|c| c.audio.len()).collect(),
            weights: self.weights(),
            image_sizes: self.images.iter().map(Vec::len).collect(),
            tags: self.tags.clone(),
            checksum: self.checksum.map(|c| c.to_hex()),
        }
    }
}

/// Display-oriented digest of a [`Record`]: blob sizes instead of blobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub name: String,
    pub format_version: i32,
    pub id: Option<String>,
    pub created_at: Option<i64>,
    pub modified_at: Option<i64>,
    pub clip_sizes: Vec<usize>,
    pub weights: Vec<f32>,
    pub image_sizes: Vec<usize>,
    pub tags: Vec<String>,
    pub checksum: Option<String>,
}
