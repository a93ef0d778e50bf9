//! Foundation types for talk profiles.
//!
//! A talk profile is a named bundle of sound clips (each paired with a
//! selection weight), profile images, and free-text tags, persisted as one
//! versioned binary blob. Every other talk crate depends on `talk-types`.
//!
//! # Key Types
//!
//! - [`Record`] -- One profile: identity, timestamps, payload, integrity digest
//! - [`Clip`] -- Audio bytes paired with their selection weight
//! - [`RecordId`] -- UUID v7 identity assigned at first save
//! - [`EpochMillis`] -- Wall-clock milliseconds since the UNIX epoch
//! - [`Checksum`] -- Fixed 32-byte integrity digest
//! - [`FormatVersion`] -- Closed set of on-disk layout revisions

pub mod checksum;
pub mod error;
pub mod id;
pub mod record;
pub mod temporal;

pub use checksum::{Checksum, CHECKSUM_LEN};
pub use error::TypeError;
pub use id::RecordId;
pub use record::{Clip, FormatVersion, Record, RecordSummary};
pub use temporal::EpochMillis;
