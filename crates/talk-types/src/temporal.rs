use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock timestamp in milliseconds since the UNIX epoch.
///
/// Stored on disk as a big-endian `i64`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EpochMillis(i64);

impl EpochMillis {
    /// Create from a raw millisecond count.
    pub const fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Raw millisecond count.
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Convert to a UTC datetime, if the value is in chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Debug for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpochMillis({})", self.0)
    }
}

impl fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.3f UTC")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl From<i64> for EpochMillis {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_produces_reasonable_timestamp() {
        // Should be after 2020-01-01 (1577836800000 ms)
        assert!(EpochMillis::now().as_millis() > 1_577_836_800_000);
    }

    #[test]
    fn ordering_follows_millis() {
        assert!(EpochMillis::new(100) < EpochMillis::new(200));
    }

    #[test]
    fn display_format() {
        let ts = EpochMillis::new(1_000);
        assert_eq!(format!("{ts}"), "1970-01-01 00:00:01.000 UTC");
    }

    #[test]
    fn display_out_of_range_falls_back_to_millis() {
        let ts = EpochMillis::new(i64::MAX);
        assert_eq!(format!("{ts}"), format!("{}ms", i64::MAX));
    }
}
