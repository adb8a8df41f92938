use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

///
/// TimestampError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TimestampError {
    #[error("timestamp parse error: {0}")]
    Parse(String),

    #[error("timestamp before epoch")]
    BeforeEpoch,
}

///
/// Timestamp
/// (in seconds)
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(u64::MIN);

    /// Construct from seconds.
    #[must_use]
    pub const fn from_seconds(secs: u64) -> Self {
        Self(secs)
    }

    #[must_use]
    /// Current wall-clock timestamp in seconds.
    pub fn now() -> Self {
        Self(u64::try_from(Utc::now().timestamp()).unwrap_or_default())
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn parse_rfc3339(s: &str) -> Result<Self, TimestampError> {
        let dt =
            DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::Parse(e.to_string()))?;

        Self::from_signed(dt.timestamp())
    }

    /// Parse integer seconds, a `YYYY-MM-DD` date (midnight UTC), or RFC 3339.
    pub fn parse_flexible(s: &str) -> Result<Self, TimestampError> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u64>() {
            return Ok(Self(n));
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| TimestampError::Parse(s.to_string()))?;

            return Self::from_signed(midnight.and_utc().timestamp());
        }

        Self::parse_rfc3339(s)
    }

    /// RFC 3339 rendering in UTC, second precision.
    #[must_use]
    pub fn to_rfc3339(self) -> String {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map_or_else(
                || self.0.to_string(),
                |dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
    }

    fn from_signed(secs: i64) -> Result<Self, TimestampError> {
        u64::try_from(secs)
            .map(Self)
            .map_err(|_| TimestampError::BeforeEpoch)
    }
}

///
/// Rfc3339
/// Display adapter rendering a timestamp as an RFC 3339 string.
///

pub struct Rfc3339(pub Timestamp);

impl fmt::Display for Rfc3339 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

///
/// TESTS
///
