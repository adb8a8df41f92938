use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::str::FromStr;
use thiserror::Error as ThisError;

///
/// EntityIdError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EntityIdError {
    #[error("entity id is empty")]
    Empty,

    #[error("entity id '{0}' is not a decimal integer")]
    NotNumeric(String),

    #[error("entity id must be positive")]
    Zero,
}

///
/// EntityId
///
/// String-encoded positive integer identifying one row in a collection.
/// Ordering is numeric, so `"10"` sorts after `"9"`.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{_0}")]
pub struct EntityId(u64);

impl EntityId {
    pub const MIN: Self = Self(1);

    /// Construct from a raw integer, rejecting zero.
    pub const fn new(value: u64) -> Result<Self, EntityIdError> {
        if value == 0 {
            return Err(EntityIdError::Zero);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EntityIdError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EntityIdError::NotNumeric(s.to_string()));
        }

        let value = s
            .parse::<u64>()
            .map_err(|_| EntityIdError::NotNumeric(s.to_string()))?;

        Self::new(value)
    }
}

impl TryFrom<u64> for EntityId {
    type Error = EntityIdError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<u64> for EntityId {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        other.parse::<Self>().is_ok_and(|other| other == *self)
    }
}

// Ids cross the wire as decimal strings.
impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map_err(de::Error::custom)
    }
}

///
/// TESTS
///
