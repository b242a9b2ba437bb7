//! Sort key for the listing: a field name plus a direction, serialized to the
//! `-field` wire form only when a request is built.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const DISPLAY_NAME: &str = "display_name";
pub const SELF_PACED: &str = "self_paced";

const DESCENDING_PREFIX: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Header state of a sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Ascending,
    Descending,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderingKey {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("ordering key '{0}' does not name a field")]
pub struct EmptyOrderingField(pub String);

impl OrderingKey {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    pub fn indicator_for(&self, field: &str) -> SortIndicator {
        if self.field != field {
            return SortIndicator::Inactive;
        }
        match self.direction {
            SortDirection::Ascending => SortIndicator::Ascending,
            SortDirection::Descending => SortIndicator::Descending,
        }
    }

    /// Ordering that results from clicking the header of `field`: an active
    /// ascending column flips to descending, anything else starts ascending.
    pub fn toggled(&self, field: &str) -> OrderingKey {
        match self.indicator_for(field) {
            SortIndicator::Ascending => OrderingKey::descending(field),
            SortIndicator::Descending | SortIndicator::Inactive => OrderingKey::ascending(field),
        }
    }
}

impl Default for OrderingKey {
    fn default() -> Self {
        OrderingKey::ascending(DISPLAY_NAME)
    }
}

impl fmt::Display for OrderingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => f.write_str(&self.field),
            SortDirection::Descending => write!(f, "{DESCENDING_PREFIX}{}", self.field),
        }
    }
}

impl FromStr for OrderingKey {
    type Err = EmptyOrderingField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (field, direction) = match trimmed.strip_prefix(DESCENDING_PREFIX) {
            Some(field) => (field, SortDirection::Descending),
            None => (trimmed, SortDirection::Ascending),
        };
        if field.is_empty() {
            return Err(EmptyOrderingField(raw.to_string()));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

impl Serialize for OrderingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OrderingKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
