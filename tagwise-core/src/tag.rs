//! Required-tag specifications for simple features.
//!
//! A specification is written either as a bare key (`"building"`), which
//! only requires the key to be present, or as `key=value`
//! (`"amenity=cafe"`), which also requires the value to match exactly.
//!
//! # Examples
//! ```
//! use tagwise_core::{TagSpec, Tags};
//!
//! let spec: TagSpec = "amenity=cafe".parse().unwrap();
//! let tags = Tags::from([("amenity".into(), "cafe".into())]);
//! assert!(spec.is_satisfied_by(&tags));
//! ```

use std::str::FromStr;

use thiserror::Error;

use crate::Tags;

/// A single tag requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagSpec {
    /// The key must be present with any value.
    Key(String),
    /// The key must be present with exactly this value.
    KeyValue {
        /// Required key.
        key: String,
        /// Required value.
        value: String,
    },
}

/// Errors returned when parsing a [`TagSpec`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagSpecError {
    /// The specification had no key before the `=`.
    #[error("tag specification '{raw}' has an empty key")]
    EmptyKey {
        /// The rejected specification.
        raw: String,
    },
}

impl TagSpec {
    /// Require `key` to be present.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Require `key` to be present with `value`.
    #[must_use]
    pub fn key_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The key this specification constrains.
    #[must_use]
    pub fn tag_key(&self) -> &str {
        match self {
            Self::Key(key) | Self::KeyValue { key, .. } => key,
        }
    }

    /// Report whether `tags` satisfy the requirement.
    #[must_use]
    pub fn is_satisfied_by(&self, tags: &Tags) -> bool {
        match self {
            Self::Key(key) => tags.contains_key(key),
            Self::KeyValue { key, value } => tags.get(key).is_some_and(|found| found == value),
        }
    }
}

impl FromStr for TagSpec {
    type Err = TagSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = match s.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (s, None),
        };
        if key.is_empty() {
            return Err(TagSpecError::EmptyKey { raw: s.to_owned() });
        }
        Ok(value.map_or_else(|| Self::key(key), |v| Self::key_value(key, v)))
    }
}

impl std::fmt::Display for TagSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::KeyValue { key, value } => write!(f, "{key}={value}"),
        }
    }
}
