//! Error type for definition loading.

use std::io;

use camino::Utf8PathBuf;
use tagwise_core::{FeatureKind, InvalidTypeError, RegistryError, TagSpecError};
use thiserror::Error;

/// Errors raised while reading, building or writing feature definitions.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The definition file could not be read.
    #[error("failed to read feature definitions from {path}")]
    Read {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
        /// File that was being read.
        path: Utf8PathBuf,
    },
    /// The definition file could not be written.
    #[error("failed to write feature definitions to {path}")]
    Write {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
        /// File that was being written.
        path: Utf8PathBuf,
    },
    /// The input is not a valid definition array.
    #[error("failed to parse feature definitions")]
    Parse {
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// Definitions could not be encoded.
    #[error("failed to encode feature definitions")]
    Serialize {
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// A definition names an unknown element type.
    #[error("definition of '{name}' has an invalid element type")]
    InvalidType {
        /// Feature being defined.
        name: String,
        /// The rejected type.
        #[source]
        source: InvalidTypeError,
    },
    /// A definition carries a malformed tag.
    #[error("definition of '{name}' has an invalid tag")]
    InvalidTag {
        /// Feature being defined.
        name: String,
        /// The rejected tag.
        #[source]
        source: TagSpecError,
    },
    /// Tags were given for a kind that does not match on tags.
    #[error("'{name}' is a {kind} and cannot require tags")]
    UnexpectedTags {
        /// Feature being defined.
        name: String,
        /// Its declared kind.
        kind: FeatureKind,
    },
    /// Members were given for a kind that is not a category.
    #[error("'{name}' is a {kind} and cannot have members")]
    UnexpectedMembers {
        /// Feature being defined.
        name: String,
        /// Its declared kind.
        kind: FeatureKind,
    },
    /// The registry rejected a feature or membership.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
