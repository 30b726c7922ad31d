//! Map elements consumed by the matcher.
//!
//! Matching only needs two capabilities from an element: its kind and its
//! tag mapping. The [`Element`] trait captures those so callers can plug in
//! their own element representations; [`OsmElement`] is a ready-made
//! implementation used by the loader and the CLI.
//!
//! # Examples
//! ```
//! use tagwise_core::{Element, ElementType, OsmElement};
//!
//! let cafe = OsmElement::new(1, ElementType::Node)
//!     .with_tag("amenity", "cafe");
//! assert_eq!(cafe.element_type(), ElementType::Node);
//! assert_eq!(cafe.tags().get("amenity").map(String::as_str), Some("cafe"));
//! ```

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OpenStreetMap-style free-form key/value tags.
pub type Tags = HashMap<String, String>;

/// The three kinds of map element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ElementType {
    /// A single point.
    Node,
    /// An ordered list of nodes.
    Way,
    /// A group of other elements.
    Relation,
}

impl ElementType {
    /// Every element type, in canonical order.
    pub const ALL: [Self; 3] = [Self::Node, Self::Way, Self::Relation];

    /// Return the type as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use tagwise_core::ElementType;
    ///
    /// assert_eq!(ElementType::Relation.as_str(), "relation");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a value outside `{node, way, relation}` is used as an
/// element type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid element type '{value}': expected node, way or relation")]
pub struct InvalidTypeError {
    /// The rejected input.
    pub value: String,
}

impl std::str::FromStr for ElementType {
    type Err = InvalidTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            _ => Err(InvalidTypeError {
                value: s.to_owned(),
            }),
        }
    }
}

/// Read access to the parts of a map element that matching inspects.
pub trait Element {
    /// The element's kind.
    fn element_type(&self) -> ElementType;

    /// The element's tags.
    fn tags(&self) -> &Tags;
}

impl<T: Element + ?Sized> Element for &T {
    fn element_type(&self) -> ElementType {
        (**self).element_type()
    }

    fn tags(&self) -> &Tags {
        (**self).tags()
    }
}

/// A concrete map element with an identifier, a kind and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OsmElement {
    /// OpenStreetMap identifier, unique per element type. Elements created
    /// in a change that has not been uploaded carry negative placeholders.
    pub id: i64,
    /// Node, way or relation.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub element_type: ElementType,
    /// Free-form tags.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Tags,
}

impl OsmElement {
    /// Construct an untagged element.
    #[must_use]
    pub fn new(id: i64, element_type: ElementType) -> Self {
        Self {
            id,
            element_type,
            tags: Tags::new(),
        }
    }

    /// Add a tag while consuming `self`, enabling chaining.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

impl Element for OsmElement {
    fn element_type(&self) -> ElementType {
        self.element_type
    }

    fn tags(&self) -> &Tags {
        &self.tags
    }
}
