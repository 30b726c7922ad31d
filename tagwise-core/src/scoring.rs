//! Matches and their derived scores.
//!
//! A [`Match`] pairs a feature with a snapshot of the element it matched and
//! derives two comparable scores from them:
//!
//! - **prominence**: how notable the matched object is. It starts at the
//!   feature's base prominence and adds each applicable row of
//!   [`PROMINENCE_TABLE`].
//! - **specificity**: how narrowly the match identifies the object.
//!   Explicitly identified objects (see [`IDENTITY_KEYS`]) score
//!   [`NAMED_SPECIFICITY`]; everything else falls back to the feature's
//!   precision.
//!
//! Only tags and the element type feed the scores. Geometry-derived signals
//! can be added as new [`Signal`] variants and table rows.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Element, ElementType, Feature, FeatureBase, FeatureKind, Tags};

/// Tag keys that identify a concrete real-world object.
pub const IDENTITY_KEYS: &[&str] = &["name", "operator", "brand", "ref"];

/// Specificity of a match on an explicitly identified object.
pub const NAMED_SPECIFICITY: i32 = 20;

/// A condition on an element's tags that earns a prominence bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The element carries at least one tag.
    AnyTag,
    /// The key is present.
    Key(&'static str),
    /// At least one of the keys is present.
    AnyKey(&'static [&'static str]),
}

impl Signal {
    /// Report whether the signal holds for `tags`.
    #[must_use]
    pub fn holds(self, tags: &Tags) -> bool {
        match self {
            Self::AnyTag => !tags.is_empty(),
            Self::Key(key) => tags.contains_key(key),
            Self::AnyKey(keys) => keys.iter().any(|key| tags.contains_key(*key)),
        }
    }
}

/// Additive prominence bonuses. Rows are independent; an element earns
/// every row whose signal holds.
pub const PROMINENCE_TABLE: &[(Signal, i32)] = &[
    (Signal::AnyTag, 1),
    (Signal::Key("wikipedia"), 3),
    (Signal::Key("historic"), 2),
    (Signal::AnyKey(IDENTITY_KEYS), 2),
];

/// The result of a feature matching an element.
///
/// Borrows the feature from its registry and snapshots the element's type
/// and tags at match time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'db> {
    feature: &'db Feature,
    element_type: ElementType,
    tags: Tags,
}

impl<'db> Match<'db> {
    pub(crate) fn new<E: Element + ?Sized>(feature: &'db Feature, element: &E) -> Self {
        Self {
            feature,
            element_type: element.element_type(),
            tags: element.tags().clone(),
        }
    }

    /// The feature that matched. For a category match this is the category,
    /// not the member that satisfied it.
    #[must_use]
    pub const fn feature(&self) -> &'db Feature {
        self.feature
    }

    /// Type of the matched element.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Tags of the matched element at match time.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Precision of the matched feature, the primary rank key.
    #[must_use]
    pub fn precision(&self) -> i32 {
        self.feature.precision()
    }

    /// Heuristic salience of the match.
    ///
    /// # Examples
    /// ```
    /// use std::collections::HashMap;
    /// use tagwise_core::{ElementType, Feature, FeatureBase, OsmElement, SimpleFeature, TagSpec};
    ///
    /// let mut cafe = SimpleFeature::new("cafe").with_tag(TagSpec::key_value("amenity", "cafe"));
    /// cafe.allow_type(ElementType::Node);
    /// let cafe = Feature::from(cafe);
    /// let lookup: HashMap<String, Feature> = HashMap::new();
    ///
    /// let node = OsmElement::new(1, ElementType::Node)
    ///     .with_tag("amenity", "cafe")
    ///     .with_tag("name", "Joe's");
    /// let found = cafe.match_element(&node, &lookup).unwrap();
    /// // +1 for having tags, +2 for the name.
    /// assert_eq!(found.prominence(), 3);
    /// ```
    #[must_use]
    pub fn prominence(&self) -> i32 {
        let bonus: i32 = PROMINENCE_TABLE
            .iter()
            .filter(|(signal, _)| signal.holds(&self.tags))
            .map(|(_, bonus)| bonus)
            .sum();
        self.feature.prominence().saturating_add(bonus)
    }

    /// How narrowly the match identifies the element.
    #[must_use]
    pub fn specificity(&self) -> i32 {
        if Signal::AnyKey(IDENTITY_KEYS).holds(&self.tags) {
            NAMED_SPECIFICITY
        } else {
            self.feature.precision()
        }
    }

    /// Owned record of the match for the labelling layer.
    #[must_use]
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            feature: self.feature.name().to_owned(),
            kind: self.feature.kind(),
            label: self.feature.label().to_owned(),
            plural: self.feature.plural(),
            precision: self.precision(),
            prominence: self.prominence(),
            specificity: self.specificity(),
        }
    }
}

/// Detached, serialisable view of a [`Match`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchSummary {
    /// Name of the matched feature.
    pub feature: String,
    /// Kind of the matched feature.
    pub kind: FeatureKind,
    /// Display label of the matched feature.
    pub label: String,
    /// Plural display label of the matched feature.
    pub plural: String,
    /// Feature precision.
    pub precision: i32,
    /// Match prominence.
    pub prominence: i32,
    /// Match specificity.
    pub specificity: i32,
}
