//! The feature registry.
//!
//! [`FeatureDb`] owns every registered [`Feature`] and answers match queries
//! for elements. It is built in a load phase (registration) and queried
//! afterwards; [`FeatureDb::into_shared`] publishes a finished registry for
//! read-only use across threads.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::{Element, Feature, FeatureBase, FeatureCategory, FeatureKind, FeatureLookup, Match};
use crate::{MatchGroup, MatchGroupError};

/// Errors raised while registering features.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A feature of the same kind family is already registered under the
    /// name.
    #[error("a feature named '{name}' is already registered")]
    DuplicateName {
        /// The contested name.
        name: String,
    },
    /// The name is bound to a category and a non-category was registered,
    /// or vice versa.
    #[error("'{name}' is registered as a {existing}, not a {requested}")]
    TypeConflict {
        /// The contested name.
        name: String,
        /// Kind already registered under the name.
        existing: FeatureKind,
        /// Kind that was being registered.
        requested: FeatureKind,
    },
    /// No feature is registered under the name.
    #[error("no feature named '{name}' is registered")]
    UnknownFeature {
        /// The missing name.
        name: String,
    },
    /// The named feature exists but is not a category.
    #[error("'{name}' is a {kind}, not a category")]
    NotACategory {
        /// The feature's name.
        name: String,
        /// The feature's actual kind.
        kind: FeatureKind,
    },
}

/// Registry of features keyed by unique name.
///
/// # Examples
/// ```
/// use tagwise_core::{ElementType, FeatureBase, FeatureCategory, FeatureDb, OsmElement, SimpleFeature, TagSpec};
///
/// # fn main() -> Result<(), tagwise_core::RegistryError> {
/// let mut cafe = SimpleFeature::new("cafe").with_tag(TagSpec::key_value("amenity", "cafe"));
/// cafe.allow_type(ElementType::Node);
/// cafe.set_precision(5);
///
/// let mut db = FeatureDb::new();
/// db.register(cafe)?;
/// db.register(FeatureCategory::new("food").with_member("cafe"))?;
///
/// let node = OsmElement::new(1, ElementType::Node).with_tag("amenity", "cafe");
/// let best = db.match_best(&node).expect("cafe matches");
/// assert_eq!(best.feature().name(), "cafe");
/// assert_eq!(db.match_element(&node).len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureDb {
    features: Vec<Feature>,
    index: HashMap<String, usize>,
}

impl FeatureDb {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature under its name.
    ///
    /// # Errors
    /// Returns [`RegistryError::TypeConflict`] when the name is bound to a
    /// feature of the other kind family (category vs. non-category) and
    /// [`RegistryError::DuplicateName`] when it is bound to one of the same
    /// family. The registry is unchanged on error.
    pub fn register(&mut self, entry: impl Into<Feature>) -> Result<(), RegistryError> {
        let feature: Feature = entry.into();
        if let Some(existing) = self.get(feature.name()) {
            let existing_kind = existing.kind();
            let requested = feature.kind();
            let name = feature.name().to_owned();
            if existing_kind.is_category() == requested.is_category() {
                return Err(RegistryError::DuplicateName { name });
            }
            return Err(RegistryError::TypeConflict {
                name,
                existing: existing_kind,
                requested,
            });
        }
        debug!(
            "registering {} '{}' with precision {}",
            feature.kind(),
            feature.name(),
            feature.precision()
        );
        self.index.insert(feature.name().to_owned(), self.features.len());
        self.features.push(feature);
        Ok(())
    }

    /// Add `feature` as a member of the registered category `category`.
    ///
    /// The member does not have to be registered yet; unresolved members are
    /// skipped during matching.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownFeature`] when no feature is named
    /// `category` and [`RegistryError::NotACategory`] when it is not a
    /// category.
    pub fn register_member(
        &mut self,
        category: &str,
        feature: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let target = self
            .index
            .get(category)
            .and_then(|&position| self.features.get_mut(position))
            .ok_or_else(|| RegistryError::UnknownFeature {
                name: category.to_owned(),
            })?;
        let kind = target.kind();
        let found = target
            .as_category_mut()
            .ok_or_else(|| RegistryError::NotACategory {
                name: category.to_owned(),
                kind,
            })?;
        found.register(feature);
        Ok(())
    }

    /// Return the feature registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.index
            .get(name)
            .and_then(|&position| self.features.get(position))
    }

    /// Report whether a feature is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered features, categories included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Report whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over features in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Registered categories in registration order.
    #[must_use]
    pub fn categories(&self) -> Vec<&FeatureCategory> {
        self.features.iter().filter_map(Feature::as_category).collect()
    }

    /// Every match for `element`, highest precision first.
    ///
    /// Features of equal precision keep registration order. An element that
    /// matches nothing yields an empty vector.
    pub fn match_element<E: Element + ?Sized>(&self, element: &E) -> Vec<Match<'_>> {
        let mut matches: Vec<Match<'_>> = self
            .features
            .iter()
            .filter_map(|feature| feature.match_element(element, self))
            .collect();
        // Stable sort keeps registration order among equal precisions.
        matches.sort_by_key(|found| std::cmp::Reverse(found.precision()));
        debug!(
            "{} element matched {} of {} features",
            element.element_type(),
            matches.len(),
            self.features.len()
        );
        matches
    }

    /// The single highest-precision match for `element`.
    ///
    /// The earliest registered feature wins ties. Returns `None` when nothing
    /// matches.
    pub fn match_best<E: Element + ?Sized>(&self, element: &E) -> Option<Match<'_>> {
        let mut best: Option<&Feature> = None;
        for feature in &self.features {
            if best.is_some_and(|current| feature.precision() <= current.precision()) {
                continue;
            }
            if feature.is_match(element, self) {
                best = Some(feature);
            }
        }
        best.map(|feature| Match::new(feature, element))
    }

    /// All matches for `element` as a [`MatchGroup`].
    ///
    /// # Errors
    /// Returns [`MatchGroupError::Empty`] when nothing matches.
    pub fn match_group<E: Element + ?Sized>(
        &self,
        element: &E,
    ) -> Result<MatchGroup<'_>, MatchGroupError> {
        MatchGroup::new(self.match_element(element))
    }

    /// Match the registry against each element independently.
    ///
    /// The result has one entry per element, in input order.
    pub fn match_all<'db, I>(&'db self, elements: I) -> Vec<Vec<Match<'db>>>
    where
        I: IntoIterator,
        I::Item: Element,
    {
        elements
            .into_iter()
            .map(|element| self.match_element(&element))
            .collect()
    }

    /// The best match for each element, in input order.
    pub fn match_best_all<'db, I>(&'db self, elements: I) -> Vec<Option<Match<'db>>>
    where
        I: IntoIterator,
        I::Item: Element,
    {
        elements
            .into_iter()
            .map(|element| self.match_best(&element))
            .collect()
    }

    /// Publish the registry for shared, read-only querying.
    #[must_use]
    pub fn into_shared(self) -> SharedFeatureDb {
        Arc::new(self)
    }
}

/// A published registry. Queries take `&self`, so clones of the handle can
/// be used from several threads at once.
pub type SharedFeatureDb = Arc<FeatureDb>;

impl FeatureLookup for FeatureDb {
    fn lookup(&self, name: &str) -> Option<&Feature> {
        self.get(name)
    }
}

impl<'db> IntoIterator for &'db FeatureDb {
    type Item = &'db Feature;
    type IntoIter = std::slice::Iter<'db, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
