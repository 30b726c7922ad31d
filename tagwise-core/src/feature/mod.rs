//! Named matching rules.
//!
//! A [`Feature`] describes what real-world thing an element's tags
//! represent. Every variant shares the attributes held in [`FeatureInfo`]
//! (name, label, allowed element types, category memberships, precision and
//! base prominence) and exposes them through the [`FeatureBase`] trait. The
//! variant decides how an element is matched:
//!
//! - [`SimpleFeature`] requires a set of tags.
//! - [`FeatureCategory`] matches when any of its member features matches.
//! - [`UntaggedFeature`] matches elements carrying no tags at all.
//!
//! Categories hold member *names*, not features. Members are resolved through
//! a [`FeatureLookup`], normally the [`FeatureDb`](crate::FeatureDb) that owns
//! every feature.

use std::collections::{BTreeSet, HashMap};
use std::hash::BuildHasher;

use log::debug;

use crate::{Element, ElementType, InvalidTypeError, Match, pluralize};

mod category;
mod simple;
mod untagged;

pub use category::FeatureCategory;
pub use simple::SimpleFeature;
pub use untagged::UntaggedFeature;

/// Default precision for simple and untagged features.
pub const DEFAULT_FEATURE_PRECISION: i32 = 0;
/// Default precision for categories.
pub const DEFAULT_CATEGORY_PRECISION: i32 = 3;

/// Attributes shared by every feature variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureInfo {
    name: String,
    label: Option<String>,
    plural: Option<String>,
    types: BTreeSet<ElementType>,
    categories: Vec<String>,
    precision: i32,
    prominence: i32,
}

impl FeatureInfo {
    fn new(name: String, precision: i32) -> Self {
        Self {
            name,
            label: None,
            plural: None,
            types: BTreeSet::new(),
            categories: Vec::new(),
            precision,
            prominence: 0,
        }
    }

    /// The explicit display label, if one was set.
    #[must_use]
    pub fn label_override(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The explicit plural label, if one was set.
    #[must_use]
    pub fn plural_override(&self) -> Option<&str> {
        self.plural.as_deref()
    }
}

/// Read and configure the attributes every feature carries.
///
/// Implemented by each variant and by [`Feature`] itself, so loaders can
/// configure a concrete variant before wrapping it and callers can inspect a
/// registered feature without matching on its kind.
pub trait FeatureBase {
    /// Shared attributes.
    fn info(&self) -> &FeatureInfo;

    /// Mutable shared attributes.
    fn info_mut(&mut self) -> &mut FeatureInfo;

    /// Unique name within a registry. Fixed at construction.
    fn name(&self) -> &str {
        &self.info().name
    }

    /// Display name, defaulting to [`FeatureBase::name`].
    fn label(&self) -> &str {
        let info = self.info();
        info.label.as_deref().unwrap_or(&info.name)
    }

    /// Override the display name.
    fn set_label(&mut self, label: impl Into<String>) {
        self.info_mut().label = Some(label.into());
    }

    /// Plural display name: the explicit override, or the English plural of
    /// the name.
    fn plural(&self) -> String {
        let info = self.info();
        info.plural
            .clone()
            .unwrap_or_else(|| pluralize(&info.name))
    }

    /// Override the plural display name.
    fn set_plural(&mut self, plural: impl Into<String>) {
        self.info_mut().plural = Some(plural.into());
    }

    /// Element types this feature applies to.
    fn types(&self) -> &BTreeSet<ElementType> {
        &self.info().types
    }

    /// Allow an element type.
    fn allow_type(&mut self, element_type: ElementType) {
        self.info_mut().types.insert(element_type);
    }

    /// Parse and allow an element type.
    ///
    /// # Errors
    /// Returns [`InvalidTypeError`] for anything other than `node`, `way` or
    /// `relation`; the allowed types are left unchanged.
    fn add_type(&mut self, value: &str) -> Result<(), InvalidTypeError> {
        let element_type = value.parse()?;
        self.allow_type(element_type);
        Ok(())
    }

    /// Report whether the element's type is allowed.
    fn typecheck<E: Element + ?Sized>(&self, element: &E) -> bool {
        self.info().types.contains(&element.element_type())
    }

    /// Category names this feature belongs to, in the order they were added.
    fn categories(&self) -> &[String] {
        &self.info().categories
    }

    /// Record membership of a category. Duplicates are kept.
    fn add_category(&mut self, category: impl Into<String>) {
        self.info_mut().categories.push(category.into());
    }

    /// Specificity weight used to rank competing matches.
    fn precision(&self) -> i32 {
        self.info().precision
    }

    /// Override the precision.
    fn set_precision(&mut self, precision: i32) {
        self.info_mut().precision = precision;
    }

    /// Base prominence added to every match of this feature.
    fn prominence(&self) -> i32 {
        self.info().prominence
    }

    /// Override the base prominence.
    fn set_prominence(&mut self, prominence: i32) {
        self.info_mut().prominence = prominence;
    }
}

/// Resolve features by name.
pub trait FeatureLookup {
    /// Return the feature registered under `name`.
    fn lookup(&self, name: &str) -> Option<&Feature>;
}

impl<S: BuildHasher> FeatureLookup for HashMap<String, Feature, S> {
    fn lookup(&self, name: &str) -> Option<&Feature> {
        self.get(name)
    }
}

/// The kind of a feature, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FeatureKind {
    /// [`SimpleFeature`].
    #[cfg_attr(feature = "serde", serde(rename = "feature"))]
    Simple,
    /// [`FeatureCategory`].
    Category,
    /// [`UntaggedFeature`].
    Untagged,
}

impl FeatureKind {
    /// Return the kind as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "feature",
            Self::Category => "category",
            Self::Untagged => "untagged",
        }
    }

    /// Report whether this is the category kind.
    #[must_use]
    pub const fn is_category(self) -> bool {
        matches!(self, Self::Category)
    }
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feature {
    /// Matches by required tags and element type.
    Simple(SimpleFeature),
    /// Matches when any member matches.
    Category(FeatureCategory),
    /// Matches untagged elements of an allowed type.
    Untagged(UntaggedFeature),
}

impl Feature {
    /// The variant of this feature.
    #[must_use]
    pub const fn kind(&self) -> FeatureKind {
        match self {
            Self::Simple(_) => FeatureKind::Simple,
            Self::Category(_) => FeatureKind::Category,
            Self::Untagged(_) => FeatureKind::Untagged,
        }
    }

    /// Return the category when this feature is one.
    #[must_use]
    pub const fn as_category(&self) -> Option<&FeatureCategory> {
        match self {
            Self::Category(category) => Some(category),
            Self::Simple(_) | Self::Untagged(_) => None,
        }
    }

    pub(crate) const fn as_category_mut(&mut self) -> Option<&mut FeatureCategory> {
        match self {
            Self::Category(category) => Some(category),
            Self::Simple(_) | Self::Untagged(_) => None,
        }
    }

    /// Report whether `element` satisfies this feature.
    ///
    /// `lookup` resolves category members; simple and untagged features
    /// ignore it.
    pub fn is_match<E, L>(&self, element: &E, lookup: &L) -> bool
    where
        E: Element + ?Sized,
        L: FeatureLookup + ?Sized,
    {
        match self {
            Self::Simple(feature) => feature.matches(element),
            Self::Category(category) => category.matches(element, lookup),
            Self::Untagged(feature) => feature.matches(element),
        }
    }

    /// Match `element` against this feature.
    ///
    /// Returns `None` when the element does not satisfy the feature; that is
    /// an expected outcome rather than an error.
    ///
    /// # Examples
    /// ```
    /// use std::collections::HashMap;
    /// use tagwise_core::{ElementType, Feature, FeatureBase, OsmElement, SimpleFeature, TagSpec};
    ///
    /// let mut cafe = SimpleFeature::new("cafe");
    /// cafe.allow_type(ElementType::Node);
    /// cafe.tag(TagSpec::key_value("amenity", "cafe"));
    /// let feature = Feature::from(cafe);
    ///
    /// let node = OsmElement::new(1, ElementType::Node).with_tag("amenity", "cafe");
    /// let lookup: HashMap<String, Feature> = HashMap::new();
    /// assert!(feature.match_element(&node, &lookup).is_some());
    /// ```
    pub fn match_element<E, L>(&self, element: &E, lookup: &L) -> Option<Match<'_>>
    where
        E: Element + ?Sized,
        L: FeatureLookup + ?Sized,
    {
        if self.is_match(element, lookup) {
            Some(Match::new(self, element))
        } else {
            debug!("{} '{}' did not match", self.kind(), self.name());
            None
        }
    }
}

impl FeatureBase for Feature {
    fn info(&self) -> &FeatureInfo {
        match self {
            Self::Simple(feature) => feature.info(),
            Self::Category(category) => category.info(),
            Self::Untagged(feature) => feature.info(),
        }
    }

    fn info_mut(&mut self) -> &mut FeatureInfo {
        match self {
            Self::Simple(feature) => feature.info_mut(),
            Self::Category(category) => category.info_mut(),
            Self::Untagged(feature) => feature.info_mut(),
        }
    }
}

impl From<SimpleFeature> for Feature {
    fn from(feature: SimpleFeature) -> Self {
        Self::Simple(feature)
    }
}

impl From<FeatureCategory> for Feature {
    fn from(category: FeatureCategory) -> Self {
        Self::Category(category)
    }
}

impl From<UntaggedFeature> for Feature {
    fn from(feature: UntaggedFeature) -> Self {
        Self::Untagged(feature)
    }
}
