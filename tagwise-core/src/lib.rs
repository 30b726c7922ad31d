//! Core feature matching for tagwise.
//!
//! Map elements (nodes, ways and relations carrying free-form tags) are
//! classified against a registry of named features. The registry resolves
//! the best match, or every match, for an element, and each match derives
//! the prominence and specificity that a labelling layer uses to pick a
//! description and importance tier.
//!
//! The moving parts, leaves first:
//!
//! - [`Element`] / [`OsmElement`]: what gets matched.
//! - [`TagSpec`]: a single required tag.
//! - [`Feature`]: a sealed set of matching rules ([`SimpleFeature`],
//!   [`FeatureCategory`], [`UntaggedFeature`]) sharing [`FeatureBase`].
//! - [`Match`] and [`MatchGroup`]: scored results.
//! - [`FeatureDb`]: the registry.
//!
//! Registration validates eagerly: bad element types, duplicate names and
//! category/feature name clashes are rejected with typed errors and leave the
//! registry untouched. An element that matches nothing is not an error.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod db;
pub mod element;
pub mod feature;
mod group;
mod plural;
pub mod scoring;
pub mod tag;

pub use db::{FeatureDb, RegistryError, SharedFeatureDb};
pub use element::{Element, ElementType, InvalidTypeError, OsmElement, Tags};
pub use feature::{
    DEFAULT_CATEGORY_PRECISION, DEFAULT_FEATURE_PRECISION, Feature, FeatureBase, FeatureCategory,
    FeatureInfo, FeatureKind, FeatureLookup, SimpleFeature, UntaggedFeature,
};
pub use group::{FeatureGroup, MatchGroup, MatchGroupError, group_by_feature};
pub use plural::pluralize;
pub use scoring::{IDENTITY_KEYS, Match, MatchSummary, NAMED_SPECIFICITY, PROMINENCE_TABLE, Signal};
pub use tag::{TagSpec, TagSpecError};
