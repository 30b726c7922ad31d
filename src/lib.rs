//! Facade crate for tagwise.
//!
//! This crate re-exports the core matching types and, behind the `loader`
//! feature, the definition loader and built-in fallback features.

#![forbid(unsafe_code)]

pub use tagwise_core::{
    Element, ElementType, Feature, FeatureBase, FeatureCategory, FeatureDb, FeatureGroup,
    FeatureKind, FeatureLookup, InvalidTypeError, Match, MatchGroup, MatchGroupError,
    MatchSummary, OsmElement, RegistryError, SharedFeatureDb, SimpleFeature, TagSpec,
    TagSpecError, Tags, UntaggedFeature, group_by_feature,
};

#[cfg(feature = "loader")]
pub use tagwise_loader::{
    FeatureDefinition, LoadError, dump_definitions, fallback_features, load_definitions,
    load_definitions_file, load_into, register_fallbacks,
};
