//! Declarative feature definitions.
//!
//! A definition file is a JSON array of entries, one per feature:
//!
//! ```json
//! [
//!   { "name": "cafe", "types": "node", "tags": "amenity=cafe",
//!     "categories": ["food"], "precision": 5 },
//!   { "name": "food", "kind": "category", "label": "places to eat" }
//! ]
//! ```
//!
//! `types`, `tags`, `categories` and `members` accept a single string or a
//! list. Omitting `types` allows every element type; an explicit empty list
//! allows none.

use serde::{Deserialize, Deserializer, Serialize};
use tagwise_core::{
    ElementType, Feature, FeatureBase, FeatureCategory, FeatureKind, SimpleFeature, TagSpec,
    UntaggedFeature,
};

use crate::LoadError;

/// One feature as written in a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureDefinition {
    /// Unique feature name.
    pub name: String,
    /// Variant to build. Defaults to a simple feature.
    #[serde(default = "simple_kind", skip_serializing_if = "is_simple")]
    pub kind: FeatureKind,
    /// Display label override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Plural display label override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    /// Allowed element types; `None` allows all of them.
    #[serde(
        default,
        deserialize_with = "optional_one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub types: Option<Vec<String>>,
    /// Required tags in `key` or `key=value` form.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
    /// Categories this feature belongs to.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub categories: Vec<String>,
    /// Member feature names, for categories.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub members: Vec<String>,
    /// Precision override; the kind's default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
    /// Base prominence.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub prominence: i32,
}

const fn simple_kind() -> FeatureKind {
    FeatureKind::Simple
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skipped fields by reference"
)]
const fn is_simple(kind: &FeatureKind) -> bool {
    matches!(kind, FeatureKind::Simple)
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skipped fields by reference"
)]
const fn is_zero(value: &i32) -> bool {
    *value == 0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    OneOrMany::deserialize(deserializer).map(Vec::from)
}

fn optional_one_or_many<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Option::<OneOrMany>::deserialize(deserializer).map(|value| value.map(Vec::from))
}

impl FeatureDefinition {
    /// A simple feature definition with no tags and every element type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Simple,
            label: None,
            plural: None,
            types: None,
            tags: Vec::new(),
            categories: Vec::new(),
            members: Vec::new(),
            precision: None,
            prominence: 0,
        }
    }

    /// Build the feature this entry describes.
    ///
    /// Category memberships are recorded on the feature; wiring them into
    /// a registry is left to [`load_into`](crate::load_into).
    ///
    /// # Errors
    /// Returns [`LoadError::InvalidType`] or [`LoadError::InvalidTag`] for
    /// malformed values, and [`LoadError::UnexpectedTags`] or
    /// [`LoadError::UnexpectedMembers`] when a field does not apply to the
    /// entry's kind.
    pub fn to_feature(&self) -> Result<Feature, LoadError> {
        if !self.tags.is_empty() && self.kind != FeatureKind::Simple {
            return Err(LoadError::UnexpectedTags {
                name: self.name.clone(),
                kind: self.kind,
            });
        }
        if !self.members.is_empty() && !self.kind.is_category() {
            return Err(LoadError::UnexpectedMembers {
                name: self.name.clone(),
                kind: self.kind,
            });
        }
        let mut feature: Feature = match self.kind {
            FeatureKind::Simple => {
                let mut simple = SimpleFeature::new(self.name.as_str());
                for raw in &self.tags {
                    let spec: TagSpec = raw.parse().map_err(|source| LoadError::InvalidTag {
                        name: self.name.clone(),
                        source,
                    })?;
                    simple.tag(spec);
                }
                simple.into()
            }
            FeatureKind::Category => FeatureCategory::new(self.name.as_str()).into(),
            FeatureKind::Untagged => UntaggedFeature::new(self.name.as_str()).into(),
        };
        self.configure(&mut feature)?;
        Ok(feature)
    }

    fn configure(&self, feature: &mut Feature) -> Result<(), LoadError> {
        match &self.types {
            None => ElementType::ALL
                .into_iter()
                .for_each(|element_type| feature.allow_type(element_type)),
            Some(types) => {
                for value in types {
                    feature
                        .add_type(value)
                        .map_err(|source| LoadError::InvalidType {
                            name: self.name.clone(),
                            source,
                        })?;
                }
            }
        }
        if let Some(label) = &self.label {
            feature.set_label(label.as_str());
        }
        if let Some(plural) = &self.plural {
            feature.set_plural(plural.as_str());
        }
        if let Some(precision) = self.precision {
            feature.set_precision(precision);
        }
        feature.set_prominence(self.prominence);
        for category in &self.categories {
            feature.add_category(category.as_str());
        }
        Ok(())
    }

    /// Describe an existing feature.
    ///
    /// Only explicit overrides are written, so a definition dumped from a
    /// registry loads back into an equivalent feature.
    #[must_use]
    pub fn from_feature(feature: &Feature) -> Self {
        let info = feature.info();
        let types = feature.types();
        let mut definition = Self::new(feature.name());
        definition.kind = feature.kind();
        definition.label = info.label_override().map(str::to_owned);
        definition.plural = info.plural_override().map(str::to_owned);
        definition.types = (types.len() != ElementType::ALL.len())
            .then(|| types.iter().map(ToString::to_string).collect());
        definition.categories = feature.categories().to_vec();
        definition.prominence = feature.prominence();
        let default_precision = match feature.kind() {
            FeatureKind::Category => tagwise_core::DEFAULT_CATEGORY_PRECISION,
            FeatureKind::Simple | FeatureKind::Untagged => tagwise_core::DEFAULT_FEATURE_PRECISION,
        };
        definition.precision =
            (feature.precision() != default_precision).then(|| feature.precision());
        match feature {
            Feature::Simple(simple) => {
                definition.tags = simple.tags().iter().map(ToString::to_string).collect();
            }
            Feature::Category(category) => {
                definition.members = category.members().to_vec();
            }
            Feature::Untagged(_) => {}
        }
        definition
    }
}

impl From<&Feature> for FeatureDefinition {
    fn from(feature: &Feature) -> Self {
        Self::from_feature(feature)
    }
}
