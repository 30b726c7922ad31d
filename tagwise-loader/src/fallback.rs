//! Built-in catch-all features.
//!
//! These give every element at least a coarse description ("unidentified
//! way", "shop") when no curated definition matches it. Their low precision
//! keeps them below any real definition in a ranked match list.

use log::debug;
use tagwise_core::{
    ElementType, Feature, FeatureBase, FeatureDb, SimpleFeature, TagSpec, UntaggedFeature,
};

use crate::LoadError;

/// Name of the feature matching every element.
pub const UNIDENTIFIED_OBJECT: &str = "unidentified object";

fn allow_all(feature: &mut impl FeatureBase) {
    for element_type in ElementType::ALL {
        feature.allow_type(element_type);
    }
}

fn keyed(name: &str, key: &str, precision: i32) -> SimpleFeature {
    let mut feature = SimpleFeature::new(name).with_tag(TagSpec::key(key));
    feature.set_precision(precision);
    feature
}

/// The catch-all features, least precise first.
///
/// | name | types | matches | precision |
/// |------|-------|---------|-----------|
/// | `unidentified object` | all | anything | 0 |
/// | `unidentified <type>` | one | any element of the type | 1 |
/// | `untagged <type>` | one | elements of the type without tags | 2 |
/// | `building` | way, relation | key `building` | 5 |
/// | `man made feature` | all | key `man_made` | 5 |
/// | `shop` | all | key `shop` | 6 |
#[must_use]
pub fn fallback_features() -> Vec<Feature> {
    let mut features: Vec<Feature> = Vec::new();

    let mut anything = SimpleFeature::new(UNIDENTIFIED_OBJECT);
    allow_all(&mut anything);
    anything.set_plural("assorted objects");
    features.push(anything.into());

    for element_type in ElementType::ALL {
        let mut unidentified = SimpleFeature::new(format!("unidentified {element_type}"));
        unidentified.allow_type(element_type);
        unidentified.set_precision(1);
        features.push(unidentified.into());
    }
    for element_type in ElementType::ALL {
        let mut untagged = UntaggedFeature::new(format!("untagged {element_type}"));
        untagged.allow_type(element_type);
        untagged.set_precision(2);
        features.push(untagged.into());
    }

    let mut building = keyed("building", "building", 5);
    building.allow_type(ElementType::Way);
    building.allow_type(ElementType::Relation);
    features.push(building.into());

    let mut man_made = keyed("man made feature", "man_made", 5);
    allow_all(&mut man_made);
    features.push(man_made.into());

    let mut shop = keyed("shop", "shop", 6);
    allow_all(&mut shop);
    features.push(shop.into());

    features
}

/// Register every [`fallback_features`] entry whose name `db` does not
/// already bind, returning how many were added.
///
/// Call it after loading curated definitions: a definition named `shop` or
/// `building` keeps its name and the fallback of that name is skipped.
/// Registering twice adds nothing the second time.
///
/// # Errors
/// Returns [`LoadError::Registry`] if a fallback cannot be registered; `db`
/// is then left unchanged.
pub fn register_fallbacks(db: &mut FeatureDb) -> Result<usize, LoadError> {
    let mut staged = db.clone();
    let mut registered = 0_usize;
    for feature in fallback_features() {
        if staged.contains(feature.name()) {
            debug!("fallback '{}' is already defined; skipping it", feature.name());
            continue;
        }
        staged.register(feature)?;
        registered += 1;
    }
    *db = staged;
    Ok(registered)
}
