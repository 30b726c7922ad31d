//! Features matching elements without tags.

use super::{DEFAULT_FEATURE_PRECISION, FeatureBase, FeatureInfo};
use crate::Element;

/// Matches an element of an allowed type that carries no tags at all.
///
/// Used as a fallback so bare nodes and member ways still get a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntaggedFeature {
    info: FeatureInfo,
}

impl UntaggedFeature {
    /// Create an untagged feature with no allowed types.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: FeatureInfo::new(name.into(), DEFAULT_FEATURE_PRECISION),
        }
    }

    /// Report whether the element is untagged and of an allowed type.
    pub fn matches<E: Element + ?Sized>(&self, element: &E) -> bool {
        self.typecheck(element) && element.tags().is_empty()
    }
}

impl FeatureBase for UntaggedFeature {
    fn info(&self) -> &FeatureInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut FeatureInfo {
        &mut self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementType, OsmElement};

    #[test]
    fn matches_only_bare_elements_of_allowed_type() {
        let mut feature = UntaggedFeature::new("untagged way");
        feature.allow_type(ElementType::Way);

        assert!(feature.matches(&OsmElement::new(1, ElementType::Way)));
        assert!(!feature.matches(&OsmElement::new(2, ElementType::Node)));
        let tagged = OsmElement::new(3, ElementType::Way).with_tag("highway", "path");
        assert!(!feature.matches(&tagged));
    }
}
