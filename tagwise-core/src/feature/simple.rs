//! Features matched by a required tag set.

use super::{DEFAULT_FEATURE_PRECISION, FeatureBase, FeatureInfo};
use crate::{Element, TagSpec};

/// A feature that requires every listed tag and an allowed element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleFeature {
    info: FeatureInfo,
    tags: Vec<TagSpec>,
}

impl SimpleFeature {
    /// Create a feature with no allowed types and no required tags.
    ///
    /// Allow at least one element type before registering it; a feature
    /// without types never matches.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: FeatureInfo::new(name.into(), DEFAULT_FEATURE_PRECISION),
            tags: Vec::new(),
        }
    }

    /// Add a required tag.
    pub fn tag(&mut self, spec: TagSpec) {
        self.tags.push(spec);
    }

    /// Add a required tag while consuming `self`, enabling chaining.
    #[must_use]
    pub fn with_tag(mut self, spec: TagSpec) -> Self {
        self.tag(spec);
        self
    }

    /// Required tags in the order they were added.
    #[must_use]
    pub fn tags(&self) -> &[TagSpec] {
        &self.tags
    }

    /// Report whether the element carries every required tag.
    ///
    /// A feature without required tags accepts any tag set.
    pub fn tagmatch<E: Element + ?Sized>(&self, element: &E) -> bool {
        let tags = element.tags();
        self.tags.iter().all(|spec| spec.is_satisfied_by(tags))
    }

    /// Report whether both the type and the tags match.
    pub fn matches<E: Element + ?Sized>(&self, element: &E) -> bool {
        self.typecheck(element) && self.tagmatch(element)
    }
}

impl FeatureBase for SimpleFeature {
    fn info(&self) -> &FeatureInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut FeatureInfo {
        &mut self.info
    }
}
