//! Categories grouping other features.

use log::debug;

use super::{DEFAULT_CATEGORY_PRECISION, Feature, FeatureBase, FeatureInfo, FeatureLookup};
use crate::Element;

/// A feature that matches when any registered member feature matches.
///
/// Members are stored by name and resolved at match time, so a feature can
/// belong to several categories and categories can nest. Member names that
/// do not resolve are skipped. A category already being evaluated further up
/// the current membership chain is skipped too, so cyclic memberships
/// terminate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCategory {
    info: FeatureInfo,
    members: Vec<String>,
}

impl FeatureCategory {
    /// Create an empty category with the default category precision.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: FeatureInfo::new(name.into(), DEFAULT_CATEGORY_PRECISION),
            members: Vec::new(),
        }
    }

    /// Add a member feature by name. Registering the same name twice is
    /// permitted.
    pub fn register(&mut self, feature: impl Into<String>) {
        self.members.push(feature.into());
    }

    /// Add a member while consuming `self`, enabling chaining.
    #[must_use]
    pub fn with_member(mut self, feature: impl Into<String>) -> Self {
        self.register(feature);
        self
    }

    /// Member feature names in registration order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Report whether any member matches `element`.
    pub fn matches<E, L>(&self, element: &E, lookup: &L) -> bool
    where
        E: Element + ?Sized,
        L: FeatureLookup + ?Sized,
    {
        let mut path = vec![self.name()];
        self.matches_on_path(element, lookup, &mut path)
    }

    fn matches_on_path<'a, E, L>(
        &'a self,
        element: &E,
        lookup: &'a L,
        path: &mut Vec<&'a str>,
    ) -> bool
    where
        E: Element + ?Sized,
        L: FeatureLookup + ?Sized,
    {
        self.members.iter().any(|member| {
            if path.contains(&member.as_str()) {
                debug!("category '{}' skips cyclic member '{member}'", self.name());
                return false;
            }
            match lookup.lookup(member) {
                None => {
                    debug!("category '{}' has unknown member '{member}'", self.name());
                    false
                }
                Some(Feature::Category(inner)) => {
                    path.push(inner.name());
                    let found = inner.matches_on_path(element, lookup, path);
                    path.pop();
                    found
                }
                Some(leaf) => leaf.is_match(element, lookup),
            }
        })
    }
}

impl FeatureBase for FeatureCategory {
    fn info(&self) -> &FeatureInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut FeatureInfo {
        &mut self.info
    }
}
