//! Aggregates of matches.
//!
//! [`MatchGroup`] collects every match for one element and scores the group
//! by its weakest member. [`group_by_feature`] goes the other way and
//! gathers elements that share a feature, which is what a change summary
//! ("three cafes and a war memorial") is built from.

use std::cmp::Reverse;

use thiserror::Error;

use crate::{Feature, FeatureBase, Match};

/// Errors returned by [`MatchGroup::new`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MatchGroupError {
    /// No matches were supplied.
    #[error("match group must contain at least one match")]
    Empty,
}

/// A non-empty, ordered collection of matches.
///
/// # Examples
/// ```
/// use tagwise_core::{MatchGroup, MatchGroupError};
///
/// assert_eq!(MatchGroup::new(Vec::new()).unwrap_err(), MatchGroupError::Empty);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup<'db> {
    first: Match<'db>,
    rest: Vec<Match<'db>>,
}

impl<'db> MatchGroup<'db> {
    /// Validates and constructs a [`MatchGroup`].
    ///
    /// # Errors
    /// Returns [`MatchGroupError::Empty`] when `matches` is empty.
    pub fn new(matches: Vec<Match<'db>>) -> Result<Self, MatchGroupError> {
        let mut iter = matches.into_iter();
        let first = iter.next().ok_or(MatchGroupError::Empty)?;
        Ok(Self {
            first,
            rest: iter.collect(),
        })
    }

    /// Iterate over the matches in order.
    pub fn iter(&self) -> impl Iterator<Item = &Match<'db>> {
        std::iter::once(&self.first).chain(&self.rest)
    }

    /// Number of matches in the group.
    #[expect(
        clippy::len_without_is_empty,
        reason = "groups are non-empty by construction"
    )]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// The group's salience: the minimum prominence of its members.
    #[must_use]
    pub fn prominence(&self) -> i32 {
        self.rest
            .iter()
            .map(Match::prominence)
            .fold(self.first.prominence(), i32::min)
    }

    /// The maximum specificity of its members.
    #[must_use]
    pub fn specificity(&self) -> i32 {
        self.rest
            .iter()
            .map(Match::specificity)
            .fold(self.first.specificity(), i32::max)
    }

    /// The highest-precision member; the earliest wins ties.
    #[must_use]
    pub fn best(&self) -> &Match<'db> {
        self.rest.iter().fold(&self.first, |best, candidate| {
            if candidate.precision() > best.precision() {
                candidate
            } else {
                best
            }
        })
    }

    /// Consume the group and return its matches in order.
    #[must_use]
    pub fn into_inner(self) -> Vec<Match<'db>> {
        let mut matches = Vec::with_capacity(self.len());
        matches.push(self.first);
        matches.extend(self.rest);
        matches
    }
}

impl<'db> IntoIterator for MatchGroup<'db> {
    type Item = Match<'db>;
    type IntoIter = std::vec::IntoIter<Match<'db>>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_inner().into_iter()
    }
}

/// Elements sharing a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGroup<'db> {
    /// The shared feature.
    pub feature: &'db Feature,
    /// Indices of the member elements in the input, ascending.
    pub elements: Vec<usize>,
}

/// Group elements by shared feature.
///
/// `per_element` holds each element's matches, best first, as returned by
/// [`FeatureDb::match_all`](crate::FeatureDb::match_all). Elements with the
/// most matches are considered first; each round takes the best feature of
/// the first ungrouped element and claims every ungrouped element that also
/// matched it. Groups are returned largest first, ties in creation order.
/// Elements without matches are left out.
#[must_use]
pub fn group_by_feature<'db>(per_element: &[Vec<Match<'db>>]) -> Vec<FeatureGroup<'db>> {
    let mut pending: Vec<(usize, &Vec<Match<'db>>)> = per_element
        .iter()
        .enumerate()
        .filter(|(_, matches)| !matches.is_empty())
        .collect();
    pending.sort_by_key(|(_, matches)| Reverse(matches.len()));

    let mut groups = Vec::new();
    while let Some(feature) = pending
        .first()
        .and_then(|(_, matches)| matches.first())
        .map(Match::feature)
    {
        let shares_feature = |matches: &Vec<Match<'db>>| {
            matches.iter().any(|m| m.feature().name() == feature.name())
        };
        let mut elements: Vec<usize> = pending
            .iter()
            .filter(|(_, matches)| shares_feature(matches))
            .map(|(index, _)| *index)
            .collect();
        elements.sort_unstable();
        pending.retain(|(_, matches)| !shares_feature(matches));
        groups.push(FeatureGroup { feature, elements });
    }
    groups.sort_by_key(|group| Reverse(group.elements.len()));
    groups
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{Element, ElementType, OsmElement, SimpleFeature, TagSpec};
    use rstest::{fixture, rstest};

    #[fixture]
    fn features() -> Vec<Feature> {
        let mut amenity = SimpleFeature::new("amenity").with_tag(TagSpec::key("amenity"));
        amenity.allow_type(ElementType::Node);
        amenity.set_precision(1);
        let mut cafe = SimpleFeature::new("cafe").with_tag(TagSpec::key_value("amenity", "cafe"));
        cafe.allow_type(ElementType::Node);
        cafe.set_precision(5);
        let mut named = SimpleFeature::new("named thing").with_tag(TagSpec::key("name"));
        named.allow_type(ElementType::Node);
        named.set_precision(5);
        vec![amenity.into(), cafe.into(), named.into()]
    }

    fn matches_for<'db>(features: &'db [Feature], element: &impl Element) -> Vec<Match<'db>> {
        let lookup: HashMap<String, Feature> = HashMap::new();
        features
            .iter()
            .filter_map(|feature| feature.match_element(element, &lookup))
            .collect()
    }

    fn node(pairs: &[(&str, &str)]) -> OsmElement {
        pairs
            .iter()
            .fold(OsmElement::new(1, ElementType::Node), |element, (k, v)| {
                element.with_tag(*k, *v)
            })
    }

    #[rstest]
    fn prominence_is_the_minimum(features: Vec<Feature>) {
        let element = node(&[("amenity", "cafe"), ("name", "Joe's")]);
        let group = MatchGroup::new(matches_for(&features, &element)).expect("non-empty");
        assert_eq!(group.len(), 3);
        let lowest = group.iter().map(Match::prominence).min();
        assert_eq!(Some(group.prominence()), lowest);
    }

    #[rstest]
    fn prominence_of_mixed_group(mut features: Vec<Feature>) {
        if let Some(first) = features.first_mut() {
            first.set_prominence(10);
        }
        let element = node(&[("amenity", "cafe")]);
        let group = MatchGroup::new(matches_for(&features, &element)).expect("non-empty");
        // amenity: 10 + 1, cafe: 0 + 1.
        assert_eq!(group.prominence(), 1);
    }

    #[rstest]
    fn best_prefers_precision_then_order(features: Vec<Feature>) {
        let element = node(&[("amenity", "cafe"), ("name", "Joe's")]);
        let group = MatchGroup::new(matches_for(&features, &element)).expect("non-empty");
        assert_eq!(group.best().feature().name(), "cafe");
        assert_eq!(group.specificity(), 20);
    }

    #[rstest]
    fn empty_group_is_rejected() {
        assert_eq!(MatchGroup::new(Vec::new()), Err(MatchGroupError::Empty));
    }

    #[rstest]
    fn into_inner_preserves_order(features: Vec<Feature>) {
        let element = node(&[("amenity", "cafe")]);
        let group = MatchGroup::new(matches_for(&features, &element)).expect("non-empty");
        let names: Vec<_> = group
            .into_inner()
            .iter()
            .map(|m| m.feature().name().to_owned())
            .collect();
        assert_eq!(names, ["amenity", "cafe"]);
    }

    #[rstest]
    fn groups_elements_by_shared_feature(features: Vec<Feature>) {
        let elements = [
            node(&[("amenity", "bank")]),
            node(&[("amenity", "cafe")]),
            node(&[("highway", "stop")]),
            node(&[("amenity", "cafe")]),
        ];
        let per_element: Vec<_> = elements
            .iter()
            .map(|element| {
                let mut found = matches_for(&features, element);
                found.sort_by_key(|m| Reverse(m.precision()));
                found
            })
            .collect();

        let groups = group_by_feature(&per_element);
        let summary: Vec<_> = groups
            .iter()
            .map(|group| (group.feature.name(), group.elements.clone()))
            .collect();
        assert_eq!(summary, vec![("cafe", vec![1, 3]), ("amenity", vec![0])]);
    }
}
