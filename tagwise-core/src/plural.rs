//! English pluralisation of feature names.
//!
//! Multi-word names inflect their final word only, so `"war memorial"`
//! becomes `"war memorials"` and `"man made feature"` becomes
//! `"man made features"`. A prepositional phrase is left alone and the word
//! before it inflected instead: `"point of interest"` becomes
//! `"points of interest"`.

/// Words with the same singular and plural form.
const UNCOUNTABLE: &[&str] = &[
    "aircraft",
    "deer",
    "equipment",
    "fish",
    "information",
    "series",
    "sheep",
    "species",
];

/// Irregular singular/plural pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

/// Words ending in `f`/`fe` that take `ves`.
const F_TO_VES: &[(&str, &str)] = &[
    ("calf", "calves"),
    ("half", "halves"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("loaf", "loaves"),
    ("shelf", "shelves"),
    ("thief", "thieves"),
    ("wife", "wives"),
    ("wolf", "wolves"),
];

/// Words ending in `o` that take `es`.
const O_TO_OES: &[&str] = &["echo", "hero", "potato", "tomato", "torpedo", "veto"];

/// Words that open a trailing prepositional phrase.
const PREPOSITIONS: &[&str] = &["at", "by", "for", "in", "of", "on", "under", "with"];

/// Return the plural of `name`.
///
/// # Examples
/// ```
/// use tagwise_core::pluralize;
///
/// assert_eq!(pluralize("cafe"), "cafes");
/// assert_eq!(pluralize("war memorial"), "war memorials");
/// assert_eq!(pluralize("library"), "libraries");
/// assert_eq!(pluralize("place of worship"), "places of worship");
/// ```
#[must_use]
pub fn pluralize(name: &str) -> String {
    match split_at_preposition(name) {
        Some((head, phrase)) => format!("{}{phrase}", pluralize_compound(head)),
        None => pluralize_compound(name),
    }
}

fn pluralize_compound(name: &str) -> String {
    match name.rsplit_once(' ') {
        Some((head, last)) => format!("{head} {}", pluralize_word(last)),
        None => pluralize_word(name),
    }
}

/// Split before the first space that opens a prepositional phrase.
fn split_at_preposition(name: &str) -> Option<(&str, &str)> {
    let index = name
        .match_indices(' ')
        .map(|(index, _)| index)
        .find(|&index| {
            name.get(index + 1..)
                .and_then(|rest| rest.split(' ').next())
                .is_some_and(|word| PREPOSITIONS.contains(&word))
        })?;
    Some((name.get(..index)?, name.get(index..)?))
}

fn pluralize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_owned();
    }
    if let Some(plural) = lookup(IRREGULAR, &lower).or_else(|| lookup(F_TO_VES, &lower)) {
        return match_leading_case(word, plural);
    }
    if let Some(stem) = word.strip_suffix("sis") {
        return format!("{stem}ses");
    }
    if let Some(stem) = word.strip_suffix('y')
        && stem.chars().last().is_some_and(is_consonant)
    {
        return format!("{stem}ies");
    }
    if O_TO_OES.contains(&lower.as_str()) || takes_es(&lower) {
        return format!("{word}es");
    }
    format!("{word}s")
}

fn lookup(table: &[(&str, &'static str)], word: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(singular, _)| *singular == word)
        .map(|(_, plural)| *plural)
}

fn takes_es(word: &str) -> bool {
    ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
}

const fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

fn match_leading_case(original: &str, plural: &str) -> String {
    let capitalised = original.chars().next().is_some_and(char::is_uppercase);
    if !capitalised {
        return plural.to_owned();
    }
    let mut chars = plural.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cafe", "cafes")]
    #[case("bus stop", "bus stops")]
    #[case("church", "churches")]
    #[case("bench", "benches")]
    #[case("box", "boxes")]
    #[case("bus", "buses")]
    #[case("library", "libraries")]
    #[case("subway", "subways")]
    #[case("hero", "heroes")]
    #[case("piano", "pianos")]
    #[case("shelf", "shelves")]
    #[case("man made feature", "man made features")]
    #[case("fire station man", "fire station men")]
    #[case("analysis", "analyses")]
    #[case("sheep", "sheep")]
    #[case("Person", "People")]
    #[case("unidentified object", "unidentified objects")]
    #[case("point of interest", "points of interest")]
    #[case("place of worship", "places of worship")]
    #[case("bench with a view", "benches with a view")]
    #[case("fire station of the city watch", "fire stations of the city watch")]
    #[case("man in the moon", "men in the moon")]
    fn pluralizes(#[case] singular: &str, #[case] expected: &str) {
        assert_eq!(pluralize(singular), expected);
    }

    #[rstest]
    fn empty_name_stays_empty() {
        assert_eq!(pluralize(""), "");
    }
}
