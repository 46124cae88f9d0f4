//! Derives the visible country list from a fetched list and the search box.
//!
//! Filtering is a lower-cased substring match on the country name; ordering
//! is a collation that treats accents and case as secondary and tertiary
//! differences, so `"Åland Islands"` lands among the A's instead of after
//! `"Zimbabwe"`.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::country_model::Country;

/// Filters `countries` by `search` and sorts the matches by name.
///
/// The input slice is left untouched. An empty or all-whitespace search keeps
/// every country.
///
/// # Examples
///
/// ```rust
/// use countries_explorer_core::composer::compose;
/// use countries_explorer_core::country_model::Country;
///
/// let country = |code: &str, name: &str| Country {
///     code: code.to_string(),
///     name: name.to_string(),
///     capital: None,
///     emoji: String::new(),
///     currency: None,
///     languages: vec![],
/// };
///
/// let countries = vec![country("BR", "Brazil"), country("AR", "Argentina")];
/// let visible = compose(&countries, "  ARG ");
/// assert_eq!(visible.len(), 1);
/// assert_eq!(visible[0].code, "AR");
/// ```
pub fn compose(countries: &[Country], search: &str) -> Vec<Country> {
    let needle = normalize_search(search);

    let mut visible: Vec<Country> = countries
        .iter()
        .filter(|country| matches_search(country, &needle))
        .cloned()
        .collect();

    visible.sort_by(|a, b| compare_names(&a.name, &b.name));
    visible
}

/// Lower-cases and trims the raw search text.
pub fn normalize_search(search: &str) -> String {
    search.trim().to_lowercase()
}

/// `needle` must already be normalized with [`normalize_search`].
pub fn matches_search(country: &Country, needle: &str) -> bool {
    needle.is_empty() || country.name.to_lowercase().contains(needle)
}

/// Alphabetical comparison of display names.
///
/// Strings are compared first on their base letters (accents removed, case
/// folded), then on accents, then on case with lower case first. Names that
/// are still equal fall back to code point order so the result is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (a_key, b_key) = (CollationKey::new(a), CollationKey::new(b));
    a_key
        .primary
        .cmp(&b_key.primary)
        .then_with(|| a_key.secondary.cmp(&b_key.secondary))
        .then_with(|| a_key.tertiary.cmp(&b_key.tertiary))
        .then_with(|| a.cmp(b))
}

struct CollationKey {
    primary: Vec<char>,
    secondary: Vec<char>,
    tertiary: Vec<u8>,
}

impl CollationKey {
    fn new(name: &str) -> Self {
        let decomposed: Vec<char> = name.nfd().collect();

        let primary = decomposed
            .iter()
            .filter(|c| !is_combining_mark(**c))
            .flat_map(|c| c.to_lowercase())
            .collect();

        let secondary = decomposed.iter().flat_map(|c| c.to_lowercase()).collect();

        let tertiary = decomposed
            .iter()
            .filter(|c| !is_combining_mark(**c))
            .map(|c| u8::from(c.is_uppercase()))
            .collect();

        Self {
            primary,
            secondary,
            tertiary,
        }
    }
}
