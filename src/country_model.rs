//! Data model definitions for the countries GraphQL API.
//!
//! These records are created fresh from every query response and never mutated
//! in place. Field names follow the GraphQL schema so responses deserialize
//! directly with serde.

use serde::{Deserialize, Serialize};

/// A continent as returned by the `GetContinents` query.
///
/// # Examples
///
/// ```rust
/// use countries_explorer_core::country_model::Continent;
///
/// let continent: Continent = serde_json::from_str(r#"{"code":"SA","name":"South America"}"#)?;
/// assert_eq!(continent.option_label(), "South America (SA)");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Continent {
    /// Two-letter continent code, unique across the result set.
    pub code: String,
    pub name: String,
}

impl Continent {
    /// Label shown in the continent selector, `"name (code)"`.
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

/// A spoken language, embedded in [`Country`].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    /// The API omits names for some language codes.
    #[serde(default)]
    pub name: Option<String>,
}

/// A country record from the `GetCountriesByContinent` query.
///
/// `capital` and `currency` are optional in the schema; several territories
/// have neither.
///
/// # Examples
///
/// ```rust
/// use countries_explorer_core::country_model::Country;
///
/// let json = r#"{
///     "code": "AR",
///     "name": "Argentina",
///     "capital": "Buenos Aires",
///     "emoji": "🇦🇷",
///     "currency": "ARS",
///     "languages": [{"code": "es", "name": "Spanish"}, {"code": "gn", "name": null}]
/// }"#;
///
/// let country: Country = serde_json::from_str(json)?;
/// assert_eq!(country.language_names(), "Spanish");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Country {
    /// Unique within one continent's result set.
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    /// Flag glyph.
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub languages: Vec<Language>,
}

impl Country {
    /// Language names joined with `", "`, skipping languages without a name.
    pub fn language_names(&self) -> String {
        self.languages
            .iter()
            .filter_map(|language| language.name.as_deref())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Small flag image for detail views.
    pub fn flag_url(&self) -> String {
        format!("https://flagcdn.com/w40/{}.png", self.code.to_lowercase())
    }
}

/// Payload of `GetCountriesByContinent`: the continent with its countries.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ContinentCountries {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub countries: Vec<Country>,
}
