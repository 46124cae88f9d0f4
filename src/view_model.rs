//! Serializable view data handed to the front end.
//!
//! These structs carry exactly what a renderer needs and nothing it has to
//! derive itself: labels are pre-formatted and favorite flags are resolved.

use serde::{Deserialize, Serialize};

use crate::country_model::{Continent, Country};

pub const SELECT_CONTINENT_LABEL: &str = "Select a continent";
pub const NO_COUNTRIES_MESSAGE: &str = "No countries found. Try another name or continent.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentOption {
    pub value: String,
    pub label: String,
}

impl ContinentOption {
    pub fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: SELECT_CONTINENT_LABEL.to_string(),
        }
    }
}

impl From<&Continent> for ContinentOption {
    fn from(continent: &Continent) -> Self {
        Self {
            value: continent.code.clone(),
            label: continent.option_label(),
        }
    }
}

/// One tile of the country grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCard {
    pub code: String,
    pub name: String,
    pub emoji: String,
    pub capital: Option<String>,
    pub currency: Option<String>,
    /// Empty when no language has a name.
    pub languages: String,
    pub is_favorite: bool,
}

impl CountryCard {
    pub fn new(country: &Country, is_favorite: bool) -> Self {
        Self {
            code: country.code.clone(),
            name: country.name.clone(),
            emoji: country.emoji.clone(),
            capital: country.capital.clone().filter(|c| !c.is_empty()),
            currency: country.currency.clone().filter(|c| !c.is_empty()),
            languages: country.language_names(),
            is_favorite,
        }
    }
}

/// Contents of the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDetail {
    #[serde(flatten)]
    pub card: CountryCard,
    pub flag_url: String,
}

impl CountryDetail {
    pub fn new(country: &Country, is_favorite: bool) -> Self {
        Self {
            card: CountryCard::new(country, is_favorite),
            flag_url: country.flag_url(),
        }
    }
}

/// A full render pass worth of state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerView {
    pub selected_continent: String,
    pub search: String,
    pub continent_options: Vec<ContinentOption>,
    pub continents_loading: bool,
    pub continents_error: Option<String>,
    pub countries_loading: bool,
    pub countries_error: Option<String>,
    /// `"Countries in <name>"`, with an em dash when no continent is loaded.
    pub heading: String,
    /// `"Showing X of Y countries"`.
    pub summary: String,
    pub empty_message: Option<String>,
    pub countries: Vec<CountryCard>,
    pub favorites_count: usize,
    pub selected_country: Option<CountryDetail>,
}
