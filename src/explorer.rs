//! Explorer state: the single owner of everything the view reads.
//!
//! Inputs arrive through `&mut self` methods and the visible list is
//! recomputed on demand, so there is no hidden reactivity. Fetching is split
//! into "mark pending" ([`Explorer::select_continent`]) and "apply result"
//! ([`Explorer::apply_countries`]) so a host can run requests wherever it
//! likes; [`Explorer::refresh_countries`] does both synchronously.

use log::{debug, info, warn};

use crate::app_response::AppResponse;
use crate::composer::compose;
use crate::countries_api::{CountriesApi, QueryState};
use crate::country_model::{Continent, ContinentCountries, Country};
use crate::favorites::FavoritesStore;
use crate::view_model::{ContinentOption, CountryCard, CountryDetail, ExplorerView, NO_COUNTRIES_MESSAGE};

pub struct Explorer {
    selected_continent: String,
    search: String,
    selected_country: Option<Country>,
    continents: QueryState<Vec<Continent>>,
    countries: QueryState<Option<ContinentCountries>>,
    favorites: FavoritesStore,
}

impl Explorer {
    /// Both queries start pending, except the countries query when
    /// `default_continent` is empty, which has nothing to fetch.
    pub fn new(favorites: FavoritesStore, default_continent: impl Into<String>) -> Self {
        let selected_continent = default_continent.into();
        let countries = if selected_continent.is_empty() {
            QueryState::Ready(None)
        } else {
            QueryState::Pending
        };

        Self {
            selected_continent,
            search: String::new(),
            selected_country: None,
            continents: QueryState::Pending,
            countries,
            favorites,
        }
    }

    pub fn selected_continent(&self) -> &str {
        &self.selected_continent
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn continents(&self) -> &QueryState<Vec<Continent>> {
        &self.continents
    }

    pub fn countries(&self) -> &QueryState<Option<ContinentCountries>> {
        &self.countries
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// Switches continent. Returns `true` when the countries query has to be
    /// (re)issued for the new selection.
    pub fn select_continent(&mut self, code: &str) -> bool {
        let code = code.trim();
        if code == self.selected_continent {
            return self.countries.is_loading();
        }

        info!("Continent selected: {:?}", code);
        self.selected_continent = code.to_string();

        if code.is_empty() {
            self.countries = QueryState::Ready(None);
            false
        } else {
            self.countries = QueryState::Pending;
            true
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn apply_continents(&mut self, result: Result<Vec<Continent>, AppResponse>) {
        if let Err(e) = &result {
            warn!("Loading continents failed: {}", e);
        }
        self.continents = QueryState::from(result);
    }

    /// Stores a countries result fetched for `code`.
    ///
    /// Results for a continent that is no longer selected are dropped and
    /// `false` is returned.
    pub fn apply_countries(&mut self, code: &str, result: Result<Option<ContinentCountries>, AppResponse>) -> bool {
        if code != self.selected_continent {
            debug!("Discarding countries for {} (selected: {})", code, self.selected_continent);
            return false;
        }
        if let Err(e) = &result {
            warn!("Loading countries for {} failed: {}", code, e);
        }
        self.countries = QueryState::from(result);
        true
    }

    pub fn refresh_continents(&mut self, api: &dyn CountriesApi) {
        self.continents = QueryState::Pending;
        let result = api.fetch_continents();
        self.apply_continents(result);
    }

    pub fn refresh_countries(&mut self, api: &dyn CountriesApi) {
        let code = self.selected_continent.clone();
        if code.is_empty() {
            self.countries = QueryState::Ready(None);
            return;
        }
        self.countries = QueryState::Pending;
        let result = api.fetch_countries_by_continent(&code);
        self.apply_countries(&code, result);
    }

    /// Every country of the loaded continent, in API order.
    pub fn all_countries(&self) -> &[Country] {
        self.countries
            .data()
            .and_then(Option::as_ref)
            .map(|continent| continent.countries.as_slice())
            .unwrap_or_default()
    }

    /// The filtered, sorted list for the current search.
    pub fn visible_countries(&self) -> Vec<Country> {
        compose(self.all_countries(), &self.search)
    }

    pub fn toggle_favorite(&mut self, code: &str) -> Result<bool, AppResponse> {
        self.favorites.toggle(code)
    }

    pub fn is_favorite(&self, code: &str) -> bool {
        self.favorites.is_favorite(code)
    }

    /// Opens the detail panel for a country of the loaded continent.
    ///
    /// The panel keeps its country when the continent changes afterwards.
    pub fn open_country(&mut self, code: &str) -> Result<CountryDetail, AppResponse> {
        let country = self
            .all_countries()
            .iter()
            .find(|country| country.code == code)
            .cloned()
            .ok_or_else(|| AppResponse::NotFound(format!("No country with code {code} in the loaded continent")))?;

        let detail = CountryDetail::new(&country, self.is_favorite(&country.code));
        self.selected_country = Some(country);
        Ok(detail)
    }

    pub fn close_country(&mut self) {
        self.selected_country = None;
    }

    pub fn continent_options(&self) -> Vec<ContinentOption> {
        std::iter::once(ContinentOption::placeholder())
            .chain(
                self.continents
                    .data()
                    .into_iter()
                    .flatten()
                    .map(ContinentOption::from),
            )
            .collect()
    }

    pub fn snapshot(&self) -> ExplorerView {
        let visible = self.visible_countries();
        let total = self.all_countries().len();
        let settled = !self.countries.is_loading() && !self.countries.has_error();

        let continent_name = self
            .countries
            .data()
            .and_then(Option::as_ref)
            .map(|continent| continent.name.as_str())
            .unwrap_or("—");

        let cards: Vec<CountryCard> = if settled {
            visible
                .iter()
                .map(|country| CountryCard::new(country, self.is_favorite(&country.code)))
                .collect()
        } else {
            Vec::new()
        };

        ExplorerView {
            selected_continent: self.selected_continent.clone(),
            search: self.search.clone(),
            continent_options: self.continent_options(),
            continents_loading: self.continents.is_loading(),
            continents_error: self.continents.error_message(),
            countries_loading: self.countries.is_loading(),
            countries_error: self.countries.error_message(),
            heading: format!("Countries in {continent_name}"),
            summary: format!("Showing {} of {} countries", visible.len(), total),
            empty_message: (settled && cards.is_empty()).then(|| NO_COUNTRIES_MESSAGE.to_string()),
            countries: cards,
            favorites_count: self.favorites.count(),
            selected_country: self
                .selected_country
                .as_ref()
                .map(|country| CountryDetail::new(country, self.is_favorite(&country.code))),
        }
    }
}
