//! Favorite countries, persisted as a JSON array under one storage slot.
//!
//! [`FavoriteSet`] is the pure value: membership plus a symmetric toggle.
//! [`FavoritesStore`] binds a set to a [`KeyValueStorage`] slot and rewrites
//! the whole slot after every mutation.
//!
//! Codes are never pruned. A favorited country that no longer appears in any
//! fetched continent simply stays in the set.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::storage::KeyValueStorage;

/// Slot name used when the configuration does not provide one.
pub const DEFAULT_STORAGE_KEY: &str = "graphql-countries-favs";

/// A duplicate-free collection of country codes, kept in insertion order.
///
/// The order only matters for the serialized form; equality is by membership.
///
/// # Examples
///
/// ```rust
/// use countries_explorer_core::favorites::FavoriteSet;
///
/// let set = FavoriteSet::new().toggle("AR");
/// assert!(set.is_favorite("AR"));
///
/// let set = set.toggle("AR");
/// assert!(set.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FavoriteSet {
    codes: Vec<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new set with `code` removed if present, added otherwise.
    #[must_use]
    pub fn toggle(&self, code: &str) -> Self {
        let codes = if self.is_favorite(code) {
            self.codes.iter().filter(|c| c.as_str() != code).cloned().collect()
        } else {
            let mut codes = self.codes.clone();
            codes.push(code.to_string());
            codes
        };
        Self { codes }
    }

    pub fn is_favorite(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in insertion order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Parses a persisted slot. Anything other than a JSON array of strings
    /// yields `None`.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str::<Vec<String>>(raw).ok().map(Self::from)
    }

    pub fn to_json(&self) -> Result<String, AppResponse> {
        serde_json::to_string(&self.codes).map_err(AppResponse::from)
    }
}

impl From<Vec<String>> for FavoriteSet {
    fn from(raw: Vec<String>) -> Self {
        let mut codes: Vec<String> = Vec::with_capacity(raw.len());
        for code in raw {
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        Self { codes }
    }
}

impl From<FavoriteSet> for Vec<String> {
    fn from(set: FavoriteSet) -> Self {
        set.codes
    }
}

impl PartialEq for FavoriteSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.codes.iter().all(|c| other.is_favorite(c))
    }
}

impl Eq for FavoriteSet {}

/// A [`FavoriteSet`] bound to one persistent slot.
pub struct FavoritesStore {
    storage: Box<dyn KeyValueStorage>,
    storage_key: String,
    favorites: FavoriteSet,
}

impl FavoritesStore {
    /// Loads the set from `storage_key`.
    ///
    /// Never fails: a missing slot, an unreadable slot or a value that is not a
    /// JSON array of strings all start the store empty.
    pub fn initialize(storage: Box<dyn KeyValueStorage>, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();

        let favorites = match storage.get(&storage_key) {
            Ok(Some(raw)) => FavoriteSet::from_json(&raw).unwrap_or_else(|| {
                warn!("Favorites slot {} is not a JSON array of codes; starting empty", storage_key);
                FavoriteSet::new()
            }),
            Ok(None) => FavoriteSet::new(),
            Err(e) => {
                warn!("Could not read favorites slot {}: {}; starting empty", storage_key, e);
                FavoriteSet::new()
            }
        };

        info!("Loaded {} favorites from {}", favorites.len(), storage_key);
        Self {
            storage,
            storage_key,
            favorites,
        }
    }

    /// Toggles `code` and rewrites the slot with the full set.
    ///
    /// The in-memory set is updated even if the write fails; the error is
    /// returned so the caller can report it.
    pub fn toggle(&mut self, code: &str) -> Result<bool, AppResponse> {
        self.favorites = self.favorites.toggle(code);
        let now_favorite = self.favorites.is_favorite(code);
        debug!("Favorite {} -> {}", code, now_favorite);

        self.persist()?;
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, code: &str) -> bool {
        self.favorites.is_favorite(code)
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn count(&self) -> usize {
        self.favorites.len()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn storage(&self) -> &dyn KeyValueStorage {
        self.storage.as_ref()
    }

    fn persist(&self) -> Result<(), AppResponse> {
        let json = self.favorites.to_json()?;
        self.storage.set(&self.storage_key, &json).map_err(|e| {
            warn!("Failed to persist favorites to {}: {}", self.storage_key, e);
            e
        })
    }
}
