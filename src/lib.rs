//! # Countries Explorer Core
//!
//! The offline-first core of a countries explorer. A front end (Flutter, a web
//! view, a desktop shell) renders; this library owns everything else:
//!
//! - **Favorites**: a set of country codes persisted as one JSON slot in LMDB,
//!   surviving restarts and failing soft on corrupted data
//! - **Composition**: case-insensitive search and alphabetical ordering of the
//!   countries of the selected continent
//! - **Data access**: the two read queries of the public countries GraphQL API
//! - **View state**: selection, search, query states and pre-formatted view data
//!
//! ## Quick Start
//!
//! ```no_run
//! use countries_explorer_core::{create_explorer, load_continents, load_countries, select_continent, set_search};
//! use std::ffi::CString;
//!
//! let config = CString::new(r#"{"db_path": "countries_explorer"}"#).unwrap();
//! let explorer = create_explorer(config.as_ptr());
//!
//! // The default continent starts pending; fetch it once on start-up.
//! load_continents(explorer);
//! load_countries(explorer);
//!
//! let continent = CString::new("EU").unwrap();
//! select_continent(explorer, continent.as_ptr());
//!
//! let search = CString::new("ger").unwrap();
//! let view = set_search(explorer, search.as_ptr());
//! ```
//!
//! ## FFI Functions
//!
//! Every function except [`create_explorer`] and [`free_response`] returns a
//! JSON-encoded [`AppResponse`]; successful payloads are themselves JSON inside
//! the `Ok` variant. Release returned strings with [`free_response`].
//!
//! - [`create_explorer`] - Build an explorer from a JSON configuration
//! - [`load_continents`] - Fetch the continent list
//! - [`load_countries`] - Fetch the countries of the selected continent
//! - [`select_continent`] - Change continent and fetch its countries
//! - [`set_search`] - Update the search text
//! - [`get_view`] - Current view snapshot
//! - [`toggle_favorite`] / [`is_favorite`] / [`get_favorites`] - Favorites
//! - [`open_country`] / [`close_country`] - Detail panel
//! - [`close_explorer`] - Release the explorer

pub mod app_response;
pub mod composer;
pub mod config;
pub mod countries_api;
pub mod country_model;
pub mod explorer;
pub mod favorites;
pub mod http_client;
pub mod local_db_state;
pub mod storage;
pub mod view_model;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use serde::Serialize;

pub use crate::app_response::AppResponse;
use crate::config::ExplorerConfig;
use crate::countries_api::CountriesApi;
use crate::explorer::Explorer;
use crate::favorites::FavoritesStore;
use crate::http_client::HttpCountriesApi;
use crate::local_db_state::AppDbState;
use crate::storage::{KeyValueStorage, MemoryStorage};

/// An explorer together with the API it fetches from.
///
/// This is the object behind the opaque pointer handed out by
/// [`create_explorer`]; Rust callers can use it directly.
pub struct ExplorerHandle {
    pub explorer: Explorer,
    api: Box<dyn CountriesApi>,
}

impl ExplorerHandle {
    /// Opens storage, loads favorites and builds the HTTP client.
    pub fn open(config: &ExplorerConfig) -> Result<Self, AppResponse> {
        let api = HttpCountriesApi::new(config)?;
        Self::with_api(config, Box::new(api))
    }

    /// Like [`ExplorerHandle::open`] with a caller supplied API.
    pub fn with_api(config: &ExplorerConfig, api: Box<dyn CountriesApi>) -> Result<Self, AppResponse> {
        config.validate()?;

        let storage: Box<dyn KeyValueStorage> = match &config.db_path {
            Some(path) => Box::new(AppDbState::init(path.clone())?),
            None => {
                info!("No db_path configured; favorites will not outlive this explorer");
                Box::new(MemoryStorage::new())
            }
        };

        let favorites = FavoritesStore::initialize(storage, config.storage_key.clone());
        let explorer = Explorer::new(favorites, config.default_continent.clone());
        Ok(Self { explorer, api })
    }

    pub fn load_continents(&mut self) {
        self.explorer.refresh_continents(self.api.as_ref());
    }

    pub fn load_countries(&mut self) {
        self.explorer.refresh_countries(self.api.as_ref());
    }

    /// Selects a continent and fetches its countries when needed.
    pub fn select_continent(&mut self, code: &str) {
        if self.explorer.select_continent(code) {
            self.load_countries();
        }
    }
}

/// Creates an explorer from a JSON configuration (see [`ExplorerConfig`]).
///
/// A null pointer or an empty string selects the defaults. Returns a null
/// pointer when the configuration is invalid or storage cannot be opened.
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use countries_explorer_core::create_explorer;
///
/// let config = CString::new(r#"{"db_path": "explorer", "default_continent": "EU"}"#).unwrap();
/// let explorer = create_explorer(config.as_ptr());
/// assert!(!explorer.is_null());
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_explorer(config_json: *const c_char) -> *mut ExplorerHandle {
    let raw = if config_json.is_null() {
        String::new()
    } else {
        match unsafe { CStr::from_ptr(config_json).to_str() } {
            Ok(s) => s.to_string(),
            Err(e) => {
                warn!("Invalid UTF-8 in explorer configuration: {e}");
                return std::ptr::null_mut();
            }
        }
    };

    let config = match ExplorerConfig::from_json(&raw) {
        Ok(config) => config,
        Err(e) => {
            warn!("❌ Rejected explorer configuration: {e}");
            return std::ptr::null_mut();
        }
    };

    match ExplorerHandle::open(&config) {
        Ok(handle) => {
            info!("✅ Explorer ready (endpoint {}, continent {:?})", config.endpoint, config.default_continent);
            Box::into_raw(Box::new(handle))
        }
        Err(e) => {
            warn!("❌ Failed to create explorer: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Fetches the continent list.
///
/// Returns the continents on success. On failure the error envelope is
/// returned and the view reports `continents_error`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn load_continents(handle: *mut ExplorerHandle) -> *const c_char {
    let handle = match unsafe { handle.as_mut() } {
        Some(h) => h,
        None => return bad_request("Null explorer pointer passed to load_continents"),
    };

    handle.load_continents();
    match handle.explorer.continents().data() {
        Some(continents) => ok_json(continents),
        None => match handle.explorer.continents().error() {
            Some(err) => response_to_c_string(err),
            None => response_to_c_string(&AppResponse::NetworkError("Continents query did not settle".to_string())),
        },
    }
}

/// Fetches the countries of the selected continent and returns the view.
///
/// Hosts call this once after [`create_explorer`], since the default
/// continent is only marked pending there. Also usable as a manual retry
/// after a failed fetch; failures show up in the view's `countries_error`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn load_countries(handle: *mut ExplorerHandle) -> *const c_char {
    let handle = match unsafe { handle.as_mut() } {
        Some(h) => h,
        None => return bad_request("Null explorer pointer passed to load_countries"),
    };

    handle.load_countries();
    ok_json(&handle.explorer.snapshot())
}

/// Selects a continent (empty string clears the selection) and returns the
/// resulting view.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn select_continent(handle: *mut ExplorerHandle, code: *const c_char) -> *const c_char {
    let handle = match unsafe { handle.as_mut() } {
        Some(h) => h,
        None => return bad_request("Null explorer pointer passed to select_continent"),
    };

    let code = match c_ptr_to_string(code, "continent code") {
        Ok(code) => code,
        Err(err) => return err,
    };

    handle.select_continent(&code);
    ok_json(&handle.explorer.snapshot())
}

/// Replaces the search text and returns the resulting view.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn set_search(handle: *mut ExplorerHandle, search: *const c_char) -> *const c_char {
    let handle = match unsafe { handle.as_mut() } {
        Some(h) => h,
        None => return bad_request("Null explorer pointer passed to set_search"),
    };

    let search = match c_ptr_to_string(search, "search") {
        Ok(search) => search,
        Err(err) => return err,
    };

    handle.explorer.set_search(search);
    ok_json(&handle.explorer.snapshot())
}

/// Returns the current view without changing anything.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_view(handle: *mut ExplorerHandle) -> *const c_char {
    match unsafe { handle.as_ref() } {
        Some(h) => ok_json(&h.explorer.snapshot()),
        None => bad_request("Null explorer pointer passed to get_view"),
    }
}

/// Toggles a favorite and persists the set.
///
/// Success payload: `{"code": "AR", "is_favorite": true}`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn toggle_favorite(handle: *mut ExplorerHandle, code: *const c_char) -> *const c_char {
    let handle = match unsafe { handle.as_mut() } {
        Some(h) => h,
        None => return bad_request("Null explorer pointer passed to toggle_favorite"),
    };

    let code = match c_ptr_to_string(code, "country code") {
        Ok(code) => code,
        Err(err) => return err,
    };

    match handle.explorer.toggle_favorite(&code) {
        Ok(is_favorite) => ok_json(&serde_json::json!({ "code": code, "is_favorite": is_favorite })),
        Err(e) => response_to_c_string(&e),
    }
}

/// Success payload: `true` or `false`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn is_favorite(handle: *mut ExplorerHandle, code: *const c_char) -> *const c_char {
    let handle = match unsafe { handle.as_ref() } {
        Some(h) => h,
        None => return bad_request("Null explorer pointer passed to is_favorite"),
    };

    let code = match c_ptr_to_string(code, "country code") {
        Ok(code) => code,
        Err(err) => return err,
    };

    ok_json(&handle.explorer.is_favorite(&code))
}

/// Success payload: the favorite codes as a JSON array, in insertion order.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_favorites(handle: *mut ExplorerHandle) -> *const c_char {
    match unsafe { handle.as_ref() } {
        Some(h) => ok_json(h.explorer.favorites().favorites()),
        None => bad_request("Null explorer pointer passed to get_favorites"),
    }
}

/// Opens the detail panel. Success payload: the [`view_model::CountryDetail`].
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn open_country(handle: *mut ExplorerHandle, code: *const c_char) -> *const c_char {
    let handle = match unsafe { handle.as_mut() } {
        Some(h) => h,
        None => return bad_request("Null explorer pointer passed to open_country"),
    };

    let code = match c_ptr_to_string(code, "country code") {
        Ok(code) => code,
        Err(err) => return err,
    };

    match handle.explorer.open_country(&code) {
        Ok(detail) => ok_json(&detail),
        Err(e) => response_to_c_string(&e),
    }
}

/// Closes the detail panel and returns the resulting view.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_country(handle: *mut ExplorerHandle) -> *const c_char {
    match unsafe { handle.as_mut() } {
        Some(h) => {
            h.explorer.close_country();
            ok_json(&h.explorer.snapshot())
        }
        None => bad_request("Null explorer pointer passed to close_country"),
    }
}

/// Releases a string returned by any other function of this library.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(response: *mut c_char) {
    if response.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(response) });
}

/// Destroys an explorer. The pointer must not be used afterwards.
///
/// Favorites are already on disk after every toggle, so nothing is flushed
/// here beyond closing the LMDB environment.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_explorer(handle: *mut ExplorerHandle) -> *const c_char {
    if handle.is_null() {
        return bad_request("Null explorer pointer passed to close_explorer");
    }

    drop(unsafe { Box::from_raw(handle) });
    info!("Explorer closed");
    response_to_c_string(&AppResponse::success("Explorer closed successfully"))
}

/// Wraps a serializable payload in `AppResponse::Ok`.
fn ok_json<T: Serialize + ?Sized>(payload: &T) -> *const c_char {
    match serde_json::to_string(payload) {
        Ok(json) => response_to_c_string(&AppResponse::Ok(json)),
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Failed to serialize result: {e}"));
            response_to_c_string(&error)
        }
    }
}

fn bad_request(message: &str) -> *const c_char {
    response_to_c_string(&AppResponse::BadRequest(message.to_string()))
}

/// Converts an [`AppResponse`] to a heap allocated C string.
///
/// Returns a null pointer if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Reads a C string argument, producing a ready-made error response on
/// failure.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
