//! Explorer configuration, supplied by the host as JSON.
//!
//! Every field has a default, so `{}` is a valid configuration that talks to
//! the public countries endpoint and keeps favorites in memory.
//!
//! ```rust
//! use countries_explorer_core::config::ExplorerConfig;
//!
//! let config = ExplorerConfig::from_json(r#"{"db_path": "explorer", "default_continent": "EU"}"#)?;
//! assert_eq!(config.default_continent, "EU");
//! assert_eq!(config.storage_key, "graphql-countries-favs");
//! # Ok::<(), countries_explorer_core::AppResponse>(())
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::favorites::DEFAULT_STORAGE_KEY;

pub const DEFAULT_ENDPOINT: &str = "https://countries.trevorblades.com/";
pub const DEFAULT_CONTINENT: &str = "SA";
pub const DEFAULT_USER_AGENT: &str = "countries-explorer-core/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// GraphQL endpoint.
    pub endpoint: String,
    /// LMDB location without the `.lmdb` suffix. `None` keeps favorites in
    /// memory for the life of the handle.
    pub db_path: Option<String>,
    pub storage_key: String,
    /// Continent selected when the explorer starts.
    pub default_continent: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            db_path: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_continent: DEFAULT_CONTINENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Parses and validates a JSON configuration. Blank input means defaults.
    pub fn from_json(raw: &str) -> Result<Self, AppResponse> {
        let config: Self = if raw.trim().is_empty() {
            Self::default()
        } else {
            serde_json::from_str(raw)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppResponse> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(AppResponse::ValidationError(format!(
                "Endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }
        if self.storage_key.trim().is_empty() {
            return Err(AppResponse::ValidationError("Storage key cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(AppResponse::ValidationError("Timeout must be at least one second".to_string()));
        }
        if matches!(&self.db_path, Some(path) if path.trim().is_empty()) {
            return Err(AppResponse::ValidationError("Database path cannot be blank".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
