//! Read side of the countries GraphQL API.
//!
//! The explorer depends on two queries only, expressed by the
//! [`CountriesApi`] trait. [`crate::http_client::HttpCountriesApi`] runs them
//! over HTTP; tests substitute canned implementations.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::app_response::AppResponse;
use crate::country_model::{Continent, ContinentCountries};

pub const GET_CONTINENTS: &str = r#"query GetContinents {
  continents {
    code
    name
  }
}"#;

pub const GET_COUNTRIES_BY_CONTINENT: &str = r#"query GetCountriesByContinent($code: ID!) {
  continent(code: $code) {
    code
    name
    countries {
      code
      name
      capital
      emoji
      currency
      languages {
        code
        name
      }
    }
  }
}"#;

/// The two read operations the explorer needs.
pub trait CountriesApi: Send + Sync {
    fn fetch_continents(&self) -> Result<Vec<Continent>, AppResponse>;

    /// `Ok(None)` when the API knows no continent with this code.
    fn fetch_countries_by_continent(&self, code: &str) -> Result<Option<ContinentCountries>, AppResponse>;
}

/// POST body of a GraphQL request.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GraphqlRequest {
    pub query: &'static str,
    #[serde(rename = "operationName")]
    pub operation_name: &'static str,
    pub variables: JsonValue,
}

impl GraphqlRequest {
    pub fn continents() -> Self {
        Self {
            query: GET_CONTINENTS,
            operation_name: "GetContinents",
            variables: json!({}),
        }
    }

    pub fn countries_by_continent(code: &str) -> Self {
        Self {
            query: GET_COUNTRIES_BY_CONTINENT,
            operation_name: "GetCountriesByContinent",
            variables: json!({ "code": code }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GraphqlError {
    pub message: String,
}

impl<T> GraphqlResponse<T> {
    /// Resolves the envelope: any reported error fails the whole query, as
    /// does a response with neither data nor errors.
    pub fn into_data(self) -> Result<T, AppResponse> {
        if !self.errors.is_empty() {
            let messages = self
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppResponse::QueryError(messages));
        }

        self.data
            .ok_or_else(|| AppResponse::QueryError("GraphQL response contained no data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct ContinentsData {
    pub continents: Vec<Continent>,
}

#[derive(Debug, Deserialize)]
pub struct ContinentData {
    pub continent: Option<ContinentCountries>,
}

/// Observable state of one query, as the view sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum QueryState<T> {
    Pending,
    Failed(AppResponse),
    Ready(T),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Pending
    }
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    pub fn has_error(&self) -> bool {
        matches!(self, QueryState::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppResponse> {
        match self {
            QueryState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Display form of the failure, for view flags.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }
}

impl<T> From<Result<T, AppResponse>> for QueryState<T> {
    fn from(result: Result<T, AppResponse>) -> Self {
        match result {
            Ok(data) => QueryState::Ready(data),
            Err(e) => QueryState::Failed(e),
        }
    }
}
