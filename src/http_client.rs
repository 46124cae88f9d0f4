//! HTTP implementation of [`CountriesApi`].
//!
//! [`CountriesApi`] is synchronous so the explorer can be driven from a C ABI
//! without an async runtime on the caller's side. The client owns a
//! current-thread Tokio runtime and blocks on it; inside an existing
//! multi-threaded runtime it borrows that runtime through
//! [`tokio::task::block_in_place`] instead. A current-thread runtime cannot be
//! blocked from one of its own tasks, so calls made there fail with
//! [`AppResponse::NetworkError`] and no request is sent.

use std::future::Future;

use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use crate::app_response::AppResponse;
use crate::config::ExplorerConfig;
use crate::countries_api::{ContinentData, ContinentsData, CountriesApi, GraphqlRequest, GraphqlResponse};
use crate::country_model::{Continent, ContinentCountries};

/// Failure to construct an [`HttpCountriesApi`].
#[derive(Debug, thiserror::Error)]
pub enum ApiBuildError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl From<ApiBuildError> for AppResponse {
    fn from(err: ApiBuildError) -> Self {
        AppResponse::NetworkError(err.to_string())
    }
}

pub struct HttpCountriesApi {
    client: Client,
    endpoint: String,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpCountriesApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCountriesApi")
            .field("endpoint", &self.endpoint)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpCountriesApi {
    pub fn new(config: &ExplorerConfig) -> Result<Self, ApiBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            runtime,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(&self, request: GraphqlRequest) -> Result<T, AppResponse> {
        debug!("GraphQL {} -> {}", request.operation_name, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("GraphQL {} failed with HTTP {}", request.operation_name, status);
            return Err(AppResponse::NetworkError(format!(
                "HTTP {} from {}",
                status.as_u16(),
                self.endpoint
            )));
        }

        let body: GraphqlResponse<T> = response.json().await?;
        body.into_data().map_err(|e| {
            warn!("GraphQL {} returned errors: {}", request.operation_name, e);
            e
        })
    }

    fn block_on<T, F>(&self, future: F) -> Result<T, AppResponse>
    where
        F: Future<Output = Result<T, AppResponse>>,
    {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            Ok(_) => {
                warn!("Synchronous countries API called from a current_thread Tokio runtime");
                Err(AppResponse::NetworkError(
                    "Cannot block inside a current_thread Tokio runtime; call from a plain thread or a multi-thread runtime"
                        .to_string(),
                ))
            }
            Err(_) => self.runtime.block_on(future),
        }
    }
}

impl CountriesApi for HttpCountriesApi {
    fn fetch_continents(&self) -> Result<Vec<Continent>, AppResponse> {
        let data: ContinentsData = self.block_on(self.execute(GraphqlRequest::continents()))?;
        Ok(data.continents)
    }

    fn fetch_countries_by_continent(&self, code: &str) -> Result<Option<ContinentCountries>, AppResponse> {
        if code.trim().is_empty() {
            return Ok(None);
        }
        let data: ContinentData = self.block_on(self.execute(GraphqlRequest::countries_by_continent(code)))?;
        Ok(data.continent)
    }
}
