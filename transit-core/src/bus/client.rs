//! Bus tracker HTTP client.
//!
//! One outbound call per invocation; no retries and no caching here.
//! Caching is strictly the resource service's responsibility layered above.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::TransitError;

use super::types::{
    BusDirectionsResponse, BusPatternsResponse, BusPredictionsResponse, BusRoutesResponse,
    BusStopsResponse, BusVehiclesResponse,
};

/// Default base URL for the bus tracker API.
const DEFAULT_BASE_URL: &str = "http://www.ctabustracker.com/bustime/api/v2";

/// Configuration for the bus client.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// API key, sent as the `key` query parameter.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl BusConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// The calls a bus upstream must answer. Implemented by [`BusClient`] and
/// by in-memory doubles in service tests.
#[async_trait]
pub trait BusApi {
    async fn get_routes(&self) -> Result<BusRoutesResponse, TransitError>;
    async fn get_vehicles(&self, routes: &str) -> Result<BusVehiclesResponse, TransitError>;
    async fn get_patterns(&self, route: &str) -> Result<BusPatternsResponse, TransitError>;
    async fn get_predictions(&self, stop_id: &str) -> Result<BusPredictionsResponse, TransitError>;
    async fn get_directions(&self, route: &str) -> Result<BusDirectionsResponse, TransitError>;
    async fn get_stops(
        &self,
        route: &str,
        direction: &str,
    ) -> Result<BusStopsResponse, TransitError>;
}

/// Bus tracker API client.
#[derive(Debug, Clone)]
pub struct BusClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BusClient {
    /// Create a new bus client with the given configuration.
    pub fn new(config: BusConfig) -> Result<Self, TransitError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, TransitError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "bus upstream request");

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("format", "json")])
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TransitError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransitError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TransitError::malformed_body(e, &body))
    }
}

#[async_trait]
impl BusApi for BusClient {
    async fn get_routes(&self) -> Result<BusRoutesResponse, TransitError> {
        self.request("/getroutes", &[]).await
    }

    async fn get_vehicles(&self, routes: &str) -> Result<BusVehiclesResponse, TransitError> {
        self.request("/getvehicles", &[("rt", routes)]).await
    }

    async fn get_patterns(&self, route: &str) -> Result<BusPatternsResponse, TransitError> {
        self.request("/getpatterns", &[("rt", route)]).await
    }

    async fn get_predictions(&self, stop_id: &str) -> Result<BusPredictionsResponse, TransitError> {
        self.request("/getpredictions", &[("stpid", stop_id)]).await
    }

    async fn get_directions(&self, route: &str) -> Result<BusDirectionsResponse, TransitError> {
        self.request("/getdirections", &[("rt", route)]).await
    }

    async fn get_stops(
        &self,
        route: &str,
        direction: &str,
    ) -> Result<BusStopsResponse, TransitError> {
        self.request("/getstops", &[("rt", route), ("dir", direction)])
            .await
    }
}
