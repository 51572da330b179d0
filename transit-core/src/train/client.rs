//! Train API HTTP client.
//!
//! Same discipline as the bus client: one outbound call per invocation, no
//! retries, no caching.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::TransitError;

use super::types::{
    TrainArrivalsResponse, TrainDirectionsResponse, TrainRoutesResponse, TrainStopsResponse,
};

/// Default base URL for the train API.
const DEFAULT_BASE_URL: &str = "https://lapi.transitchicago.com/api/1.0";

/// Configuration for the train client.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// API key, sent as the `key` query parameter.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl TrainConfig {
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

/// The calls a train upstream must answer. Implemented by [`TrainClient`]
/// and by in-memory doubles in service tests.
#[async_trait]
pub trait TrainApi {
    async fn get_routes(&self) -> Result<TrainRoutesResponse, TransitError>;
    async fn get_arrivals(
        &self,
        station_id: &str,
        route: Option<&str>,
    ) -> Result<TrainArrivalsResponse, TransitError>;
    async fn get_stops(&self, route: &str) -> Result<TrainStopsResponse, TransitError>;
    async fn get_directions(&self, route: &str) -> Result<TrainDirectionsResponse, TransitError>;
}

/// Train API client.
#[derive(Debug, Clone)]
pub struct TrainClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TrainClient {
    /// Create a new train client with the given configuration.
    pub fn new(config: TrainConfig) -> Result<Self, TransitError> {
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
        tracing::debug!(%url, "train upstream request");

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("outputType", "JSON")])
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
impl TrainApi for TrainClient {
    async fn get_routes(&self) -> Result<TrainRoutesResponse, TransitError> {
        self.request("/routes", &[]).await
    }

    async fn get_arrivals(
        &self,
        station_id: &str,
        route: Option<&str>,
    ) -> Result<TrainArrivalsResponse, TransitError> {
        let mut params = vec![("staId", station_id)];
        if let Some(route) = route {
            params.push(("rt", route));
        }
        self.request("/arrivals", &params).await
    }

    async fn get_stops(&self, route: &str) -> Result<TrainStopsResponse, TransitError> {
        self.request("/stops", &[("rt", route)]).await
    }

    async fn get_directions(&self, route: &str) -> Result<TrainDirectionsResponse, TransitError> {
        self.request("/directions", &[("rt", route)]).await
    }
}
