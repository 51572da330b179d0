//! Operational status reporting.
//!
//! Stateless client for the GitHub-hosted workflow and release endpoints,
//! used only to report deploy status alongside the transit data. Responses
//! are forwarded verbatim; nothing here is cached.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::error::TransitError;

/// Configuration for the status client.
#[derive(Debug, Clone)]
pub struct StatusConfig {
    /// GitHub token, sent as `Authorization: token <...>`.
    pub token: String,
    /// Workflow-runs URL for the web deployment.
    pub web_workflow_url: String,
    /// Workflow-runs URL for the server deployment.
    pub server_workflow_url: String,
    /// Latest-release URL.
    pub version_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl StatusConfig {
    /// Create a new config with the given token and endpoint URLs.
    pub fn new(
        token: impl Into<String>,
        web_workflow_url: impl Into<String>,
        server_workflow_url: impl Into<String>,
        version_url: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            web_workflow_url: web_workflow_url.into(),
            server_workflow_url: server_workflow_url.into(),
            version_url: version_url.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Workflow-run documents for both deployments, forwarded verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStatus {
    pub web: Value,
    pub server: Value,
}

/// Client for the GitHub status endpoints.
#[derive(Debug, Clone)]
pub struct StatusClient {
    http: reqwest::Client,
    config: StatusConfig,
}

impl StatusClient {
    /// Create a new status client with the given configuration.
    pub fn new(config: StatusConfig) -> Result<Self, TransitError> {
        let mut headers = HeaderMap::new();

        let auth = HeaderValue::from_str(&format!("token {}", config.token)).map_err(|_| {
            TransitError::Api {
                status: 0,
                message: "invalid GitHub token format".to_string(),
            }
        })?;
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, TransitError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TransitError::Unauthorized);
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

    /// Fetch the workflow-run documents for both deployments.
    pub async fn workflows(&self) -> Result<WorkflowStatus, TransitError> {
        let web = self.fetch_json(&self.config.web_workflow_url).await?;
        let server = self.fetch_json(&self.config.server_workflow_url).await?;

        Ok(WorkflowStatus { web, server })
    }

    /// Fetch the latest release tag.
    pub async fn latest_version(&self) -> Result<String, TransitError> {
        let release = self.fetch_json(&self.config.version_url).await?;
        parse_tag(&release)
    }
}

fn parse_tag(release: &Value) -> Result<String, TransitError> {
    release
        .get("tag_name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TransitError::Malformed {
            message: "release response missing tag_name".to_string(),
        })
}
