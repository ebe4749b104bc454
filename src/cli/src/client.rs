//! HTTP client for communicating with a Healthgate server.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// One entry of the report body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeEntry {
    pub name: String,
    pub state: String,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A fetched report: the HTTP status plus the decoded entries.
#[derive(Debug, Clone)]
pub struct HealthResponse {
    pub status: StatusCode,
    pub entries: Vec<ProbeEntry>,
}

impl HealthResponse {
    /// `200` means every probe was healthy.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// HTTP client for the Healthgate API.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client pointing at the given base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Return the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the health report at `path`.
    ///
    /// A `500` carries a degraded report and is not an error.
    pub async fn get_report(&self, path: &str) -> Result<HealthResponse> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::INTERNAL_SERVER_ERROR {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        let entries: Vec<ProbeEntry> = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))?;

        Ok(HealthResponse { status, entries })
    }
}
