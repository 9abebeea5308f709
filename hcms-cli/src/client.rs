//! API Client
//!
//! HTTP client for communicating with a running HCMS API.

use crate::error::{CliError, CliResult};
use hcms_api::HealthResponse;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HCMS API client
pub struct HcmsClient {
    /// HTTP client
    client: Client,
    /// Base URL
    base_url: String,
}

impl HcmsClient {
    /// Create a new client
    pub fn new(base_url: impl Into<String>) -> CliResult<Self> {
        Self::with_timeout(base_url, 30)
    }

    /// Create with custom timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CliError::connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get health status
    pub async fn health(&self) -> CliResult<HealthResponse> {
        self.get_json("/api/v1/health").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CliError::connection(format!("{}: {}", url, e)))?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(CliError::api(
                response.status().as_u16(),
                response.text().await.unwrap_or_default(),
            ))
        }
    }
}
