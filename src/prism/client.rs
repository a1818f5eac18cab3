use reqwest::Client;
use std::time::Duration;

use super::types::ListResponse;
use super::PrismError;
use crate::config::Config;

/// Prism Central API client.
///
/// Certificate validation is disabled on purpose: lab clusters run with
/// self-signed certs and the original deployment accepted that trade-off.
pub struct PrismClient {
    base_url: String,
    username: String,
    password: String,
    client: Client,
}

impl PrismClient {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        Self::with_base_url(
            format!("https://{}:9440/api/nutanix/v3", cfg.prism_host),
            cfg.prism_username.clone(),
            cfg.prism_password.clone(),
            cfg.api_timeout_secs,
        )
    }

    pub fn with_base_url(
        base_url: String,
        username: String,
        password: String,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
            client,
        })
    }

    /// List vm entities. Single attempt, no retries.
    pub async fn list_vms(&self) -> Result<Vec<serde_json::Value>, PrismError> {
        self.list_entities("vm", "vms").await
    }

    /// List cluster entities. Single attempt, no retries.
    pub async fn list_clusters(&self) -> Result<Vec<serde_json::Value>, PrismError> {
        self.list_entities("cluster", "clusters").await
    }

    /// POST the fixed-shape list query Prism v3 expects. Entities come back
    /// as raw JSON values so one malformed record cannot fail the decode of
    /// the whole page.
    async fn list_entities(
        &self,
        kind: &str,
        endpoint: &str,
    ) -> Result<Vec<serde_json::Value>, PrismError> {
        let url = format!("{}/{}/list", self.base_url, endpoint);
        let payload = serde_json::json!({
            "kind": kind,
            "length": 1000,
        });

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&payload)
            .send()
            .await
            .map_err(|e| PrismError::Unreachable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PrismError::Unavailable {
                status: resp.status().as_u16(),
            });
        }

        let body: ListResponse = resp
            .json()
            .await
            .map_err(|e| PrismError::Malformed(e.to_string()))?;

        Ok(body.entities)
    }
}
