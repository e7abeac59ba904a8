use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

use super::{CatalogError, Observation, ObservationCatalog, ObservationQuery};
use crate::config::CatalogConfig;
use crate::error::{ForagerError, ForagerResult};

/// Observation search against the iNaturalist v1 API
#[derive(Debug, Clone)]
pub struct INaturalistClient {
    client: Client,
    base_url: String,
}

impl INaturalistClient {
    /// Client with the default endpoint and timeouts
    pub fn new() -> ForagerResult<Self> {
        Self::from_config(&CatalogConfig::default())
    }

    pub fn from_config(config: &CatalogConfig) -> ForagerResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ForagerError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Point the client at another server, e.g. a local mock
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn observations_url(&self) -> String {
        format!("{}/v1/observations", self.base_url)
    }
}

#[async_trait::async_trait]
impl ObservationCatalog for INaturalistClient {
    async fn observations_near(
        &self,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>, CatalogError> {
        debug!(
            radius_km = query.radius_km,
            taxa = query.taxa.len(),
            "Querying observation catalog"
        );

        let response = self
            .client
            .get(self.observations_url())
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("application/json") {
            return Err(CatalogError::Format(format!(
                "expected application/json, received '{}'",
                content_type
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CatalogError::Format(format!("invalid JSON body: {}", e)))?;

        let results = body
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| CatalogError::Format("response has no results array".to_string()))?;

        let observations: Vec<Observation> =
            results.iter().filter_map(Observation::from_json).collect();
        trace!(
            received = results.len(),
            attributed = observations.len(),
            "Parsed observation page"
        );

        Ok(observations)
    }
}
