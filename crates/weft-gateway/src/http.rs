//! `reqwest` implementation of [`ConfigGateway`].
//!
//! URL shapes follow the collector's backend routes. The agent identity is
//! carried as a percent-encoded `agent-id` query value on reads and inside
//! the JSON body on writes. Non-success statuses surface as
//! [`GatewayError::Backend`] with the response body as the message.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use weft_core::InstrumentationConfig;

use crate::gateway::{ConfigGateway, GatewayError, GatewayResult};
use crate::types::{
    GatewayConfig, ImportRequest, InstrumentationListResponse, RemoveRequest, ReweaveRequest,
    ReweaveResponse,
};

/// Maximum bytes of a backend error body kept for display.
const ERROR_BODY_LIMIT: usize = 512;

/// HTTP client for the collector's configuration endpoints.
pub struct HttpConfigGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpConfigGateway {
    /// Create a gateway from connection settings.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    /// Create a gateway that reuses an existing HTTP client.
    #[must_use]
    pub fn with_client(config: GatewayConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}{path_and_query}", self.config.base_url)
    }

    async fn get_checked(&self, url: String) -> GatewayResult<reqwest::Response> {
        let response = self.client.get(&url).send().await?;
        check_status(response).await
    }

    async fn post_checked<B: serde::Serialize + Sync>(
        &self,
        url: String,
        body: &B,
    ) -> GatewayResult<reqwest::Response> {
        let response = self.client.post(&url).json(body).send().await?;
        check_status(response).await
    }
}

#[async_trait]
impl ConfigGateway for HttpConfigGateway {
    async fn instrumentation_configs(
        &self,
        agent_id: &str,
    ) -> GatewayResult<InstrumentationListResponse> {
        let url = self.url(&format!(
            "/backend/config/instrumentation?agent-id={}",
            encode(agent_id)
        ));
        debug!(agent_id, "fetching instrumentation configs");
        Ok(self.get_checked(url).await?.json().await?)
    }

    async fn instrumentation_config(
        &self,
        agent_id: &str,
        version: &str,
    ) -> GatewayResult<Option<InstrumentationConfig>> {
        let url = self.url(&format!(
            "/backend/config/instrumentation?agent-id={}&version={}",
            encode(agent_id),
            encode(version)
        ));
        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        Ok(Some(response.json().await?))
    }

    async fn remove_instrumentation_configs(
        &self,
        agent_id: &str,
        versions: &[String],
    ) -> GatewayResult<()> {
        let body = RemoveRequest {
            agent_id: agent_id.to_string(),
            versions: versions.to_vec(),
        };
        debug!(agent_id, count = versions.len(), "removing instrumentation configs");
        let _ = self
            .post_checked(self.url("/backend/config/instrumentation/remove"), &body)
            .await?;
        Ok(())
    }

    async fn import_instrumentation_configs(
        &self,
        agent_id: &str,
        configs: &[InstrumentationConfig],
    ) -> GatewayResult<()> {
        let body = ImportRequest {
            agent_id: agent_id.to_string(),
            configs: configs.to_vec(),
        };
        debug!(agent_id, count = configs.len(), "importing instrumentation configs");
        let _ = self
            .post_checked(self.url("/backend/config/instrumentation/import"), &body)
            .await?;
        Ok(())
    }

    async fn trigger_reweave(&self, agent_id: &str) -> GatewayResult<ReweaveResponse> {
        let body = ReweaveRequest {
            agent_id: agent_id.to_string(),
        };
        debug!(agent_id, "triggering reweave");
        let response = self
            .post_checked(self.url("/backend/admin/reweave"), &body)
            .await?;
        Ok(response.json().await?)
    }

    async fn warm_classpath_cache(&self, agent_id: &str) -> GatewayResult<()> {
        let url = self.url(&format!(
            "/backend/config/preload-classpath-cache?agent-id={}",
            encode(agent_id)
        ));
        let _ = self.get_checked(url).await?;
        Ok(())
    }
}

/// Percent-encode a query value.
fn encode(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, percent_encoding::NON_ALPHANUMERIC).to_string()
}

/// Map a non-success response to [`GatewayError::Backend`].
async fn check_status(response: reqwest::Response) -> GatewayResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GatewayError::Backend {
        status: status.as_u16(),
        message: truncate(&message, ERROR_BODY_LIMIT),
    })
}

/// Truncate `text` to at most `limit` bytes, on a char boundary.
fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
