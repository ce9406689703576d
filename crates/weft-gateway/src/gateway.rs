//! # Gateway Trait
//!
//! Core abstraction over collector round trips. The console controllers
//! only ever talk to [`ConfigGateway`]; the HTTP implementation lives in
//! [`HttpConfigGateway`] and tests substitute scripted fakes.
//!
//! [`HttpConfigGateway`]: crate::HttpConfigGateway

use async_trait::async_trait;

use weft_core::InstrumentationConfig;

use crate::types::{InstrumentationListResponse, ReweaveResponse};

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur during collector round trips.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Collector answered with a non-success status.
    #[error("Backend error ({status}): {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for display.
        message: String,
    },
}

impl GatewayError {
    /// HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Backend { status, .. } => Some(*status),
            Self::Json(_) => None,
        }
    }
}

/// Collector operations over one agent's instrumentation configuration.
///
/// The agent identity travels on every call; the embedded single-agent
/// deployment passes an empty string and the collector resolves it to the
/// local agent.
#[async_trait]
pub trait ConfigGateway: Send + Sync {
    /// Fetch the full rule set plus the JVM sync flags.
    async fn instrumentation_configs(
        &self,
        agent_id: &str,
    ) -> GatewayResult<InstrumentationListResponse>;

    /// Fetch one rule by its revision token, if it still exists.
    async fn instrumentation_config(
        &self,
        agent_id: &str,
        version: &str,
    ) -> GatewayResult<Option<InstrumentationConfig>>;

    /// Remove every rule whose revision token is listed.
    async fn remove_instrumentation_configs(
        &self,
        agent_id: &str,
        versions: &[String],
    ) -> GatewayResult<()>;

    /// Persist a batch of complete rules.
    async fn import_instrumentation_configs(
        &self,
        agent_id: &str,
        configs: &[InstrumentationConfig],
    ) -> GatewayResult<()>;

    /// Reapply persisted configuration to the agent's live bytecode.
    async fn trigger_reweave(&self, agent_id: &str) -> GatewayResult<ReweaveResponse>;

    /// Prime the agent's class and method name completion cache.
    async fn warm_classpath_cache(&self, agent_id: &str) -> GatewayResult<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_reports_its_status() {
        let error = GatewayError::Backend {
            status: 503,
            message: "collector restarting".to_string(),
        };
        assert_eq!(error.status(), Some(503));
        assert_eq!(
            error.to_string(),
            "Backend error (503): collector restarting"
        );
    }

    #[test]
    fn json_error_has_no_status() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = GatewayError::from(source);
        assert_eq!(error.status(), None);
        assert!(error.to_string().starts_with("JSON error:"));
    }
}
