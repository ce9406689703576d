//! Wire types for the collector's configuration endpoints.
//!
//! Response and request bodies use `#[serde(rename_all = "camelCase")]` to
//! match the collector's JSON format. [`GatewayConfig`] is local connection
//! configuration, not a wire type, and keeps plain field names.

use serde::{Deserialize, Serialize};

use weft_core::InstrumentationConfig;

/// Response of the instrumentation listing endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentationListResponse {
    /// Persisted rules, in collector-defined order.
    pub configs: Vec<InstrumentationConfig>,
    /// Whether the agent's live bytecode no longer matches `configs`.
    pub jvm_out_of_sync: bool,
    /// Whether the agent's JVM supports re-transforming loaded classes.
    pub jvm_retransform_classes_supported: bool,
}

/// Response of the re-instrumentation endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReweaveResponse {
    /// Number of classes re-transformed; absent when none matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<u64>,
}

/// Body of the bulk removal request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    /// Agent the rules belong to.
    pub agent_id: String,
    /// Revision tokens of every rule to remove.
    pub versions: Vec<String>,
}

/// Body of the bulk import request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Agent the rules belong to.
    pub agent_id: String,
    /// Complete rules to persist.
    pub configs: Vec<InstrumentationConfig>,
}

/// Body of the re-instrumentation request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReweaveRequest {
    /// Agent whose live bytecode should be re-woven.
    pub agent_id: String,
}

/// Connection settings for [`HttpConfigGateway`].
///
/// [`HttpConfigGateway`]: crate::HttpConfigGateway
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Collector base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
