//! The instrumentation list controller.
//!
//! Owns the in-memory rule set, the dirty flag, and the import/export
//! document lifecycle, and reconciles them with the hosting page's location
//! on every change notification. Collaborators stay behind seams: the
//! collector behind [`ConfigGateway`], overlays behind [`ModalPresenter`],
//! and location write-back behind [`QueryStateBridge`].
//!
//! State lives in an `Arc<RwLock<ListState>>`. Every mutation happens in
//! one synchronous write section with no await inside, so
//! [`snapshot`](InstrumentationListController::snapshot) readers observe
//! whole-state transitions and never a half-applied refresh.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

use weft_core::{ConfigPatch, InstrumentationConfig, export_document};
use weft_gateway::{ConfigGateway, GatewayError, ReweaveResponse};

use crate::errors::{ConsoleError, ConsoleOperation, GatewayFailure};
use crate::location::{self, LocationQuery, QueryStateBridge};
use crate::modal::{ModalKind, ModalPresenter};

/// Import-document parse failure message.
const INVALID_JSON: &str = "Invalid json";

// ─────────────────────────────────────────────────────────────────────────────
// View state
// ─────────────────────────────────────────────────────────────────────────────

/// View state owned by [`InstrumentationListController`].
///
/// Consumers read it through
/// [`snapshot`](InstrumentationListController::snapshot); all writes go
/// through controller operations.
#[derive(Clone, Debug, Default)]
pub struct ListState {
    /// Whether the first successful load has completed.
    pub loaded: bool,
    /// Rules, in collector-defined order.
    pub configs: Vec<InstrumentationConfig>,
    /// Whether the agent's live bytecode is out of sync with `configs`.
    pub dirty: bool,
    /// Whether the agent's JVM can re-transform loaded classes.
    pub retransform_supported: bool,
    /// Sanitized, pretty-printed rendition of `configs`.
    pub export_document: String,
    /// Import document text being authored.
    pub import_buffer: String,
    /// Current import validation failure, if any.
    pub import_error: Option<String>,
    /// Whether an import submission (and its follow-up refresh) is in
    /// flight.
    pub importing: bool,
    /// Last gateway failure, for display by the hosting page.
    pub last_failure: Option<GatewayFailure>,
    /// Location snapshot from the most recent change notification.
    pub location: LocationQuery,
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller
// ─────────────────────────────────────────────────────────────────────────────

/// List controller for one agent's instrumentation rules.
pub struct InstrumentationListController {
    agent_id: String,
    gateway: Arc<dyn ConfigGateway>,
    presenter: Arc<dyn ModalPresenter>,
    bridge: Arc<dyn QueryStateBridge>,
    state: Arc<RwLock<ListState>>,
}

impl InstrumentationListController {
    /// Create a controller for `agent_id`.
    ///
    /// The embedded single-agent deployment passes an empty identity; it is
    /// still sent to the gateway on every call, only navigation links omit
    /// it.
    #[must_use]
    pub fn new(
        agent_id: impl Into<String>,
        gateway: Arc<dyn ConfigGateway>,
        presenter: Arc<dyn ModalPresenter>,
        bridge: Arc<dyn QueryStateBridge>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            gateway,
            presenter,
            bridge,
            state: Arc::new(RwLock::new(ListState::default())),
        }
    }

    /// Agent this controller manages.
    #[must_use]
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Clone of the current view state.
    #[must_use]
    pub fn snapshot(&self) -> ListState {
        self.state.read().clone()
    }

    // ── location reconciliation ──────────────────────────────────────────

    /// React to a location change, including the initial observation.
    ///
    /// Before the first load completes this only (re)triggers the load;
    /// modal flags are acted on once data is present, by the
    /// reconciliation the load itself runs. Once loaded, each notification
    /// reconciles modal visibility against the new flags.
    pub async fn handle_location_change(&self, query: &LocationQuery) {
        let loaded = {
            let mut state = self.state.write();
            state.location = query.clone();
            state.loaded
        };
        if loaded {
            self.reconcile_modals();
        } else if self.refresh().await.is_ok() {
            self.spawn_cache_warm();
        }
    }

    /// Align modal visibility and buffers with the stored location.
    ///
    /// The import branch re-arms the modal on every pass: buffer and
    /// validation error reset whenever the flag is observed, not just on
    /// the first showing.
    fn reconcile_modals(&self) {
        let query = self.state.read().location.clone();
        if query.import {
            {
                let mut state = self.state.write();
                state.import_buffer.clear();
                state.import_error = None;
            }
            self.presenter.show(ModalKind::Import);
            self.presenter.focus_import_input();
        } else {
            self.presenter.hide(ModalKind::Import);
        }
        if query.export {
            let document = self.state.read().export_document.clone();
            self.presenter.bind_export_clipboard(&document);
            self.presenter.show(ModalKind::Export);
        } else {
            self.presenter.hide(ModalKind::Export);
        }
    }

    // ── load / refresh ───────────────────────────────────────────────────

    /// Fetch the rule set and JVM flags, replacing local state atomically.
    ///
    /// On success the export document is recomputed, any recorded failure
    /// clears, and modal visibility is reconciled against the current
    /// location. On failure local state keeps its previous data.
    pub async fn refresh(&self) -> Result<(), ConsoleError> {
        let response = match self.gateway.instrumentation_configs(&self.agent_id).await {
            Ok(response) => response,
            Err(source) => return Err(self.gateway_failure(ConsoleOperation::Refresh, source)),
        };
        let document = export_document(&response.configs);
        {
            let mut state = self.state.write();
            state.loaded = true;
            state.configs = response.configs;
            state.dirty = response.jvm_out_of_sync;
            state.retransform_supported = response.jvm_retransform_classes_supported;
            state.export_document = document;
            state.last_failure = None;
        }
        self.reconcile_modals();
        Ok(())
    }

    /// Prime the agent's name-completion cache off the critical path.
    ///
    /// Failure is logged at debug and never surfaced or retried; the list
    /// works without the cache, completion is just slower on first use.
    fn spawn_cache_warm(&self) {
        let gateway = Arc::clone(&self.gateway);
        let agent_id = self.agent_id.clone();
        let _ = tokio::spawn(async move {
            if let Err(error) = gateway.warm_classpath_cache(&agent_id).await {
                debug!(%error, "classpath cache warm failed");
            }
        });
    }

    // ── bulk delete ──────────────────────────────────────────────────────

    /// Remove every rule in one request.
    ///
    /// Local state only changes after the collector confirms. The resolved
    /// string is display text for the hosting page.
    pub async fn delete_all(&self) -> Result<String, ConsoleError> {
        let versions: Vec<String> = {
            let state = self.state.read();
            state
                .configs
                .iter()
                .filter_map(|config| config.version.clone())
                .collect()
        };
        match self
            .gateway
            .remove_instrumentation_configs(&self.agent_id, &versions)
            .await
        {
            Ok(()) => {
                let document = export_document(&[]);
                let mut state = self.state.write();
                state.configs.clear();
                state.export_document = document;
                state.last_failure = None;
                Ok("Deleted".to_string())
            }
            Err(source) => Err(self.gateway_failure(ConsoleOperation::DeleteAll, source)),
        }
    }

    // ── import ───────────────────────────────────────────────────────────

    /// Replace the import buffer. The modal's text field writes through
    /// this; any previous validation failure clears on edit.
    pub fn set_import_buffer(&self, text: impl Into<String>) {
        let mut state = self.state.write();
        state.import_buffer = text.into();
        state.import_error = None;
    }

    /// Validate the import buffer and submit the batch.
    ///
    /// Validation is all-or-nothing: every missing-field and undecodable
    /// element across the whole document is collected into one joined
    /// message and nothing reaches the collector. A single JSON object is
    /// treated as a batch of one.
    ///
    /// On submission success the importing indicator stays up until the
    /// follow-up refresh settles, then the Import modal closes and its
    /// query flag clears whether or not that refresh succeeded (the batch
    /// is already persisted). On submission failure the indicator clears
    /// immediately and the modal stays open for another attempt.
    pub async fn import_from_json(&self) {
        let buffer = {
            let mut state = self.state.write();
            state.import_error = None;
            state.import_buffer.clone()
        };
        let parsed: Value = match serde_json::from_str(&buffer) {
            Ok(value) => value,
            Err(_) => {
                self.state.write().import_error = Some(INVALID_JSON.to_string());
                return;
            }
        };
        let candidates = match parsed {
            Value::Array(items) => items,
            single => vec![single],
        };

        let mut errors: Vec<String> = Vec::new();
        let mut patches: Vec<ConfigPatch> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let patch: ConfigPatch = match serde_json::from_value(candidate) {
                Ok(patch) => patch,
                Err(error) => {
                    errors.push(format!("Invalid config: {error}"));
                    continue;
                }
            };
            for field in patch.missing_required_fields() {
                errors.push(format!("Missing {field}"));
            }
            patches.push(patch);
        }
        if !errors.is_empty() {
            self.state.write().import_error = Some(errors.join(", "));
            return;
        }

        let base = InstrumentationConfig::default();
        let configs: Vec<InstrumentationConfig> =
            patches.iter().map(|patch| patch.merge_over(&base)).collect();

        self.state.write().importing = true;
        match self
            .gateway
            .import_instrumentation_configs(&self.agent_id, &configs)
            .await
        {
            Ok(()) => {
                // The batch is persisted; the refresh outcome only affects
                // what the list shows next, not whether the modal closes.
                let _ = self.refresh().await;
                self.state.write().importing = false;
                self.presenter.hide(ModalKind::Import);
                self.bridge.clear_modal_flag(ModalKind::Import);
            }
            Err(source) => {
                self.state.write().importing = false;
                let _ = self.gateway_failure(ConsoleOperation::Import, source);
            }
        }
    }

    /// Ask the location to open the Import modal.
    ///
    /// Visibility itself follows from the resulting change notification.
    pub fn open_import_modal(&self) {
        self.bridge.set_modal_flag(ModalKind::Import);
    }

    /// Ask the location to open the Export modal.
    pub fn open_export_modal(&self) {
        self.bridge.set_modal_flag(ModalKind::Export);
    }

    // ── re-instrumentation ───────────────────────────────────────────────

    /// Reapply persisted configuration to the agent's live bytecode.
    ///
    /// Success clears the dirty flag and resolves with a class-count
    /// message; failure leaves the flag untouched since nothing was
    /// re-woven.
    pub async fn retransform_classes(&self) -> Result<String, ConsoleError> {
        match self.gateway.trigger_reweave(&self.agent_id).await {
            Ok(response) => {
                {
                    let mut state = self.state.write();
                    state.dirty = false;
                    state.last_failure = None;
                }
                Ok(reweave_message(&response))
            }
            Err(source) => Err(self.gateway_failure(ConsoleOperation::Reweave, source)),
        }
    }

    // ── navigation links ─────────────────────────────────────────────────

    /// Query string for `config`'s detail view.
    #[must_use]
    pub fn config_detail_query(&self, config: &InstrumentationConfig) -> String {
        location::config_detail_query(&self.agent_id, config.version.as_deref().unwrap_or(""))
    }

    /// Query string for the "new rule" view.
    #[must_use]
    pub fn new_config_query(&self) -> String {
        location::new_config_query(&self.agent_id)
    }

    // ── shared failure path ──────────────────────────────────────────────

    /// Record a gateway failure for display and build the caller's error.
    fn gateway_failure(&self, operation: ConsoleOperation, source: GatewayError) -> ConsoleError {
        warn!(%operation, error = %source, "gateway call failed");
        {
            let mut state = self.state.write();
            state.last_failure = Some(GatewayFailure {
                operation,
                message: source.to_string(),
            });
        }
        ConsoleError { operation, source }
    }
}

/// Display message for a reweave outcome.
fn reweave_message(response: &ReweaveResponse) -> String {
    match response.classes {
        Some(1) => "Success (re-transformed 1 class)".to_string(),
        Some(count) if count > 1 => format!("Success (re-transformed {count} classes)"),
        _ => "Success (no classes needed re-transforming)".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_unloaded_and_clean() {
        let state = ListState::default();
        assert!(!state.loaded);
        assert!(state.configs.is_empty());
        assert!(!state.dirty);
        assert!(!state.importing);
        assert_eq!(state.import_error, None);
        assert_eq!(state.last_failure, None);
    }

    #[test]
    fn reweave_message_pluralizes_the_count() {
        assert_eq!(
            reweave_message(&ReweaveResponse { classes: Some(1) }),
            "Success (re-transformed 1 class)"
        );
        assert_eq!(
            reweave_message(&ReweaveResponse { classes: Some(42) }),
            "Success (re-transformed 42 classes)"
        );
    }

    #[test]
    fn reweave_message_handles_nothing_to_do() {
        assert_eq!(
            reweave_message(&ReweaveResponse { classes: Some(0) }),
            "Success (no classes needed re-transforming)"
        );
        assert_eq!(
            reweave_message(&ReweaveResponse { classes: None }),
            "Success (no classes needed re-transforming)"
        );
    }
}
