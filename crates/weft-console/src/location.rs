//! Location-derived state for the instrumentation list view.
//!
//! The hosting page owns the navigable location; this module keeps the
//! query-string vocabulary at that boundary in one place. [`LocationQuery`]
//! is the parsed form, [`ModalIntent`] the pure derivation consumers branch
//! on, and [`QueryStateBridge`] the write-back seam for opening and closing
//! modals by mutating the location.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::modal::ModalKind;

/// Query flag that opens the Import modal.
pub(crate) const IMPORT_FLAG: &str = "import";
/// Query flag that opens the Export modal.
pub(crate) const EXPORT_FLAG: &str = "export";
/// Query flag marking the "new rule" view.
const NEW_FLAG: &str = "new";
/// Query key carrying the agent identity.
const AGENT_ID_KEY: &str = "agent-id";
/// Query key carrying a rule's revision token in detail links.
const VERSION_KEY: &str = "v";

/// Characters percent-encoded in query values.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

// ─────────────────────────────────────────────────────────────────────────────
// Parsed query
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed query parameters of the hosting page's location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationQuery {
    /// Agent identity, when the location carries one.
    pub agent_id: Option<String>,
    /// Import modal flag.
    pub import: bool,
    /// Export modal flag.
    pub export: bool,
    /// "New rule" view flag.
    pub new_config: bool,
}

impl LocationQuery {
    /// Parse a raw query string, with or without a leading `?`.
    ///
    /// Flags are presence-only: `?import` and `?import=true` both set
    /// [`import`](Self::import). Unknown keys are ignored.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (pair, None),
            };
            match key {
                AGENT_ID_KEY => parsed.agent_id = value.map(decode),
                IMPORT_FLAG => parsed.import = true,
                EXPORT_FLAG => parsed.export = true,
                NEW_FLAG => parsed.new_config = true,
                _ => {}
            }
        }
        parsed
    }

    /// The modal the current location asks for.
    ///
    /// Import wins when both flags are present; visibility reconciliation
    /// still treats the flags independently, so both modals show in that
    /// case.
    #[must_use]
    pub fn modal_intent(&self) -> ModalIntent {
        if self.import {
            ModalIntent::Import
        } else if self.export {
            ModalIntent::Export
        } else {
            ModalIntent::None
        }
    }
}

/// Which overlay the current location intends. Derived, never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalIntent {
    /// The Import modal.
    Import,
    /// The Export modal.
    Export,
    /// No overlay.
    #[default]
    None,
}

// ─────────────────────────────────────────────────────────────────────────────
// Link builders
// ─────────────────────────────────────────────────────────────────────────────

/// Query string linking to one rule's detail view.
///
/// Shapes as `?agent-id={id}&v={version}`, with `agent-id` omitted for the
/// embedded single-agent deployment (empty identity).
#[must_use]
pub fn config_detail_query(agent_id: &str, version: &str) -> String {
    if agent_id.is_empty() {
        format!("?{VERSION_KEY}={}", encode(version))
    } else {
        format!(
            "?{AGENT_ID_KEY}={}&{VERSION_KEY}={}",
            encode(agent_id),
            encode(version)
        )
    }
}

/// Query string linking to the "new rule" view.
#[must_use]
pub fn new_config_query(agent_id: &str) -> String {
    if agent_id.is_empty() {
        format!("?{NEW_FLAG}")
    } else {
        format!("?{AGENT_ID_KEY}={}&{NEW_FLAG}", encode(agent_id))
    }
}

/// Percent-decode a query value, replacing malformed UTF-8.
fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Percent-encode a query value.
fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Location write-back
// ─────────────────────────────────────────────────────────────────────────────

/// Write-back seam onto the navigable location.
///
/// Setting or clearing a modal flag mutates the location; the hosting page
/// then re-notifies the controller, which reconciles modal visibility from
/// the new [`LocationQuery`]. Implementations map
/// [`ModalKind::query_flag`] onto their own URL machinery.
pub trait QueryStateBridge: Send + Sync {
    /// Add `modal`'s query flag to the location.
    fn set_modal_flag(&self, modal: ModalKind);
    /// Remove `modal`'s query flag from the location.
    fn clear_modal_flag(&self, modal: ModalKind);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
