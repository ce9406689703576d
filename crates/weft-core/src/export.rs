//! Portable export rendition of a rule set.
//!
//! The sanitizer strips collector-internal bookkeeping (currently just the
//! `version` revision token) so a document exported from one collector can
//! be imported into another. Sanitizing never mutates its input and is
//! idempotent, which makes the export document a fixed point of the
//! export/import cycle. [`export_document`] pretty-prints the sanitized
//! rules as a 2-space-indented JSON array.

use crate::config::InstrumentationConfig;

impl InstrumentationConfig {
    /// Copy of this rule with collector-internal fields removed.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            version: None,
            ..self.clone()
        }
    }
}

/// Pretty-printed JSON array of the sanitized rule set.
///
/// Field order follows the declaration order of [`InstrumentationConfig`];
/// every field except `version` is present, defaults included. An empty
/// rule set renders as `[]`.
#[must_use]
pub fn export_document(configs: &[InstrumentationConfig]) -> String {
    let sanitized: Vec<InstrumentationConfig> =
        configs.iter().map(InstrumentationConfig::sanitized).collect();
    serde_json::to_string_pretty(&sanitized).unwrap_or_else(|_| String::from("[]"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
