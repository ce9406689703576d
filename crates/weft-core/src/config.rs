//! Instrumentation rule definitions.
//!
//! All wire types use `#[serde(rename_all = "camelCase")]` to match the
//! collector's JSON format. [`InstrumentationConfig`] implements [`Default`]
//! with the canonical base record that import merging builds on, and
//! `#[serde(default)]` lets partial JSON deserialize against those same
//! values.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Capture kind
// ─────────────────────────────────────────────────────────────────────────────

/// What a rule captures at its matched join point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureKind {
    /// Aggregate a timer around the matched method.
    #[default]
    Timer,
    /// Record a trace entry when the method runs inside a transaction.
    TraceEntry,
    /// Start a new transaction at the matched method.
    Transaction,
    /// Match without capturing telemetry (grouping and gating only).
    Other,
}

impl CaptureKind {
    /// Display label for list rendering.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Timer => "Timer",
            Self::TraceEntry => "Trace entry",
            Self::Transaction => "Transaction",
            Self::Other => "Other",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule record
// ─────────────────────────────────────────────────────────────────────────────

/// One instrumentation rule: which method to intercept and what telemetry
/// to capture there.
///
/// `version` is the collector-assigned revision token identifying the
/// persisted revision of the rule. It is never produced or mutated locally,
/// and exported documents omit it (see
/// [`sanitized`](InstrumentationConfig::sanitized)).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentationConfig {
    /// Class to instrument.
    pub class_name: String,
    /// Method to instrument.
    pub method_name: String,
    /// Restrict matches to methods declared on this class.
    pub method_declaring_class_name: String,
    /// Match methods carrying this annotation.
    pub method_annotation: String,
    /// Match classes carrying this annotation.
    pub class_annotation: String,
    /// Restrict matches to methods with this return type.
    pub method_return_type: String,
    /// Telemetry captured at the matched point.
    pub capture_kind: CaptureKind,
    /// Nesting group for suppressing nested captures.
    pub nesting_group: String,
    /// Weaving order relative to other rules at the same point.
    pub priority: i32,
    /// Transaction type, for transaction captures.
    pub transaction_type: String,
    /// Template for the transaction name.
    pub transaction_name_template: String,
    /// Template for the transaction user.
    pub transaction_user_template: String,
    /// Whether a trace entry also captures directly self-nested calls.
    pub trace_entry_capture_self_nested: bool,
    /// Agent property gating the whole rule.
    pub enabled_property: String,
    /// Agent property gating just the trace entry.
    pub trace_entry_enabled_property: String,
    /// Collector-assigned revision token of the persisted rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl InstrumentationConfig {
    /// List display text, `className::methodName`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}::{}", self.class_name, self.method_name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Import patch
// ─────────────────────────────────────────────────────────────────────────────

/// Partial instrumentation rule as authored in an import document.
///
/// Every field is optional. [`missing_required_fields`] reports the fields
/// that have no safe default, and [`merge_over`] completes the record
/// against a base.
///
/// [`missing_required_fields`]: ConfigPatch::missing_required_fields
/// [`merge_over`]: ConfigPatch::merge_over
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    /// See [`InstrumentationConfig::class_name`].
    pub class_name: Option<String>,
    /// See [`InstrumentationConfig::method_name`].
    pub method_name: Option<String>,
    /// See [`InstrumentationConfig::method_declaring_class_name`].
    pub method_declaring_class_name: Option<String>,
    /// See [`InstrumentationConfig::method_annotation`].
    pub method_annotation: Option<String>,
    /// See [`InstrumentationConfig::class_annotation`].
    pub class_annotation: Option<String>,
    /// See [`InstrumentationConfig::method_return_type`].
    pub method_return_type: Option<String>,
    /// See [`InstrumentationConfig::capture_kind`].
    pub capture_kind: Option<CaptureKind>,
    /// See [`InstrumentationConfig::nesting_group`].
    pub nesting_group: Option<String>,
    /// See [`InstrumentationConfig::priority`].
    pub priority: Option<i32>,
    /// See [`InstrumentationConfig::transaction_type`].
    pub transaction_type: Option<String>,
    /// See [`InstrumentationConfig::transaction_name_template`].
    pub transaction_name_template: Option<String>,
    /// See [`InstrumentationConfig::transaction_user_template`].
    pub transaction_user_template: Option<String>,
    /// See [`InstrumentationConfig::trace_entry_capture_self_nested`].
    pub trace_entry_capture_self_nested: Option<bool>,
    /// See [`InstrumentationConfig::enabled_property`].
    pub enabled_property: Option<String>,
    /// See [`InstrumentationConfig::trace_entry_enabled_property`].
    pub trace_entry_enabled_property: Option<String>,
    /// See [`InstrumentationConfig::version`].
    pub version: Option<String>,
}

impl ConfigPatch {
    /// Required fields absent from this patch, in wire spelling.
    ///
    /// `className`, `methodName`, and `captureKind` have no meaningful
    /// default; a patch missing any of them must be rejected before merging.
    #[must_use]
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.class_name.is_none() {
            missing.push("className");
        }
        if self.method_name.is_none() {
            missing.push("methodName");
        }
        if self.capture_kind.is_none() {
            missing.push("captureKind");
        }
        missing
    }

    /// Complete this patch against `base`, keeping every field the patch
    /// sets and filling the rest from `base`.
    #[must_use]
    pub fn merge_over(&self, base: &InstrumentationConfig) -> InstrumentationConfig {
        InstrumentationConfig {
            class_name: self
                .class_name
                .clone()
                .unwrap_or_else(|| base.class_name.clone()),
            method_name: self
                .method_name
                .clone()
                .unwrap_or_else(|| base.method_name.clone()),
            method_declaring_class_name: self
                .method_declaring_class_name
                .clone()
                .unwrap_or_else(|| base.method_declaring_class_name.clone()),
            method_annotation: self
                .method_annotation
                .clone()
                .unwrap_or_else(|| base.method_annotation.clone()),
            class_annotation: self
                .class_annotation
                .clone()
                .unwrap_or_else(|| base.class_annotation.clone()),
            method_return_type: self
                .method_return_type
                .clone()
                .unwrap_or_else(|| base.method_return_type.clone()),
            capture_kind: self.capture_kind.unwrap_or(base.capture_kind),
            nesting_group: self
                .nesting_group
                .clone()
                .unwrap_or_else(|| base.nesting_group.clone()),
            priority: self.priority.unwrap_or(base.priority),
            transaction_type: self
                .transaction_type
                .clone()
                .unwrap_or_else(|| base.transaction_type.clone()),
            transaction_name_template: self
                .transaction_name_template
                .clone()
                .unwrap_or_else(|| base.transaction_name_template.clone()),
            transaction_user_template: self
                .transaction_user_template
                .clone()
                .unwrap_or_else(|| base.transaction_user_template.clone()),
            trace_entry_capture_self_nested: self
                .trace_entry_capture_self_nested
                .unwrap_or(base.trace_entry_capture_self_nested),
            enabled_property: self
                .enabled_property
                .clone()
                .unwrap_or_else(|| base.enabled_property.clone()),
            trace_entry_enabled_property: self
                .trace_entry_enabled_property
                .clone()
                .unwrap_or_else(|| base.trace_entry_enabled_property.clone()),
            version: self.version.clone().or_else(|| base.version.clone()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── defaults ──

    #[test]
    fn default_record_has_empty_strings_and_timer_kind() {
        let config = InstrumentationConfig::default();
        assert_eq!(config.class_name, "");
        assert_eq!(config.method_name, "");
        assert_eq!(config.method_declaring_class_name, "");
        assert_eq!(config.method_annotation, "");
        assert_eq!(config.class_annotation, "");
        assert_eq!(config.method_return_type, "");
        assert_eq!(config.capture_kind, CaptureKind::Timer);
        assert_eq!(config.nesting_group, "");
        assert_eq!(config.priority, 0);
        assert_eq!(config.transaction_type, "");
        assert_eq!(config.transaction_name_template, "");
        assert_eq!(config.transaction_user_template, "");
        assert!(!config.trace_entry_capture_self_nested);
        assert_eq!(config.enabled_property, "");
        assert_eq!(config.trace_entry_enabled_property, "");
        assert_eq!(config.version, None);
    }

    #[test]
    fn empty_json_object_deserializes_to_default() {
        let config: InstrumentationConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, InstrumentationConfig::default());
    }

    // ── serde wire format ──

    #[test]
    fn serializes_with_camel_case_keys() {
        let config = InstrumentationConfig {
            class_name: "com.example.Widget".to_string(),
            method_name: "spin".to_string(),
            capture_kind: CaptureKind::TraceEntry,
            trace_entry_capture_self_nested: true,
            ..InstrumentationConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["className"], "com.example.Widget");
        assert_eq!(value["methodName"], "spin");
        assert_eq!(value["captureKind"], "trace-entry");
        assert_eq!(value["traceEntryCaptureSelfNested"], true);
        assert_eq!(value["methodDeclaringClassName"], "");
        assert_eq!(value["transactionNameTemplate"], "");
    }

    #[test]
    fn version_key_is_omitted_when_absent() {
        let value = serde_json::to_value(InstrumentationConfig::default()).unwrap();
        assert!(value.get("version").is_none());

        let with_version = InstrumentationConfig {
            version: Some("abc123".to_string()),
            ..InstrumentationConfig::default()
        };
        let value = serde_json::to_value(&with_version).unwrap();
        assert_eq!(value["version"], "abc123");
    }

    #[test]
    fn capture_kinds_use_kebab_case() {
        assert_eq!(
            serde_json::to_value(CaptureKind::Timer).unwrap(),
            json!("timer")
        );
        assert_eq!(
            serde_json::to_value(CaptureKind::TraceEntry).unwrap(),
            json!("trace-entry")
        );
        assert_eq!(
            serde_json::to_value(CaptureKind::Transaction).unwrap(),
            json!("transaction")
        );
        assert_eq!(
            serde_json::to_value(CaptureKind::Other).unwrap(),
            json!("other")
        );

        let kind: CaptureKind = serde_json::from_value(json!("trace-entry")).unwrap();
        assert_eq!(kind, CaptureKind::TraceEntry);
    }

    #[test]
    fn unknown_json_keys_are_ignored() {
        let config: InstrumentationConfig = serde_json::from_value(json!({
            "className": "com.example.Widget",
            "methodName": "spin",
            "somethingElse": 42
        }))
        .unwrap();
        assert_eq!(config.class_name, "com.example.Widget");
    }

    // ── display ──

    #[test]
    fn display_joins_class_and_method() {
        let config = InstrumentationConfig {
            class_name: "com.example.Widget".to_string(),
            method_name: "spin".to_string(),
            ..InstrumentationConfig::default()
        };
        assert_eq!(config.display(), "com.example.Widget::spin");
    }

    #[test]
    fn capture_kind_labels() {
        assert_eq!(CaptureKind::Timer.label(), "Timer");
        assert_eq!(CaptureKind::TraceEntry.label(), "Trace entry");
        assert_eq!(CaptureKind::Transaction.label(), "Transaction");
        assert_eq!(CaptureKind::Other.label(), "Other");
    }

    // ── patch validation ──

    #[test]
    fn complete_patch_reports_no_missing_fields() {
        let patch: ConfigPatch = serde_json::from_value(json!({
            "className": "com.example.Widget",
            "methodName": "spin",
            "captureKind": "timer"
        }))
        .unwrap();
        assert!(patch.missing_required_fields().is_empty());
    }

    #[test]
    fn empty_patch_reports_all_required_fields_in_order() {
        let patch = ConfigPatch::default();
        assert_eq!(
            patch.missing_required_fields(),
            vec!["className", "methodName", "captureKind"]
        );
    }

    #[test]
    fn patch_missing_one_field_reports_just_that_field() {
        let patch: ConfigPatch = serde_json::from_value(json!({
            "className": "com.example.Widget",
            "captureKind": "timer"
        }))
        .unwrap();
        assert_eq!(patch.missing_required_fields(), vec!["methodName"]);
    }

    // ── patch merge ──

    #[test]
    fn merge_fills_unset_fields_from_base() {
        let patch: ConfigPatch = serde_json::from_value(json!({
            "className": "com.example.Widget",
            "methodName": "spin",
            "captureKind": "transaction"
        }))
        .unwrap();
        let merged = patch.merge_over(&InstrumentationConfig::default());
        assert_eq!(merged.class_name, "com.example.Widget");
        assert_eq!(merged.method_name, "spin");
        assert_eq!(merged.capture_kind, CaptureKind::Transaction);
        assert_eq!(merged.priority, 0);
        assert_eq!(merged.transaction_type, "");
        assert!(!merged.trace_entry_capture_self_nested);
        assert_eq!(merged.version, None);
    }

    #[test]
    fn merge_keeps_every_field_the_patch_sets() {
        let patch: ConfigPatch = serde_json::from_value(json!({
            "className": "com.example.Widget",
            "methodName": "spin",
            "captureKind": "trace-entry",
            "priority": -5,
            "nestingGroup": "widgets",
            "traceEntryCaptureSelfNested": true,
            "version": "abc123"
        }))
        .unwrap();
        let merged = patch.merge_over(&InstrumentationConfig::default());
        assert_eq!(merged.priority, -5);
        assert_eq!(merged.nesting_group, "widgets");
        assert!(merged.trace_entry_capture_self_nested);
        assert_eq!(merged.version, Some("abc123".to_string()));
    }

    #[test]
    fn patch_rejects_non_object_json() {
        assert!(serde_json::from_value::<ConfigPatch>(json!("timer")).is_err());
        assert!(serde_json::from_value::<ConfigPatch>(json!(7)).is_err());
        assert!(serde_json::from_value::<ConfigPatch>(json!(null)).is_err());
    }
}
