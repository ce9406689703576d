//! Modal presentation seam for the instrumentation list view.
//!
//! The controller never renders; it issues visibility commands through
//! [`ModalPresenter`] and lets the hosting page own the widgets. Commands
//! only ever come from location reconciliation, so a shown modal always
//! corresponds to a present query flag.

use crate::location;

/// Overlays owned by the instrumentation list view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModalKind {
    /// Paste-a-document import overlay.
    Import,
    /// Copyable-document export overlay.
    Export,
}

impl ModalKind {
    /// Query flag that opens this modal.
    ///
    /// Doubles as the origin tag a presenter must revert through the
    /// location when the user dismisses the modal directly, so the next
    /// reconciliation observes the dismissal.
    #[must_use]
    pub fn query_flag(self) -> &'static str {
        match self {
            Self::Import => location::IMPORT_FLAG,
            Self::Export => location::EXPORT_FLAG,
        }
    }
}

/// Presentation collaborator that shows and hides overlays.
pub trait ModalPresenter: Send + Sync {
    /// Request that `modal` be visible.
    fn show(&self, modal: ModalKind);
    /// Request that `modal` be hidden.
    fn hide(&self, modal: ModalKind);
    /// Move input focus into the Import modal's document field.
    fn focus_import_input(&self);
    /// (Re)bind the copy-to-clipboard affordance to `document`.
    fn bind_export_clipboard(&self, document: &str);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
