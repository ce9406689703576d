//! Console-side error types.
//!
//! Gateway failures cross the controller boundary as [`ConsoleError`], a
//! [`GatewayError`] annotated with the operation that issued the call. The
//! same failure is kept in view state as a [`GatewayFailure`] so the hosting
//! page can render it without holding the error itself.

use std::fmt;

use thiserror::Error;

use weft_gateway::GatewayError;

/// Console operation that issued a failed gateway call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleOperation {
    /// Full rule-set refresh.
    Refresh,
    /// Bulk removal of every rule.
    DeleteAll,
    /// Bulk import submission.
    Import,
    /// Re-instrumentation trigger.
    Reweave,
}

impl fmt::Display for ConsoleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refresh => write!(f, "refresh"),
            Self::DeleteAll => write!(f, "delete all"),
            Self::Import => write!(f, "import"),
            Self::Reweave => write!(f, "reweave"),
        }
    }
}

/// Gateway call failure annotated with the issuing operation.
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct ConsoleError {
    /// Operation that failed.
    pub operation: ConsoleOperation,
    /// Underlying gateway failure.
    #[source]
    pub source: GatewayError,
}

/// Last gateway failure, kept in view state for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayFailure {
    /// Operation that failed.
    pub operation: ConsoleOperation,
    /// Human-readable failure text.
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
