//! # weft-console
//!
//! List controller core for weft instrumentation configuration.
//!
//! This crate holds the headless view logic of the instrumentation list:
//!
//! - [`InstrumentationListController`]: owns the rule set, dirty flag, and
//!   import/export document lifecycle; reconciles them with the hosting
//!   page's location on every change notification
//! - [`LocationQuery`] / [`ModalIntent`]: parsed location state and its
//!   pure modal derivation
//! - [`ModalPresenter`] / [`QueryStateBridge`]: seams to the hosting
//!   page's overlay widgets and URL machinery
//! - [`ConsoleError`]: gateway failures annotated with the issuing
//!   operation

#![deny(unsafe_code)]

pub mod errors;
pub mod list;
pub mod location;
pub mod modal;

pub use errors::{ConsoleError, ConsoleOperation, GatewayFailure};
pub use list::{InstrumentationListController, ListState};
pub use location::{
    LocationQuery, ModalIntent, QueryStateBridge, config_detail_query, new_config_query,
};
pub use modal::{ModalKind, ModalPresenter};
