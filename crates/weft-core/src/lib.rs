//! # weft-core
//!
//! Foundation types for weft instrumentation configuration.
//!
//! This crate provides the shared vocabulary that the gateway and console
//! crates depend on:
//!
//! - **Rule records**: [`InstrumentationConfig`] and [`CaptureKind`], the
//!   camelCase wire format shared with the collector
//! - **Import patches**: [`ConfigPatch`], a partial record with
//!   required-field checks and a defaulting merge
//! - **Export**: [`export_document`] renders a rule set as a portable,
//!   sanitized JSON document
//! - **Logging**: [`logging::init_subscriber`] for hosting binaries

#![deny(unsafe_code)]

pub mod config;
pub mod export;
pub mod logging;

pub use config::{CaptureKind, ConfigPatch, InstrumentationConfig};
pub use export::export_document;
