//! # weft-gateway
//!
//! Backend gateway for the weft instrumentation console.
//!
//! This crate owns every collector round trip the console makes:
//!
//! - [`ConfigGateway`]: the async seam the console controllers call
//! - [`HttpConfigGateway`]: `reqwest` implementation speaking the
//!   collector's HTTP endpoints
//! - [`GatewayError`]: transport, decode, and backend-status failures
//! - Wire types for the list, removal, import, and reweave round trips

#![deny(unsafe_code)]

pub mod gateway;
pub mod http;
pub mod types;

pub use gateway::{ConfigGateway, GatewayError, GatewayResult};
pub use http::HttpConfigGateway;
pub use types::{
    GatewayConfig, ImportRequest, InstrumentationListResponse, RemoveRequest, ReweaveRequest,
    ReweaveResponse,
};
