//! Typed access to the realtime telemetry service.
//!
//! - [`client`] - the HTTP client and its `method=...` call surface
//! - [`types`] - payload models and envelope parsing
//! - [`errors`] - the API error taxonomy

pub mod client;
pub mod errors;
pub mod types;

pub use client::TelemetryClient;
pub use errors::{ApiError, PayloadError};
pub use types::{
    ActiveSessions, SessionFeatures, SessionId, SessionPredictions, SessionRecord, parse_name_list,
};
