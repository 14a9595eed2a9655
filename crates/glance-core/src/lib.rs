//! glance-core: Core library for the glance realtime telemetry client
//!
//! This library talks to a realtime game-telemetry service, keeps a local
//! picture of the currently active game-play sessions, and turns each poll
//! into a minimal stream of add/remove/update instructions for a view layer.
//! It is used by the CLI and by anything else that wants to render the
//! session list.
//!
//! # Main Entry Points
//!
//! - [`api`] - Typed client for the telemetry service endpoint
//! - [`watch`] - Session reconciler and the periodic poll driver
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging setup

pub mod api;
pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod watch;

// Re-export commonly used types at crate root for convenience
pub use api::client::TelemetryClient;
pub use api::errors::ApiError;
pub use api::types::{ActiveSessions, SessionFeatures, SessionPredictions, SessionRecord};
pub use config::GlanceConfig;
pub use errors::{ConfigError, GlanceError, GlanceResult};
pub use watch::driver::{DEFAULT_POLL_INTERVAL, Watcher};
pub use watch::reconciler::SessionReconciler;
pub use watch::types::{RenderSink, SessionId, SessionSource, TelemetrySource, ViewUpdate};

// Re-export logging initialization
pub use logging::init_logging;
