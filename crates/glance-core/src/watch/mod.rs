//! Session-list reconciliation under periodic polling.
//!
//! - [`reconciler`] - pure displayed-set/selection state and diffing
//! - [`driver`] - the periodic poll loop with stale-response guards
//! - [`types`] - view instructions and the injectable source/sink seams

pub mod driver;
pub mod reconciler;
pub mod types;

pub use driver::{DEFAULT_POLL_INTERVAL, Watcher};
pub use reconciler::SessionReconciler;
pub use types::{RenderSink, SessionId, SessionSource, TelemetrySource, ViewUpdate};
