//! Seams between the reconciler, the service, and the view layer.
//!
//! The reconciler never renders and never fetches. It consumes snapshots
//! produced by a [`SessionSource`] and describes what changed as
//! [`ViewUpdate`]s handed to a [`RenderSink`]; both seams are injected so
//! the poll driver can run against the real service or a scripted fake.

use std::future::Future;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::client::TelemetryClient;
use crate::api::errors::ApiError;
use crate::api::types::{ActiveSessions, SessionPredictions};

pub use crate::api::types::SessionId;

/// One instruction for the view layer.
///
/// Each variant describes _what changed_, not how to draw it. Only
/// successful state changes produce updates; fetch failures are logged and
/// produce nothing. Updates use owned types so they can be serialized,
/// stored, and sent across boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewUpdate {
    /// Sessions that appeared since the last poll, in service order.
    SessionsAdded { ids: Vec<SessionId> },
    /// Sessions that disappeared, in previous display order.
    SessionsRemoved { ids: Vec<SessionId> },
    /// Fresh detail fields for the selected session. The view patches the
    /// named fields in place rather than rebuilding the detail pane.
    SessionUpdated {
        id: SessionId,
        fields: IndexMap<String, Value>,
    },
    /// The selection went away; the detail pane should empty itself.
    SelectionCleared,
}

/// Consumer of [`ViewUpdate`]s; implemented by the view layer.
pub trait RenderSink {
    fn apply(&mut self, updates: Vec<ViewUpdate>);
}

/// Provider of session snapshots and per-session detail payloads.
///
/// Implemented for the real service by [`TelemetrySource`] and by scripted
/// fakes in tests. Futures must be `Send` so the driver can run fetches on
/// spawned tasks.
pub trait SessionSource: Send + Sync {
    fn fetch_active_sessions(
        &self,
        game_id: &str,
    ) -> impl Future<Output = Result<ActiveSessions, ApiError>> + Send;

    fn fetch_predictions(
        &self,
        session_id: &str,
        game_id: &str,
    ) -> impl Future<Output = Result<SessionPredictions, ApiError>> + Send;
}

/// [`SessionSource`] backed by the telemetry service.
///
/// Carries the `require_player_id` flag so the watch config decides it once
/// instead of threading it through every poll.
#[derive(Debug, Clone)]
pub struct TelemetrySource {
    client: TelemetryClient,
    require_player_id: bool,
}

impl TelemetrySource {
    pub fn new(client: TelemetryClient, require_player_id: bool) -> Self {
        Self {
            client,
            require_player_id,
        }
    }
}

impl SessionSource for TelemetrySource {
    fn fetch_active_sessions(
        &self,
        game_id: &str,
    ) -> impl Future<Output = Result<ActiveSessions, ApiError>> + Send {
        self.client
            .get_all_active_sessions(game_id, self.require_player_id)
    }

    fn fetch_predictions(
        &self,
        session_id: &str,
        game_id: &str,
    ) -> impl Future<Output = Result<SessionPredictions, ApiError>> + Send {
        self.client
            .get_predictions_by_sess_id(session_id, game_id, None)
    }
}
