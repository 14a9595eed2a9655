//! Incremental reconciliation of the displayed session list.
//!
//! The reconciler owns three things: the set of sessions the view is
//! currently showing, the at-most-one selected session, and the last
//! applied active-session snapshot. Each snapshot is diffed against the
//! displayed list with set semantics and the displayed list is then
//! overwritten to exactly the snapshot's keys, so a skipped or misapplied
//! update is healed by the next poll rather than accumulating drift.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::api::types::{ActiveSessions, SessionPredictions, SessionRecord};

use super::types::{SessionId, ViewUpdate};

/// Pure session-list state; all I/O lives in the poll driver.
#[derive(Debug, Clone)]
pub struct SessionReconciler {
    active_game: String,
    active: IndexMap<SessionId, SessionRecord>,
    displayed: Vec<SessionId>,
    selection: Option<SessionId>,
}

impl SessionReconciler {
    /// A fresh reconciler scoped to `game`: nothing displayed, nothing
    /// selected.
    pub fn new(game: impl Into<String>) -> Self {
        Self {
            active_game: game.into(),
            active: IndexMap::new(),
            displayed: Vec::new(),
            selection: None,
        }
    }

    pub fn active_game(&self) -> &str {
        &self.active_game
    }

    /// Session ids the view is currently showing, in display order.
    pub fn displayed(&self) -> &[SessionId] {
        &self.displayed
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Last polled attributes for a displayed session.
    pub fn record(&self, session_id: &str) -> Option<&SessionRecord> {
        self.active.get(session_id)
    }

    /// Replace the active set with a fresh snapshot and describe the
    /// difference to the view.
    ///
    /// Removals are emitted before additions, removals in previous display
    /// order and additions in snapshot order. If the selected session is
    /// among the removals the selection is dropped and a
    /// [`ViewUpdate::SelectionCleared`] follows the removal instruction.
    /// Applying an identical snapshot twice yields nothing the second time.
    pub fn apply_snapshot(&mut self, snapshot: ActiveSessions) -> Vec<ViewUpdate> {
        if let Some(notice) = snapshot.notice() {
            debug!(event = "core.watch.service_notice", notice = notice);
        }

        let (added, removed) = diff(&self.displayed, &snapshot);
        self.active = snapshot.into_sessions();
        // Authoritative overwrite: display membership is exactly the
        // snapshot keys, whatever the view did with earlier instructions.
        self.displayed = self.active.keys().cloned().collect();

        let mut updates = Vec::new();
        if !removed.is_empty() {
            let selection_dropped = self
                .selection
                .as_ref()
                .is_some_and(|selected| removed.iter().any(|id| id == selected));
            updates.push(ViewUpdate::SessionsRemoved { ids: removed });
            if selection_dropped {
                let selected = self.selection.take().unwrap_or_default();
                info!(
                    event = "core.watch.selection_dropped",
                    session_id = selected,
                    "selected session is no longer active"
                );
                updates.push(ViewUpdate::SelectionCleared);
            }
        }
        if !added.is_empty() {
            updates.push(ViewUpdate::SessionsAdded { ids: added });
        }
        updates
    }

    /// Select a session for detail display.
    ///
    /// The id must be a member of the active set; anything else is ignored
    /// with a log so a stale click can never trigger a detail fetch for a
    /// foreign id.
    pub fn select(&mut self, session_id: &str) -> bool {
        if !self.active.contains_key(session_id) {
            warn!(
                event = "core.watch.select_rejected",
                session_id = session_id,
                "id is not in the active session set"
            );
            return false;
        }
        self.selection = Some(session_id.to_string());
        true
    }

    /// Drop the selection, telling the view to empty the detail pane.
    pub fn clear_selection(&mut self) -> Vec<ViewUpdate> {
        if self.selection.take().is_some() {
            vec![ViewUpdate::SelectionCleared]
        } else {
            Vec::new()
        }
    }

    /// Switch to a different game: everything displayed goes away, the
    /// selection is dropped, and the active set empties until the new
    /// game's first poll lands.
    pub fn change_game(&mut self, game: impl Into<String>) -> Vec<ViewUpdate> {
        let mut updates = Vec::new();
        if !self.displayed.is_empty() {
            updates.push(ViewUpdate::SessionsRemoved {
                ids: std::mem::take(&mut self.displayed),
            });
        }
        if self.selection.take().is_some() {
            updates.push(ViewUpdate::SelectionCleared);
        }
        self.active.clear();
        self.active_game = game.into();
        info!(event = "core.watch.game_changed", game = %self.active_game);
        updates
    }

    /// Turn a detail payload into an in-place update for the view.
    ///
    /// Produces nothing when the payload is not for the current selection,
    /// which is how stale detail responses for a deselected session die.
    pub fn detail_update(&self, predictions: SessionPredictions) -> Option<ViewUpdate> {
        match &self.selection {
            Some(selected) if *selected == predictions.session_id => {
                Some(ViewUpdate::SessionUpdated {
                    id: predictions.session_id,
                    fields: predictions.values,
                })
            }
            _ => None,
        }
    }
}

/// Set difference in both directions: `(snapshot − displayed, displayed −
/// snapshot)`. Hash-set membership keeps this linear in the two set sizes.
fn diff(displayed: &[SessionId], snapshot: &ActiveSessions) -> (Vec<SessionId>, Vec<SessionId>) {
    let shown: HashSet<&str> = displayed.iter().map(String::as_str).collect();
    let active: HashSet<&str> = snapshot.ids().map(String::as_str).collect();

    let added = snapshot
        .ids()
        .filter(|id| !shown.contains(id.as_str()))
        .cloned()
        .collect();
    let removed = displayed
        .iter()
        .filter(|id| !active.contains(id.as_str()))
        .cloned()
        .collect();
    (added, removed)
}
