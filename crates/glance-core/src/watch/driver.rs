//! Periodic poll driver around the reconciler.
//!
//! The watcher owns the reconciler plus the injected source and sink and
//! runs the fetch-and-reconcile cycle. Fetches are spawned, so a slow
//! response can overlap the next tick; every fetch carries a monotonic
//! sequence number and only the latest-issued number for its stream may
//! apply. Out-of-order or superseded responses are discarded with a log.
//! There is no cancellation and no explicit retry: the poll cycle itself is
//! the retry mechanism, and any failed cycle just keeps the prior state.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::errors::ApiError;
use crate::api::types::{ActiveSessions, SessionPredictions};

use super::reconciler::SessionReconciler;
use super::types::{RenderSink, SessionId, SessionSource};

/// Poll interval used when the config does not override it.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// A completed fetch, tagged with the sequence number it was issued under.
enum FetchOutcome {
    Sessions {
        seq: u64,
        result: Result<ActiveSessions, ApiError>,
    },
    Detail {
        seq: u64,
        session_id: SessionId,
        result: Result<SessionPredictions, ApiError>,
    },
}

/// Monotonic counter guarding one fetch stream against stale completions.
#[derive(Debug, Default)]
struct SequenceGuard {
    issued: u64,
}

impl SequenceGuard {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn is_latest(&self, seq: u64) -> bool {
        seq == self.issued
    }
}

/// Poll driver: fetches snapshots, reconciles, keeps the selection fresh.
pub struct Watcher<S, R> {
    source: S,
    sink: R,
    reconciler: SessionReconciler,
    poll_interval: Duration,
    snapshot_fetches: SequenceGuard,
    detail_fetches: SequenceGuard,
}

impl<S, R> Watcher<S, R>
where
    S: SessionSource + Clone + Send + Sync + 'static,
    R: RenderSink,
{
    pub fn new(source: S, sink: R, game: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            source,
            sink,
            reconciler: SessionReconciler::new(game),
            poll_interval,
            snapshot_fetches: SequenceGuard::default(),
            detail_fetches: SequenceGuard::default(),
        }
    }

    /// Read access to the reconciled state.
    pub fn reconciler(&self) -> &SessionReconciler {
        &self.reconciler
    }

    /// One inline fetch-and-reconcile pass, plus a detail refresh when a
    /// selection exists. Failures are logged and the cycle keeps prior
    /// state; nothing propagates to the caller.
    pub async fn poll_once(&mut self) {
        let game = self.reconciler.active_game().to_string();

        let seq = self.snapshot_fetches.issue();
        let result = self.source.fetch_active_sessions(&game).await;
        self.apply_snapshot_fetch(seq, result);

        if let Some(session_id) = self.reconciler.selection().map(str::to_string) {
            let seq = self.detail_fetches.issue();
            let result = self.source.fetch_predictions(&session_id, &game).await;
            self.apply_detail_fetch(seq, session_id, result);
        }
    }

    /// Select a session and render its detail once.
    ///
    /// Returns false (and fetches nothing) when the id is not currently
    /// active. A failed detail fetch leaves the selection in place; the
    /// next poll cycle refreshes it.
    pub async fn select(&mut self, session_id: &str) -> bool {
        if !self.reconciler.select(session_id) {
            return false;
        }
        let game = self.reconciler.active_game().to_string();
        let seq = self.detail_fetches.issue();
        let result = self.source.fetch_predictions(session_id, &game).await;
        self.apply_detail_fetch(seq, session_id.to_string(), result);
        true
    }

    pub fn clear_selection(&mut self) {
        let updates = self.reconciler.clear_selection();
        if !updates.is_empty() {
            self.sink.apply(updates);
        }
    }

    /// Switch games: reset all reconciled state, invalidate in-flight
    /// fetches for the old game, then poll the new game immediately.
    pub async fn change_game(&mut self, game: impl Into<String>) {
        let updates = self.reconciler.change_game(game);
        self.snapshot_fetches.issue();
        self.detail_fetches.issue();
        if !updates.is_empty() {
            self.sink.apply(updates);
        }
        self.poll_once().await;
    }

    /// Run the poll cycle forever.
    ///
    /// The first tick fires immediately, so starting the watcher is also
    /// its initial poll.
    pub async fn run(mut self) {
        let (results_tx, mut results_rx) = mpsc::channel::<FetchOutcome>(16);
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            event = "core.watch.started",
            game = self.reconciler.active_game(),
            interval_secs = self.poll_interval.as_secs()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => self.start_fetches(&results_tx),
                Some(outcome) = results_rx.recv() => match outcome {
                    FetchOutcome::Sessions { seq, result } => {
                        self.apply_snapshot_fetch(seq, result);
                    }
                    FetchOutcome::Detail { seq, session_id, result } => {
                        self.apply_detail_fetch(seq, session_id, result);
                    }
                },
            }
        }
    }

    /// Issue this tick's fetches on background tasks.
    fn start_fetches(&mut self, results: &mpsc::Sender<FetchOutcome>) {
        let game = self.reconciler.active_game().to_string();

        let seq = self.snapshot_fetches.issue();
        let source = self.source.clone();
        let tx = results.clone();
        let snapshot_game = game.clone();
        tokio::spawn(async move {
            let result = source.fetch_active_sessions(&snapshot_game).await;
            let _ = tx.send(FetchOutcome::Sessions { seq, result }).await;
        });

        if let Some(session_id) = self.reconciler.selection().map(str::to_string) {
            let seq = self.detail_fetches.issue();
            let source = self.source.clone();
            let tx = results.clone();
            tokio::spawn(async move {
                let result = source.fetch_predictions(&session_id, &game).await;
                let _ = tx
                    .send(FetchOutcome::Detail {
                        seq,
                        session_id,
                        result,
                    })
                    .await;
            });
        }
    }

    fn apply_snapshot_fetch(&mut self, seq: u64, result: Result<ActiveSessions, ApiError>) {
        if !self.snapshot_fetches.is_latest(seq) {
            debug!(
                event = "core.watch.snapshot_discarded",
                seq = seq,
                latest = self.snapshot_fetches.issued,
                "session fetch superseded by a newer request"
            );
            return;
        }
        match result {
            Ok(snapshot) => {
                debug!(
                    event = "core.watch.poll_completed",
                    sessions = snapshot.len()
                );
                let updates = self.reconciler.apply_snapshot(snapshot);
                if !updates.is_empty() {
                    self.sink.apply(updates);
                }
            }
            Err(e) => {
                warn!(
                    event = "core.watch.poll_failed",
                    error = %e,
                    "keeping previous session set"
                );
            }
        }
    }

    fn apply_detail_fetch(
        &mut self,
        seq: u64,
        session_id: SessionId,
        result: Result<SessionPredictions, ApiError>,
    ) {
        if !self.detail_fetches.is_latest(seq) {
            debug!(
                event = "core.watch.detail_discarded",
                session_id = session_id,
                seq = seq,
                "detail fetch superseded by a newer request"
            );
            return;
        }
        match result {
            Ok(predictions) => match self.reconciler.detail_update(predictions) {
                Some(update) => self.sink.apply(vec![update]),
                None => debug!(
                    event = "core.watch.detail_discarded",
                    session_id = session_id,
                    "selection changed while the fetch was in flight"
                ),
            },
            Err(e) => {
                warn!(
                    event = "core.watch.detail_fetch_failed",
                    session_id = session_id,
                    error = %e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::SessionRecord;
    use crate::watch::types::ViewUpdate;
    use indexmap::IndexMap;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    fn snapshot(ids: &[&str]) -> ActiveSessions {
        ActiveSessions::from_records(ids.iter().map(|id| SessionRecord::new(*id)))
    }

    fn malformed() -> ApiError {
        ApiError::MalformedResponse {
            method: "get_all_active_sessions",
            message: "expected value at line 1 column 1".to_string(),
        }
    }

    /// Source that replays queued responses; an empty queue yields an
    /// empty snapshot / missing-session error.
    #[derive(Clone, Default)]
    struct ScriptedSource {
        snapshots: Arc<Mutex<VecDeque<Result<ActiveSessions, ApiError>>>>,
        predictions: Arc<Mutex<VecDeque<Result<SessionPredictions, ApiError>>>>,
    }

    impl ScriptedSource {
        fn queue_snapshot(&self, result: Result<ActiveSessions, ApiError>) {
            self.snapshots.lock().unwrap().push_back(result);
        }

        fn queue_predictions(&self, result: Result<SessionPredictions, ApiError>) {
            self.predictions.lock().unwrap().push_back(result);
        }
    }

    impl SessionSource for ScriptedSource {
        async fn fetch_active_sessions(&self, _game_id: &str) -> Result<ActiveSessions, ApiError> {
            self.snapshots
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ActiveSessions::default()))
        }

        async fn fetch_predictions(
            &self,
            session_id: &str,
            _game_id: &str,
        ) -> Result<SessionPredictions, ApiError> {
            self.predictions.lock().unwrap().pop_front().unwrap_or_else(|| {
                Ok(SessionPredictions {
                    session_id: session_id.to_string(),
                    values: IndexMap::new(),
                })
            })
        }
    }

    /// Sink that records every instruction it is handed.
    #[derive(Clone, Default)]
    struct RecordingSink {
        updates: Arc<Mutex<Vec<ViewUpdate>>>,
    }

    impl RecordingSink {
        fn take(&self) -> Vec<ViewUpdate> {
            std::mem::take(&mut self.updates.lock().unwrap())
        }
    }

    impl RenderSink for RecordingSink {
        fn apply(&mut self, mut updates: Vec<ViewUpdate>) {
            self.updates.lock().unwrap().append(&mut updates);
        }
    }

    fn watcher(source: &ScriptedSource, sink: &RecordingSink) -> Watcher<ScriptedSource, RecordingSink> {
        Watcher::new(
            source.clone(),
            sink.clone(),
            "CRYSTAL",
            DEFAULT_POLL_INTERVAL,
        )
    }

    #[tokio::test]
    async fn test_poll_once_applies_snapshot() {
        let source = ScriptedSource::default();
        let sink = RecordingSink::default();
        source.queue_snapshot(Ok(snapshot(&["1", "2"])));

        let mut watcher = watcher(&source, &sink);
        watcher.poll_once().await;

        assert_eq!(
            sink.take(),
            vec![ViewUpdate::SessionsAdded {
                ids: vec!["1".to_string(), "2".to_string()]
            }]
        );
        assert_eq!(watcher.reconciler().displayed(), ["1", "2"]);
    }

    #[tokio::test]
    async fn test_poll_failure_keeps_prior_state() {
        let source = ScriptedSource::default();
        let sink = RecordingSink::default();
        source.queue_snapshot(Ok(snapshot(&["1"])));
        source.queue_snapshot(Err(malformed()));

        let mut watcher = watcher(&source, &sink);
        watcher.poll_once().await;
        sink.take();

        watcher.poll_once().await;
        assert!(sink.take().is_empty(), "failed poll must emit nothing");
        assert_eq!(
            watcher.reconciler().displayed(),
            ["1"],
            "stale-but-valid state is kept"
        );
    }

    #[tokio::test]
    async fn test_select_fetches_detail_once() {
        let source = ScriptedSource::default();
        let sink = RecordingSink::default();
        source.queue_snapshot(Ok(snapshot(&["1"])));
        let mut values = IndexMap::new();
        values.insert("completion_chance".to_string(), serde_json::json!(0.5));
        source.queue_predictions(Ok(SessionPredictions {
            session_id: "1".to_string(),
            values,
        }));

        let mut watcher = watcher(&source, &sink);
        watcher.poll_once().await;
        sink.take();

        assert!(watcher.select("1").await);
        let updates = sink.take();
        assert_eq!(updates.len(), 1);
        assert!(matches!(
            &updates[0],
            ViewUpdate::SessionUpdated { id, fields } if id == "1" && fields.len() == 1
        ));
    }

    #[tokio::test]
    async fn test_select_rejects_unknown_id() {
        let source = ScriptedSource::default();
        let sink = RecordingSink::default();
        source.queue_snapshot(Ok(snapshot(&["1"])));

        let mut watcher = watcher(&source, &sink);
        watcher.poll_once().await;
        sink.take();

        assert!(!watcher.select("99").await);
        assert!(sink.take().is_empty());
        assert_eq!(watcher.reconciler().selection(), None);
    }

    #[tokio::test]
    async fn test_selection_refreshed_each_poll() {
        let source = ScriptedSource::default();
        let sink = RecordingSink::default();
        source.queue_snapshot(Ok(snapshot(&["1"])));

        let mut watcher = watcher(&source, &sink);
        watcher.poll_once().await;
        assert!(watcher.select("1").await);
        sink.take();

        // Next cycle: same sessions, so the only instruction is the detail
        // refresh for the selection.
        source.queue_snapshot(Ok(snapshot(&["1"])));
        watcher.poll_once().await;
        let updates = sink.take();
        assert_eq!(updates.len(), 1);
        assert!(matches!(&updates[0], ViewUpdate::SessionUpdated { id, .. } if id == "1"));
    }

    #[tokio::test]
    async fn test_selection_cleared_when_session_disappears() {
        let source = ScriptedSource::default();
        let sink = RecordingSink::default();
        source.queue_snapshot(Ok(snapshot(&["1"])));

        let mut watcher = watcher(&source, &sink);
        watcher.poll_once().await;
        assert!(watcher.select("1").await);
        sink.take();

        source.queue_snapshot(Ok(snapshot(&[])));
        watcher.poll_once().await;

        assert_eq!(
            sink.take(),
            vec![
                ViewUpdate::SessionsRemoved {
                    ids: vec!["1".to_string()]
                },
                ViewUpdate::SelectionCleared,
            ]
        );
        assert_eq!(watcher.reconciler().selection(), None);
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_discarded() {
        let source = ScriptedSource::default();
        let sink = RecordingSink::default();
        let mut watcher = watcher(&source, &sink);

        // Two fetches in flight: seq 1 issued first, seq 2 supersedes it.
        let seq1 = watcher.snapshot_fetches.issue();
        let seq2 = watcher.snapshot_fetches.issue();

        watcher.apply_snapshot_fetch(seq2, Ok(snapshot(&["2"])));
        // The older response completes last; it must not roll state back.
        watcher.apply_snapshot_fetch(seq1, Ok(snapshot(&["1"])));

        assert_eq!(watcher.reconciler().displayed(), ["2"]);
        assert_eq!(
            sink.take(),
            vec![ViewUpdate::SessionsAdded {
                ids: vec!["2".to_string()]
            }]
        );
    }

    #[tokio::test]
    async fn test_stale_detail_is_discarded() {
        let source = ScriptedSource::default();
        let sink = RecordingSink::default();
        source.queue_snapshot(Ok(snapshot(&["1"])));

        let mut watcher = watcher(&source, &sink);
        watcher.poll_once().await;
        assert!(watcher.select("1").await);
        sink.take();

        let seq1 = watcher.detail_fetches.issue();
        let _seq2 = watcher.detail_fetches.issue();
        watcher.apply_detail_fetch(
            seq1,
            "1".to_string(),
            Ok(SessionPredictions {
                session_id: "1".to_string(),
                values: IndexMap::new(),
            }),
        );
        assert!(sink.take().is_empty(), "superseded detail must not render");
    }

    #[tokio::test]
    async fn test_change_game_resets_before_new_poll_resolves() {
        let source = ScriptedSource::default();
        let sink = RecordingSink::default();
        source.queue_snapshot(Ok(snapshot(&["7"])));

        let mut watcher = watcher(&source, &sink);
        watcher.poll_once().await;
        assert!(watcher.select("7").await);
        sink.take();

        // The old game still has a fetch in flight when the game changes.
        let stale_seq = watcher.snapshot_fetches.issue();

        source.queue_snapshot(Ok(snapshot(&["100"])));
        watcher.change_game("LAKELAND").await;

        let updates = sink.take();
        assert_eq!(
            updates[0],
            ViewUpdate::SessionsRemoved {
                ids: vec!["7".to_string()]
            }
        );
        assert_eq!(updates[1], ViewUpdate::SelectionCleared);
        assert_eq!(
            updates[2],
            ViewUpdate::SessionsAdded {
                ids: vec!["100".to_string()]
            }
        );
        assert_eq!(watcher.reconciler().active_game(), "LAKELAND");
        assert_eq!(watcher.reconciler().selection(), None);

        // The old game's response lands after the switch and is discarded.
        watcher.apply_snapshot_fetch(stale_seq, Ok(snapshot(&["7"])));
        assert_eq!(watcher.reconciler().displayed(), ["100"]);
        assert!(sink.take().is_empty());
    }

    #[tokio::test]
    async fn test_clear_selection_signals_view() {
        let source = ScriptedSource::default();
        let sink = RecordingSink::default();
        source.queue_snapshot(Ok(snapshot(&["1"])));

        let mut watcher = watcher(&source, &sink);
        watcher.poll_once().await;
        assert!(watcher.select("1").await);
        sink.take();

        watcher.clear_selection();
        assert_eq!(sink.take(), vec![ViewUpdate::SelectionCleared]);

        // Idempotent: a second clear emits nothing
        watcher.clear_selection();
        assert!(sink.take().is_empty());
    }
}
