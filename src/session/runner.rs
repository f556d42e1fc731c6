//! Drives a ringing session from its event queue.

use tracing::debug;

use super::event::{EventQueue, EventSender};
use super::ringing::{RingingSession, SessionContext, SessionSummary};
use crate::error::RingingError;
use crate::types::{AlarmId, RingDuration};

/// Owns a session together with the queue that feeds it.
///
/// Events are handled strictly one at a time, in the order they were posted.
pub struct SessionRunner {
    session: RingingSession,
    queue: EventQueue,
}

impl SessionRunner {
    /// Creates a queue and starts a session on it.
    ///
    /// # Errors
    ///
    /// Returns [`RingingError::AlarmNotFound`] if the alarm cannot be resolved.
    pub fn start(
        alarm_id: AlarmId,
        ring_duration: RingDuration,
        context: SessionContext,
    ) -> Result<Self, RingingError> {
        let queue = EventQueue::new();
        let session = RingingSession::start(alarm_id, ring_duration, context, queue.sender())?;
        Ok(Self { session, queue })
    }

    /// Returns a sender that posts onto the session queue.
    pub fn sender(&self) -> EventSender {
        self.queue.sender()
    }

    pub fn session(&self) -> &RingingSession {
        &self.session
    }

    /// Handles every event already queued. Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.queue.try_next() {
            self.session.handle(event);
            handled += 1;
        }
        handled
    }

    /// Handles events until the session finishes, then disposes it.
    pub async fn run(mut self) -> SessionSummary {
        while !self.session.is_finished() {
            let Some(event) = self.queue.next().await else {
                break;
            };
            debug!(?event, "Event dequeued");
            self.session.handle(event);
        }

        self.shutdown()
    }

    /// Disposes the session where it stands and returns its summary.
    pub fn shutdown(mut self) -> SessionSummary {
        self.session.dispose();
        self.session.summary()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::alarm::{AlarmRecord, FirstMimicSelector, InMemoryAlarmStore};
    use crate::playback::{
        ConnectionState, MockPlaybackConnector, MockPlaybackController, PlaybackCommand,
    };
    use crate::screen::{MockScreenPresenter, ScreenEvent};
    use crate::session::SessionEvent;
    use crate::timeout::TokioTimeoutScheduler;
    use crate::types::{MimicKind, SessionState};

    fn start(duration_ms: i64) -> (SessionRunner, MockPlaybackController) {
        let store = InMemoryAlarmStore::new();
        let id =
            store.insert(AlarmRecord::new("Runner").with_mimics(vec![MimicKind::ColorCapture]));
        let playback = MockPlaybackController::new();
        let context = SessionContext {
            store: Arc::new(store),
            presenter: Box::new(MockScreenPresenter::new()),
            connector: Box::new(MockPlaybackConnector::connected(playback.clone())),
            scheduler: Box::new(TokioTimeoutScheduler::new()),
            selector: Box::new(FirstMimicSelector),
        };
        let runner =
            SessionRunner::start(id, RingDuration::from_millis(duration_ms), context).unwrap();
        (runner, playback)
    }

    #[tokio::test]
    async fn test_process_pending_handles_connection() {
        let (mut runner, _) = start(0);

        assert_eq!(runner.process_pending(), 1);
        assert_eq!(runner.session().connection_state(), ConnectionState::Bound);
        assert_eq!(runner.process_pending(), 0);
    }

    #[tokio::test]
    async fn test_run_until_user_finishes() {
        let (runner, playback) = start(0);
        let sender = runner.sender();

        sender.send(ScreenEvent::RingingSnoozed);
        sender.send(ScreenEvent::SnoozeDismissed);
        let summary = runner.run().await;

        assert_eq!(summary.state, SessionState::Finished);
        assert!(!summary.timed_out);
        assert_eq!(
            summary.history,
            vec![
                SessionState::Ringing,
                SessionState::Snoozing,
                SessionState::Finished
            ]
        );
        assert_eq!(
            playback.commands(),
            vec![
                PlaybackCommand::SilenceRinging,
                PlaybackCommand::ReportUxCompleted,
                PlaybackCommand::ReportUxDismissed,
            ]
        );
    }

    #[tokio::test]
    async fn test_shutdown_unfinished_session() {
        let (mut runner, playback) = start(0);
        runner.process_pending();

        let summary = runner.shutdown();

        assert_eq!(summary.state, SessionState::Ringing);
        assert_eq!(playback.commands(), vec![PlaybackCommand::ReportUxDismissed]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_timeout() {
        let (runner, playback) = start(5000);

        let summary = runner.run().await;

        assert!(summary.timed_out);
        assert_eq!(summary.state, SessionState::Finished);
        assert_eq!(playback.count(PlaybackCommand::ReportUxCompleted), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_during_game_defers_finish() {
        let (runner, playback) = start(5000);
        let sender = runner.sender();
        sender.send(ScreenEvent::RingingDismissed);

        let task = tokio::spawn(runner.run());
        tokio::time::sleep(std::time::Duration::from_millis(6000)).await;
        assert!(!task.is_finished());

        sender.send(SessionEvent::Screen(ScreenEvent::MimicFailed));
        let summary = task.await.unwrap();

        assert!(summary.timed_out);
        assert_eq!(playback.count(PlaybackCommand::StartRinging), 0);
        assert_eq!(summary.history.last(), Some(&SessionState::Finished));
    }
}
