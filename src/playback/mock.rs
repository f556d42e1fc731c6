//! Mock playback collaborators for testing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{
    ConnectionNotifier, PlaybackCommand, PlaybackConnector, PlaybackController, PlaybackHandle,
};

/// Mock playback controller that records every command.
///
/// Clones share the recorded commands.
#[derive(Debug, Clone, Default)]
pub struct MockPlaybackController {
    commands: Arc<Mutex<Vec<PlaybackCommand>>>,
}

impl MockPlaybackController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PlaybackCommand>> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, command: PlaybackCommand) {
        self.lock().push(command);
    }

    #[must_use]
    pub fn commands(&self) -> Vec<PlaybackCommand> {
        self.lock().clone()
    }

    #[must_use]
    pub fn count(&self, command: PlaybackCommand) -> usize {
        self.lock()
            .iter()
            .filter(|recorded| **recorded == command)
            .count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl PlaybackController for MockPlaybackController {
    fn start_ringing(&self) {
        self.record(PlaybackCommand::StartRinging);
    }

    fn silence_ringing(&self) {
        self.record(PlaybackCommand::SilenceRinging);
    }

    fn report_ux_completed(&self) {
        self.record(PlaybackCommand::ReportUxCompleted);
    }

    fn report_ux_dismissed(&self) {
        self.record(PlaybackCommand::ReportUxDismissed);
    }

    fn request_allow_dismiss(&self) {
        self.record(PlaybackCommand::RequestAllowDismiss);
    }
}

#[derive(Debug, Default)]
struct ConnectorState {
    notifier: Option<ConnectionNotifier>,
    bind_calls: usize,
    unbind_calls: usize,
}

/// Mock connector whose connection is completed by the test.
///
/// With `auto_connect`, `bind` reports the controller as connected right
/// away; otherwise the test calls [`MockPlaybackConnector::complete_bind`].
#[derive(Debug, Clone)]
pub struct MockPlaybackConnector {
    controller: MockPlaybackController,
    auto_connect: bool,
    state: Arc<Mutex<ConnectorState>>,
}

impl MockPlaybackConnector {
    /// Creates a connector that connects as soon as it is bound.
    #[must_use]
    pub fn connected(controller: MockPlaybackController) -> Self {
        Self {
            controller,
            auto_connect: true,
            state: Arc::default(),
        }
    }

    /// Creates a connector that waits for [`Self::complete_bind`].
    #[must_use]
    pub fn deferred(controller: MockPlaybackController) -> Self {
        Self {
            controller,
            auto_connect: false,
            state: Arc::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConnectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self) -> PlaybackHandle {
        Arc::new(self.controller.clone())
    }

    /// Reports the controller as connected. Returns false if never bound.
    pub fn complete_bind(&self) -> bool {
        match &self.lock().notifier {
            Some(notifier) => {
                notifier.connected(self.handle());
                true
            }
            None => false,
        }
    }

    /// Reports an unexpected disconnection. Returns false if never bound.
    pub fn drop_connection(&self) -> bool {
        match &self.lock().notifier {
            Some(notifier) => {
                notifier.disconnected();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn bind_count(&self) -> usize {
        self.lock().bind_calls
    }

    #[must_use]
    pub fn unbind_count(&self) -> usize {
        self.lock().unbind_calls
    }
}

impl PlaybackConnector for MockPlaybackConnector {
    fn bind(&mut self, notifier: ConnectionNotifier) {
        if self.auto_connect {
            notifier.connected(self.handle());
        }
        let mut state = self.lock();
        state.bind_calls += 1;
        state.notifier = Some(notifier);
    }

    fn unbind(&mut self) {
        let mut state = self.lock();
        state.unbind_calls += 1;
        state.notifier = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EventQueue;

    #[test]
    fn test_controller_records_commands() {
        let controller = MockPlaybackController::new();

        controller.start_ringing();
        controller.silence_ringing();
        controller.silence_ringing();

        assert_eq!(controller.count(PlaybackCommand::SilenceRinging), 2);
        assert_eq!(controller.count(PlaybackCommand::StartRinging), 1);

        controller.clear();
        assert!(controller.commands().is_empty());
    }

    #[test]
    fn test_connected_connector_posts_on_bind() {
        let mut queue = EventQueue::new();
        let mut connector = MockPlaybackConnector::connected(MockPlaybackController::new());

        connector.bind(ConnectionNotifier::new(queue.sender()));

        assert_eq!(connector.bind_count(), 1);
        assert!(queue.try_next().is_some());
    }

    #[test]
    fn test_deferred_connector_waits() {
        let mut queue = EventQueue::new();
        let mut connector = MockPlaybackConnector::deferred(MockPlaybackController::new());

        assert!(!connector.complete_bind());
        connector.bind(ConnectionNotifier::new(queue.sender()));
        assert!(queue.try_next().is_none());

        assert!(connector.complete_bind());
        assert!(queue.try_next().is_some());
    }

    #[test]
    fn test_unbind_forgets_notifier() {
        let queue = EventQueue::new();
        let mut connector = MockPlaybackConnector::deferred(MockPlaybackController::new());

        connector.bind(ConnectionNotifier::new(queue.sender()));
        connector.unbind();

        assert_eq!(connector.unbind_count(), 1);
        assert!(!connector.complete_bind());
        assert!(!connector.drop_connection());
    }
}
