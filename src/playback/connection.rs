//! Session-side view of the playback service connection.

use tracing::debug;

use super::{PlaybackCommand, PlaybackHandle};
use crate::session::{EventSender, SessionEvent};

/// Whether the playback service is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unbound,
    Bound,
}

/// Owned, optional handle to the playback controller.
///
/// Commands issued while unbound are dropped. An unexpected disconnection
/// puts the connection back to unbound; nothing is retried.
#[derive(Default)]
pub struct PlaybackConnection {
    handle: Option<PlaybackHandle>,
    dropped: usize,
}

impl PlaybackConnection {
    /// Creates an unbound connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the connection state.
    pub fn state(&self) -> ConnectionState {
        if self.handle.is_some() {
            ConnectionState::Bound
        } else {
            ConnectionState::Unbound
        }
    }

    /// Stores the handle delivered by the connector.
    pub fn attach(&mut self, handle: PlaybackHandle) {
        self.handle = Some(handle);
    }

    /// Forgets the handle.
    pub fn detach(&mut self) {
        self.handle = None;
    }

    /// Returns how many commands were dropped while unbound.
    pub fn dropped_commands(&self) -> usize {
        self.dropped
    }

    /// Sends a command if bound, drops it otherwise.
    pub fn send(&mut self, command: PlaybackCommand) {
        match &self.handle {
            Some(handle) => {
                debug!(%command, "Playback command sent");
                command.apply(handle.as_ref());
            }
            None => {
                self.dropped += 1;
                debug!(%command, "Playback not bound, command dropped");
            }
        }
    }
}

/// Lets a connector report connection changes onto the session queue.
#[derive(Debug, Clone)]
pub struct ConnectionNotifier {
    events: EventSender,
}

impl ConnectionNotifier {
    pub(crate) fn new(events: EventSender) -> Self {
        Self { events }
    }

    /// Reports that the playback service is bound.
    pub fn connected(&self, handle: PlaybackHandle) {
        self.events.send(SessionEvent::PlaybackConnected(handle));
    }

    /// Reports that the playback service went away.
    pub fn disconnected(&self) {
        self.events.send(SessionEvent::PlaybackDisconnected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::MockPlaybackController;
    use std::sync::Arc;

    #[test]
    fn test_new_connection_is_unbound() {
        let connection = PlaybackConnection::new();
        assert_eq!(connection.state(), ConnectionState::Unbound);
    }

    #[test]
    fn test_commands_dropped_while_unbound() {
        let mut connection = PlaybackConnection::new();

        connection.send(PlaybackCommand::SilenceRinging);
        connection.send(PlaybackCommand::StartRinging);

        assert_eq!(connection.dropped_commands(), 2);
    }

    #[test]
    fn test_commands_reach_bound_controller() {
        let controller = MockPlaybackController::new();
        let mut connection = PlaybackConnection::new();

        connection.attach(Arc::new(controller.clone()));
        connection.send(PlaybackCommand::SilenceRinging);

        assert_eq!(connection.state(), ConnectionState::Bound);
        assert_eq!(controller.commands(), vec![PlaybackCommand::SilenceRinging]);
        assert_eq!(connection.dropped_commands(), 0);
    }

    #[test]
    fn test_detach_returns_to_unbound() {
        let controller = MockPlaybackController::new();
        let mut connection = PlaybackConnection::new();

        connection.attach(Arc::new(controller.clone()));
        connection.detach();
        connection.send(PlaybackCommand::ReportUxCompleted);

        assert_eq!(connection.state(), ConnectionState::Unbound);
        assert!(controller.commands().is_empty());
        assert_eq!(connection.dropped_commands(), 1);
    }
}
