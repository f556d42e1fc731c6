//! Session events and the serialized event queue.
//!
//! Everything that can change a session arrives here: screen outcomes, back
//! presses, the ring timeout, and playback connection changes. The session
//! processes them one at a time, in delivery order.

use std::fmt;

use tokio::sync::mpsc;
use tracing::debug;

use crate::playback::PlaybackHandle;
use crate::screen::ScreenEvent;

/// An input to the ringing session state machine.
pub enum SessionEvent {
    /// A screen reported its outcome
    Screen(ScreenEvent),
    /// The user pressed back
    Back,
    /// The ring duration elapsed
    TimedOut,
    /// The playback service is bound
    PlaybackConnected(PlaybackHandle),
    /// The playback service went away unexpectedly
    PlaybackDisconnected,
}

impl SessionEvent {
    /// Returns the string representation of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEvent::Screen(event) => event.as_str(),
            SessionEvent::Back => "back",
            SessionEvent::TimedOut => "timed_out",
            SessionEvent::PlaybackConnected(_) => "playback_connected",
            SessionEvent::PlaybackDisconnected => "playback_disconnected",
        }
    }
}

impl fmt::Debug for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Screen(event) => f.debug_tuple("Screen").field(event).finish(),
            SessionEvent::PlaybackConnected(_) => f.write_str("PlaybackConnected(..)"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl From<ScreenEvent> for SessionEvent {
    fn from(event: ScreenEvent) -> Self {
        SessionEvent::Screen(event)
    }
}

// ============================================================================
// EventSender
// ============================================================================

/// Posts events onto a session queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSender {
    /// Posts an event. Events for a session that is gone are discarded.
    pub fn send(&self, event: impl Into<SessionEvent>) {
        let event = event.into();
        let name = event.as_str();
        if self.tx.send(event).is_err() {
            debug!(event = name, "Session queue closed, event discarded");
        }
    }

    /// Posts a back press.
    pub fn back(&self) {
        self.send(SessionEvent::Back);
    }
}

// ============================================================================
// EventQueue
// ============================================================================

/// Single-consumer queue that serializes all session events.
#[derive(Debug)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Returns a sender that posts onto this queue.
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Waits for the next event.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Returns the next event if one is already queued.
    pub fn try_next(&mut self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_delivered_in_order() {
        let mut queue = EventQueue::new();
        let sender = queue.sender();

        sender.send(ScreenEvent::RingingDismissed);
        sender.back();
        sender.send(SessionEvent::TimedOut);

        assert_eq!(queue.try_next().unwrap().as_str(), "ringing_dismissed");
        assert_eq!(queue.try_next().unwrap().as_str(), "back");
        assert_eq!(queue.try_next().unwrap().as_str(), "timed_out");
        assert!(queue.try_next().is_none());
    }

    #[test]
    fn test_send_after_queue_dropped_is_silent() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        drop(queue);

        sender.back();
    }

    #[test]
    fn test_debug_hides_handle() {
        let controller = crate::playback::MockPlaybackController::new();
        let event = SessionEvent::PlaybackConnected(std::sync::Arc::new(controller));
        assert_eq!(format!("{:?}", event), "PlaybackConnected(..)");
        assert_eq!(format!("{:?}", SessionEvent::Back), "back");
    }

    #[tokio::test]
    async fn test_next_waits_for_event() {
        let mut queue = EventQueue::new();
        let sender = queue.sender();

        tokio::spawn(async move {
            sender.send(SessionEvent::TimedOut);
        });

        let event = queue.next().await.unwrap();
        assert!(matches!(event, SessionEvent::TimedOut));
    }
}
