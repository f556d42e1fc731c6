//! Playback controller contract.
//!
//! The actual alarm audio and vibration live in a long-running background
//! service. A ringing session only adjusts that playback: it silences it when
//! the user leaves the ringing screen, resumes it when the user comes back,
//! and reports how the ringing UX ended.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  bind/unbind   ┌─────────────────────┐
//! │  RingingSession  │───────────────▶│  PlaybackConnector  │
//! │                  │                └──────────┬──────────┘
//! │                  │   Connected(handle)       │ (async)
//! │   event queue    │◀──────────────────────────┘
//! │                  │
//! │ PlaybackConnection ── commands ──▶ PlaybackController
//! └──────────────────┘                 (background service)
//! ```
//!
//! Connection establishment is asynchronous. Until the connector posts the
//! handle onto the session queue, commands are dropped rather than queued:
//! the service is already producing sound on its own.

mod connection;
mod local;
mod mock;

pub use connection::{ConnectionNotifier, ConnectionState, PlaybackConnection};
pub use local::{LocalPlaybackConnector, LocalPlaybackService, PlaybackSnapshot, PlaybackStatus};
pub use mock::{MockPlaybackConnector, MockPlaybackController};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Commands a ringing session sends to the playback service.
pub trait PlaybackController: Send + Sync {
    /// Starts (or resumes) alarm playback.
    fn start_ringing(&self);

    /// Silences alarm playback without ending the alarm.
    fn silence_ringing(&self);

    /// Reports that the user completed the ringing UX.
    fn report_ux_completed(&self);

    /// Reports that the ringing UX went away.
    fn report_ux_dismissed(&self);

    /// Asks the service to allow the UX to be dismissed.
    fn request_allow_dismiss(&self);
}

/// Shared handle to a bound playback controller.
pub type PlaybackHandle = Arc<dyn PlaybackController>;

/// Establishes and releases connections to the playback service.
///
/// `bind` may complete at any later time; the connector reports readiness
/// and unexpected loss through the [`ConnectionNotifier`].
pub trait PlaybackConnector: Send {
    /// Starts binding to the playback service.
    fn bind(&mut self, notifier: ConnectionNotifier);

    /// Releases the connection, bound or not.
    fn unbind(&mut self);
}

/// Playback commands, as recorded or forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackCommand {
    StartRinging,
    SilenceRinging,
    ReportUxCompleted,
    ReportUxDismissed,
    RequestAllowDismiss,
}

impl PlaybackCommand {
    /// Returns the string representation of the command.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackCommand::StartRinging => "start_ringing",
            PlaybackCommand::SilenceRinging => "silence_ringing",
            PlaybackCommand::ReportUxCompleted => "report_ux_completed",
            PlaybackCommand::ReportUxDismissed => "report_ux_dismissed",
            PlaybackCommand::RequestAllowDismiss => "request_allow_dismiss",
        }
    }

    /// Sends this command to a controller.
    pub fn apply(self, controller: &dyn PlaybackController) {
        match self {
            PlaybackCommand::StartRinging => controller.start_ringing(),
            PlaybackCommand::SilenceRinging => controller.silence_ringing(),
            PlaybackCommand::ReportUxCompleted => controller.report_ux_completed(),
            PlaybackCommand::ReportUxDismissed => controller.report_ux_dismissed(),
            PlaybackCommand::RequestAllowDismiss => controller.request_allow_dismiss(),
        }
    }
}

impl fmt::Display for PlaybackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
