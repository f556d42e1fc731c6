//! Alarm Ringing Session Library
//!
//! This library drives the UI session shown while an alarm rings:
//! - Ringing session state machine with a serialized event queue
//! - Navigation between the ringing, mimic game, share, snooze, no-mimic
//!   and settings screens
//! - Ring duration timeout
//! - Connection and commands to the background playback service
//! - Alarm storage and mimic game selection
//! - Configuration and a scripted CLI simulator

pub mod alarm;
pub mod cli;
pub mod config;
pub mod error;
pub mod playback;
pub mod screen;
pub mod session;
pub mod timeout;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{AlarmId, MimicKind, RingDuration, ScreenKind, SessionState};

pub use config::RingingConfig;
pub use error::RingingError;

// Re-export session types
pub use session::{
    EventQueue, EventSender, NavigationStack, RingingSession, SessionContext, SessionEvent,
    SessionRunner, SessionSummary,
};

// Re-export collaborator contracts
pub use alarm::{Alarm, AlarmStore, MimicSelector};
pub use playback::{PlaybackCommand, PlaybackConnector, PlaybackController, PlaybackHandle};
pub use screen::{Presentation, Screen, ScreenEvent, ScreenPresenter};
pub use timeout::{TimeoutHandle, TimeoutScheduler};
