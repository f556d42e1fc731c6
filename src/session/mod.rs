//! Ringing session: the state machine behind a fired alarm.
//!
//! A session starts on the ringing screen and walks through the mimic game,
//! share, snooze, no-mimic and settings screens until the user is done or
//! the ring duration runs out.
//!
//! # Architecture
//!
//! ```text
//! screens ──┐
//! back ─────┤
//! timeout ──┼──▶ EventQueue ──▶ RingingSession ──▶ ScreenPresenter
//! connector ┘                        │
//!                                    └──────────▶ PlaybackController
//! ```
//!
//! Every input is an event on one queue; the session is the only consumer,
//! so transitions never overlap.

mod event;
mod navigation;
mod ringing;
mod runner;

pub use event::{EventQueue, EventSender, SessionEvent};
pub use navigation::NavigationStack;
pub use ringing::{RingingSession, SessionContext, SessionSummary};
pub use runner::SessionRunner;
