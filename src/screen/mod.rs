//! Screen presentation contract.
//!
//! The session decides which screen is shown; a [`ScreenPresenter`] renders
//! it. Every screen reports exactly one outcome back, asynchronously, as a
//! [`ScreenEvent`] posted onto the session queue.

mod mock;

pub use mock::{MockScreenPresenter, PresenterCall};

use serde::{Deserialize, Serialize};

use crate::types::{AlarmId, MimicKind, ScreenKind};

// ============================================================================
// Screen
// ============================================================================

/// A screen the session asks to show, with the data it is seeded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    /// The alarm is ringing; offers dismiss and snooze
    Ringing { alarm_id: AlarmId },
    /// A mimic game to dismiss the alarm
    MimicGame { alarm_id: AlarmId, mimic: MimicKind },
    /// Offers the mimic result for sharing
    Share { shareable: String },
    /// Confirms the alarm was snoozed
    Snooze,
    /// Explains that no mimic game is enabled
    NoMimic { alarm_id: AlarmId },
    /// Alarm settings editor
    AlarmSettings {
        alarm_id: AlarmId,
        enabled_mimics: Vec<MimicKind>,
    },
    /// Mimic game selection editor
    MimicSettings { enabled_mimics: Vec<MimicKind> },
}

impl Screen {
    /// Returns the kind of this screen.
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Ringing { .. } => ScreenKind::Ringing,
            Screen::MimicGame { .. } => ScreenKind::MimicGame,
            Screen::Share { .. } => ScreenKind::Share,
            Screen::Snooze => ScreenKind::Snooze,
            Screen::NoMimic { .. } => ScreenKind::NoMimic,
            Screen::AlarmSettings { .. } => ScreenKind::AlarmSettings,
            Screen::MimicSettings { .. } => ScreenKind::MimicSettings,
        }
    }
}

/// How a screen enters the navigation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// Replaces the visible screen
    Replace,
    /// Goes on top of the visible screen, which stays reachable with back
    Push,
}

// ============================================================================
// ScreenEvent
// ============================================================================

/// Outcomes reported by screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScreenEvent {
    /// Ringing screen: the user wants to dismiss the alarm
    RingingDismissed,
    /// Ringing screen: the user wants to snooze the alarm
    RingingSnoozed,
    /// Mimic game: won, possibly with something to share
    MimicSucceeded {
        #[serde(default)]
        shareable: Option<String>,
    },
    /// Mimic game: lost or gave up
    MimicFailed,
    /// Mimic game: the user wants to launch a share action right away
    MimicShareRequested,
    /// Share screen: done
    ShareCompleted,
    /// Snooze screen: closed
    SnoozeDismissed,
    /// No-mimic screen: closed, optionally asking for the settings
    NoMimicDismissed {
        #[serde(default)]
        open_settings: bool,
    },
    /// Alarm settings: saved, or closed ignoring changes
    AlarmSettingsSaved,
    /// Alarm settings: alarm deleted, or new alarm cancelled
    AlarmSettingsDiscarded,
    /// Alarm settings: open the mimic settings
    ShowMimicSettings { enabled_mimics: Vec<MimicKind> },
    /// Mimic settings: closed with the selected mimics
    MimicSettingsDismissed { enabled_mimics: Vec<MimicKind> },
}

impl ScreenEvent {
    /// Returns the string representation of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenEvent::RingingDismissed => "ringing_dismissed",
            ScreenEvent::RingingSnoozed => "ringing_snoozed",
            ScreenEvent::MimicSucceeded { .. } => "mimic_succeeded",
            ScreenEvent::MimicFailed => "mimic_failed",
            ScreenEvent::MimicShareRequested => "mimic_share_requested",
            ScreenEvent::ShareCompleted => "share_completed",
            ScreenEvent::SnoozeDismissed => "snooze_dismissed",
            ScreenEvent::NoMimicDismissed { .. } => "no_mimic_dismissed",
            ScreenEvent::AlarmSettingsSaved => "alarm_settings_saved",
            ScreenEvent::AlarmSettingsDiscarded => "alarm_settings_discarded",
            ScreenEvent::ShowMimicSettings { .. } => "show_mimic_settings",
            ScreenEvent::MimicSettingsDismissed { .. } => "mimic_settings_dismissed",
        }
    }
}

// ============================================================================
// ScreenPresenter
// ============================================================================

/// Renders the screens a ringing session asks for.
pub trait ScreenPresenter: Send {
    /// Shows a screen.
    fn present(&mut self, screen: &Screen, presentation: Presentation);

    /// Removes the top screen, revealing the one pushed under it.
    fn pop(&mut self);

    /// Updates the existing alarm settings screen with a new mimic selection.
    fn update_alarm_settings(&mut self, enabled_mimics: &[MimicKind]);

    /// Hands a back press to the visible screen's own back handler.
    fn forward_back(&mut self, screen: ScreenKind);

    /// Tears down all screens of the session.
    fn close(&mut self);
}
