//! Core data types for the alarm ringing session.
//!
//! This module defines the data structures used for:
//! - Alarm identification
//! - Ring duration handling (including the "no cap" case)
//! - Mimic game kinds
//! - Session states and the screens that mirror them

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// AlarmId
// ============================================================================

/// Opaque identifier of the alarm instance being rung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmId(Uuid);

impl AlarmId {
    /// Creates a new random alarm identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AlarmId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AlarmId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ============================================================================
// RingDuration
// ============================================================================

/// Default ring duration in milliseconds (two hours).
pub const DEFAULT_RING_DURATION_MS: i64 = 2 * 60 * 60 * 1000;

/// Maximum time an alarm is allowed to ring before timing out.
///
/// Zero or negative values mean there is no automatic timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RingDuration {
    millis: i64,
}

impl RingDuration {
    /// No automatic timeout.
    pub const UNLIMITED: RingDuration = RingDuration { millis: 0 };

    /// Creates a ring duration from milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Returns the configured milliseconds as given.
    pub fn as_millis(&self) -> i64 {
        self.millis
    }

    /// Returns true if the session should time out at all.
    pub fn is_capped(&self) -> bool {
        self.millis > 0
    }

    /// Returns the timeout to schedule, or `None` when uncapped.
    pub fn as_timeout(&self) -> Option<Duration> {
        u64::try_from(self.millis)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

impl Default for RingDuration {
    fn default() -> Self {
        Self::from_millis(DEFAULT_RING_DURATION_MS)
    }
}

// ============================================================================
// MimicKind
// ============================================================================

/// The mimic games an alarm may require before it can be dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MimicKind {
    /// Photograph something of a requested color
    ColorCapture,
    /// Copy a facial expression
    ExpressionMimic,
    /// Read a tongue twister aloud
    TongueTwister,
}

impl MimicKind {
    /// All mimic kinds, in display order.
    pub const ALL: [MimicKind; 3] = [
        MimicKind::ColorCapture,
        MimicKind::ExpressionMimic,
        MimicKind::TongueTwister,
    ];

    /// Returns the string representation of the mimic kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MimicKind::ColorCapture => "color_capture",
            MimicKind::ExpressionMimic => "expression_mimic",
            MimicKind::TongueTwister => "tongue_twister",
        }
    }
}

impl fmt::Display for MimicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MimicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MimicKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("不明なミミックです: {}", s))
    }
}

// ============================================================================
// ScreenKind
// ============================================================================

/// The screens a ringing session can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Ringing,
    MimicGame,
    Share,
    Snooze,
    NoMimic,
    AlarmSettings,
    MimicSettings,
}

impl ScreenKind {
    /// Returns the session state shown by this screen.
    pub fn session_state(&self) -> SessionState {
        match self {
            ScreenKind::Ringing => SessionState::Ringing,
            ScreenKind::MimicGame => SessionState::PlayingMimic,
            ScreenKind::Share => SessionState::Sharing,
            ScreenKind::Snooze => SessionState::Snoozing,
            ScreenKind::NoMimic => SessionState::NoMimicAvailable,
            ScreenKind::AlarmSettings => SessionState::EditingAlarmSettings,
            ScreenKind::MimicSettings => SessionState::EditingMimicSettings,
        }
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Represents the current state of a ringing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// The alarm is ringing
    Ringing,
    /// A mimic game is being played
    PlayingMimic,
    /// The mimic result is offered for sharing
    Sharing,
    /// The alarm was snoozed
    Snoozing,
    /// The alarm was dismissed but has no mimic game enabled
    NoMimicAvailable,
    /// Alarm settings are being edited
    EditingAlarmSettings,
    /// Mimic settings are being edited
    EditingMimicSettings,
    /// The session is over
    Finished,
}

impl SessionState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Ringing => "ringing",
            SessionState::PlayingMimic => "playing_mimic",
            SessionState::Sharing => "sharing",
            SessionState::Snoozing => "snoozing",
            SessionState::NoMimicAvailable => "no_mimic_available",
            SessionState::EditingAlarmSettings => "editing_alarm_settings",
            SessionState::EditingMimicSettings => "editing_mimic_settings",
            SessionState::Finished => "finished",
        }
    }

    /// Returns true if the session has reached its terminal state.
    pub fn is_terminal(&self) -> bool {
        *self == SessionState::Finished
    }

    /// Returns true if a settings screen is shown.
    pub fn is_editing_settings(&self) -> bool {
        matches!(
            self,
            SessionState::EditingAlarmSettings | SessionState::EditingMimicSettings
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // AlarmId Tests
    // ------------------------------------------------------------------------

    mod alarm_id_tests {
        use super::*;

        #[test]
        fn test_new_ids_are_unique() {
            assert_ne!(AlarmId::new(), AlarmId::new());
        }

        #[test]
        fn test_parse_and_display() {
            let text = "67e55044-10b1-426f-9247-bb680e5fe0c8";
            let id: AlarmId = text.parse().unwrap();
            assert_eq!(id.to_string(), text);
        }

        #[test]
        fn test_parse_invalid() {
            assert!("not-a-uuid".parse::<AlarmId>().is_err());
        }

        #[test]
        fn test_serializes_as_plain_string() {
            let id: AlarmId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, "\"67e55044-10b1-426f-9247-bb680e5fe0c8\"");
        }
    }

    // ------------------------------------------------------------------------
    // RingDuration Tests
    // ------------------------------------------------------------------------

    mod ring_duration_tests {
        use super::*;

        #[test]
        fn test_default_is_two_hours() {
            assert_eq!(RingDuration::default().as_millis(), 7_200_000);
        }

        #[test]
        fn test_positive_duration_is_capped() {
            let duration = RingDuration::from_millis(5000);
            assert!(duration.is_capped());
            assert_eq!(duration.as_timeout(), Some(Duration::from_millis(5000)));
        }

        #[test]
        fn test_zero_means_unlimited() {
            assert!(!RingDuration::UNLIMITED.is_capped());
            assert_eq!(RingDuration::UNLIMITED.as_timeout(), None);
        }

        #[test]
        fn test_negative_means_unlimited() {
            let duration = RingDuration::from_millis(-1);
            assert!(!duration.is_capped());
            assert_eq!(duration.as_timeout(), None);
        }
    }

    // ------------------------------------------------------------------------
    // MimicKind Tests
    // ------------------------------------------------------------------------

    mod mimic_kind_tests {
        use super::*;

        #[test]
        fn test_from_str_round_trips_all() {
            for kind in MimicKind::ALL {
                assert_eq!(kind.as_str().parse::<MimicKind>().unwrap(), kind);
            }
        }

        #[test]
        fn test_from_str_unknown() {
            let err = "juggling".parse::<MimicKind>().unwrap_err();
            assert!(err.contains("juggling"));
        }

        #[test]
        fn test_serde_name_matches_as_str() {
            let json = serde_json::to_string(&MimicKind::TongueTwister).unwrap();
            assert_eq!(json, "\"tongue_twister\"");
        }
    }

    // ------------------------------------------------------------------------
    // SessionState Tests
    // ------------------------------------------------------------------------

    mod session_state_tests {
        use super::*;

        #[test]
        fn test_only_finished_is_terminal() {
            assert!(SessionState::Finished.is_terminal());
            assert!(!SessionState::Ringing.is_terminal());
            assert!(!SessionState::Snoozing.is_terminal());
        }

        #[test]
        fn test_screen_kind_maps_to_state() {
            assert_eq!(ScreenKind::Ringing.session_state(), SessionState::Ringing);
            assert_eq!(
                ScreenKind::MimicGame.session_state(),
                SessionState::PlayingMimic
            );
            assert_eq!(
                ScreenKind::MimicSettings.session_state(),
                SessionState::EditingMimicSettings
            );
        }

        #[test]
        fn test_is_editing_settings() {
            assert!(SessionState::EditingAlarmSettings.is_editing_settings());
            assert!(SessionState::EditingMimicSettings.is_editing_settings());
            assert!(!SessionState::NoMimicAvailable.is_editing_settings());
        }

        #[test]
        fn test_display() {
            assert_eq!(SessionState::PlayingMimic.to_string(), "playing_mimic");
        }
    }
}
