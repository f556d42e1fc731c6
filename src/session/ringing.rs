//! Ringing session state machine.
//!
//! One [`RingingSession`] exists per fired alarm. It owns the navigation
//! stack, the ring timeout, and the connection to the playback service, and
//! turns every [`SessionEvent`] into screen changes and playback commands.
//!
//! State transitions are looked up by `(state, event)`; a pair that has no
//! entry is ignored.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::event::{EventSender, SessionEvent};
use super::navigation::NavigationStack;
use crate::alarm::{Alarm, AlarmStore, MimicSelector};
use crate::error::RingingError;
use crate::playback::{
    ConnectionNotifier, ConnectionState, PlaybackCommand, PlaybackConnection, PlaybackConnector,
};
use crate::screen::{Presentation, Screen, ScreenEvent, ScreenPresenter};
use crate::timeout::{TimeoutHandle, TimeoutScheduler};
use crate::types::{AlarmId, MimicKind, RingDuration, ScreenKind, SessionState};

// ============================================================================
// SessionContext
// ============================================================================

/// Collaborators a ringing session works with.
pub struct SessionContext {
    /// Where the alarm is resolved from
    pub store: Arc<dyn AlarmStore>,
    /// Renders the screens
    pub presenter: Box<dyn ScreenPresenter>,
    /// Binds to the playback service
    pub connector: Box<dyn PlaybackConnector>,
    /// Schedules the ring timeout
    pub scheduler: Box<dyn TimeoutScheduler>,
    /// Picks the mimic game to play
    pub selector: Box<dyn MimicSelector>,
}

// ============================================================================
// SessionSummary
// ============================================================================

/// Outcome of a ringing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub alarm_id: AlarmId,
    pub state: SessionState,
    pub timed_out: bool,
    /// Every state the session went through, in order
    pub history: Vec<SessionState>,
    /// Number of alarm settings screens created
    pub alarm_settings_created: usize,
    /// Playback commands dropped while the service was not bound
    pub dropped_playback_commands: usize,
}

// ============================================================================
// RingingSession
// ============================================================================

/// State machine for one ringing alarm.
pub struct RingingSession {
    alarm: Box<dyn Alarm>,
    alarm_id: AlarmId,
    ring_duration: RingDuration,
    presenter: Box<dyn ScreenPresenter>,
    connector: Box<dyn PlaybackConnector>,
    scheduler: Box<dyn TimeoutScheduler>,
    selector: Box<dyn MimicSelector>,
    playback: PlaybackConnection,
    navigation: NavigationStack,
    timeout: Option<TimeoutHandle>,
    timed_out: bool,
    finished: bool,
    disposed: bool,
    history: Vec<SessionState>,
}

impl RingingSession {
    /// Starts a session for `alarm_id`.
    ///
    /// Shows the ringing screen, schedules the ring timeout when the duration
    /// is capped, and starts binding to the playback service. Timeout and
    /// connection notifications are posted through `events`.
    ///
    /// # Errors
    ///
    /// Returns [`RingingError::AlarmNotFound`] if the alarm cannot be
    /// resolved. The presenter is closed and nothing else is started.
    pub fn start(
        alarm_id: AlarmId,
        ring_duration: RingDuration,
        context: SessionContext,
        events: EventSender,
    ) -> Result<Self, RingingError> {
        let SessionContext {
            store,
            mut presenter,
            connector,
            scheduler,
            selector,
        } = context;

        let Some(alarm) = store.lookup(alarm_id) else {
            warn!(alarm = %alarm_id, "Alarm not found, ringing session aborted");
            presenter.close();
            return Err(RingingError::AlarmNotFound(alarm_id));
        };

        info!(alarm = %alarm_id, ring_ms = ring_duration.as_millis(), "アラームの鳴動セッションを開始します");

        let mut session = Self {
            alarm,
            alarm_id,
            ring_duration,
            presenter,
            connector,
            scheduler,
            selector,
            playback: PlaybackConnection::new(),
            navigation: NavigationStack::new(),
            timeout: None,
            timed_out: false,
            finished: false,
            disposed: false,
            history: Vec::new(),
        };

        session.show(Screen::Ringing { alarm_id }, Presentation::Replace);

        let timeout_events = events.clone();
        let handle = session.scheduler.schedule(
            ring_duration,
            Box::new(move || timeout_events.send(SessionEvent::TimedOut)),
        );
        if handle.is_scheduled() {
            session.timeout = Some(handle);
        }

        session.connector.bind(ConnectionNotifier::new(events));

        Ok(session)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the current state, derived from the visible screen.
    pub fn state(&self) -> SessionState {
        if self.finished {
            return SessionState::Finished;
        }
        self.navigation
            .top()
            .map(|kind| kind.session_state())
            .unwrap_or(SessionState::Finished)
    }

    pub fn alarm_id(&self) -> AlarmId {
        self.alarm_id
    }

    pub fn ring_duration(&self) -> RingDuration {
        self.ring_duration
    }

    /// Returns true once the ring timeout has fired.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns true while a ring timeout is outstanding.
    pub fn timeout_pending(&self) -> bool {
        self.timeout.is_some()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.playback.state()
    }

    /// Returns every state the session went through.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    /// Returns the number of alarm settings screens created so far.
    pub fn alarm_settings_created(&self) -> usize {
        self.navigation.created(ScreenKind::AlarmSettings)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            alarm_id: self.alarm_id,
            state: self.state(),
            timed_out: self.timed_out,
            history: self.history.clone(),
            alarm_settings_created: self.alarm_settings_created(),
            dropped_playback_commands: self.playback.dropped_commands(),
        }
    }

    // ------------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------------

    /// Processes one event.
    pub fn handle(&mut self, event: SessionEvent) {
        if self.finished {
            debug!(event = event.as_str(), "Session finished, event ignored");
            return;
        }

        match event {
            SessionEvent::Screen(event) => self.dispatch(event),
            SessionEvent::Back => self.on_back(),
            SessionEvent::TimedOut => self.on_timed_out(),
            SessionEvent::PlaybackConnected(handle) => {
                debug!("Playback service bound");
                self.playback.attach(handle);
            }
            SessionEvent::PlaybackDisconnected => {
                warn!("Playback service disconnected");
                self.playback.detach();
            }
        }
    }

    fn dispatch(&mut self, event: ScreenEvent) {
        let state = self.state();
        let name = event.as_str();
        debug!(%state, event = name, "Screen event");

        match (state, event) {
            (SessionState::Ringing, ScreenEvent::RingingDismissed) => self.on_ringing_dismissed(),
            (SessionState::Ringing, ScreenEvent::RingingSnoozed) => self.on_ringing_snoozed(),
            (SessionState::PlayingMimic, ScreenEvent::MimicSucceeded { shareable }) => {
                self.on_mimic_succeeded(shareable)
            }
            (SessionState::PlayingMimic, ScreenEvent::MimicFailed) => self.on_mimic_failed(),
            (SessionState::PlayingMimic, ScreenEvent::MimicShareRequested) => {
                self.playback.send(PlaybackCommand::RequestAllowDismiss)
            }
            (SessionState::Sharing, ScreenEvent::ShareCompleted) => self.finish(),
            (SessionState::Snoozing, ScreenEvent::SnoozeDismissed) => self.finish(),
            (SessionState::NoMimicAvailable, ScreenEvent::NoMimicDismissed { open_settings }) => {
                self.on_no_mimic_dismissed(open_settings)
            }
            (SessionState::EditingAlarmSettings, ScreenEvent::ShowMimicSettings { enabled_mimics }) => {
                self.show(Screen::MimicSettings { enabled_mimics }, Presentation::Push)
            }
            (
                SessionState::EditingAlarmSettings,
                ScreenEvent::AlarmSettingsSaved | ScreenEvent::AlarmSettingsDiscarded,
            ) => self.finish(),
            (
                SessionState::EditingMimicSettings,
                ScreenEvent::MimicSettingsDismissed { enabled_mimics },
            ) => self.on_mimic_settings_dismissed(enabled_mimics),
            (state, _) => debug!(%state, event = name, "No transition, event ignored"),
        }
    }

    fn on_ringing_dismissed(&mut self) {
        self.playback.send(PlaybackCommand::SilenceRinging);

        let enabled = self.alarm.enabled_mimics();
        match self.selector.select(&enabled) {
            Some(mimic) => {
                let alarm_id = self.alarm_id;
                self.show(Screen::MimicGame { alarm_id, mimic }, Presentation::Replace);
            }
            None => {
                self.alarm.mark_dismissed();
                self.cancel_timeout();
                let alarm_id = self.alarm_id;
                self.show(Screen::NoMimic { alarm_id }, Presentation::Replace);
            }
        }
    }

    fn on_ringing_snoozed(&mut self) {
        self.playback.send(PlaybackCommand::SilenceRinging);
        self.cancel_timeout();
        self.alarm.mark_snoozed();
        self.show(Screen::Snooze, Presentation::Replace);
    }

    fn on_mimic_succeeded(&mut self, shareable: Option<String>) {
        self.alarm.mark_dismissed();
        self.cancel_timeout();

        match shareable.filter(|content| !content.is_empty()) {
            Some(shareable) => self.show(Screen::Share { shareable }, Presentation::Replace),
            None => self.finish(),
        }
    }

    /// Mimic lost: ring again unless the time is up.
    fn on_mimic_failed(&mut self) {
        if self.timed_out {
            self.finish();
            return;
        }
        self.ring_again();
    }

    fn ring_again(&mut self) {
        let alarm_id = self.alarm_id;
        self.show(Screen::Ringing { alarm_id }, Presentation::Replace);
        self.playback.send(PlaybackCommand::StartRinging);
    }

    fn on_no_mimic_dismissed(&mut self, open_settings: bool) {
        if !open_settings {
            self.finish();
            return;
        }
        let enabled_mimics = self.alarm.enabled_mimics();
        self.show(Screen::MimicSettings { enabled_mimics }, Presentation::Replace);
    }

    fn on_mimic_settings_dismissed(&mut self, enabled_mimics: Vec<MimicKind>) {
        if self.navigation.contains(ScreenKind::AlarmSettings) {
            // Opened from the alarm settings: go back to them and refresh.
            self.navigation.pop();
            self.presenter.pop();
            self.presenter.update_alarm_settings(&enabled_mimics);
            self.record_state();
        } else {
            let alarm_id = self.alarm_id;
            self.show(
                Screen::AlarmSettings {
                    alarm_id,
                    enabled_mimics,
                },
                Presentation::Replace,
            );
        }
    }

    fn on_back(&mut self) {
        match self.state() {
            // Leaving the game always rings again, even after the timeout.
            SessionState::PlayingMimic => self.ring_again(),
            SessionState::EditingAlarmSettings => {
                self.presenter.forward_back(ScreenKind::AlarmSettings)
            }
            SessionState::EditingMimicSettings => {
                if self.navigation.contains(ScreenKind::AlarmSettings) {
                    self.navigation.pop();
                    self.presenter.pop();
                    self.record_state();
                } else {
                    self.presenter.forward_back(ScreenKind::MimicSettings);
                }
            }
            SessionState::Ringing | SessionState::Finished => {
                debug!("Back ignored while ringing");
            }
            SessionState::Sharing | SessionState::Snoozing | SessionState::NoMimicAvailable => {
                self.finish()
            }
        }
    }

    fn on_timed_out(&mut self) {
        if self.timeout.take().is_none() || self.timed_out {
            debug!("Stale timeout ignored");
            return;
        }

        self.timed_out = true;
        info!(alarm = %self.alarm_id, "鳴動時間が経過しました");

        if self.state() != SessionState::PlayingMimic {
            self.finish();
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn show(&mut self, screen: Screen, presentation: Presentation) {
        match presentation {
            Presentation::Replace => self.navigation.replace(screen.kind()),
            Presentation::Push => self.navigation.push(screen.kind()),
        }
        self.presenter.present(&screen, presentation);
        self.record_state();
    }

    fn record_state(&mut self) {
        let state = self.state();
        if self.history.last() != Some(&state) {
            debug!(%state, "Session state changed");
            self.history.push(state);
        }
    }

    fn cancel_timeout(&mut self) {
        if let Some(handle) = self.timeout.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.cancel_timeout();
        // Only reached through user action or the ring timeout.
        self.playback.send(PlaybackCommand::ReportUxCompleted);
        self.finished = true;
        self.navigation.clear();
        self.presenter.close();
        self.record_state();
        info!(alarm = %self.alarm_id, timed_out = self.timed_out, "アラームの鳴動セッションを終了しました");
    }

    /// Tears the session down: reports the UX as dismissed and releases the
    /// playback connection. Runs once; later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if !self.finished {
            warn!(alarm = %self.alarm_id, state = %self.state(), "Session disposed before finishing");
        }
        self.cancel_timeout();
        self.playback.send(PlaybackCommand::ReportUxDismissed);
        self.connector.unbind();
        self.playback.detach();
    }
}

impl Drop for RingingSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ============================================================================
// Tests
// ============================================================================
