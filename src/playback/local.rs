//! In-process playback service.
//!
//! Stands in for the background service that owns alarm playback. The
//! service runs as a tokio task that consumes [`PlaybackCommand`]s from a
//! channel and publishes a [`PlaybackSnapshot`] through a watch channel. It
//! starts out ringing: playback begins before any session is bound to it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{ConnectionNotifier, PlaybackCommand, PlaybackConnector, PlaybackController};

// ============================================================================
// PlaybackStatus
// ============================================================================

/// What the playback service is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    /// Sound and vibration are on
    Ringing,
    /// Temporarily silent, the alarm is still active
    Silenced,
    /// The user completed the ringing UX, playback stopped
    Completed,
}

/// Observable state of the playback service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    /// True once the UX asked to be allowed to go away
    pub dismiss_allowed: bool,
    /// Number of times the UX reported it went away
    pub ux_dismissed_reports: u32,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Ringing,
            dismiss_allowed: false,
            ux_dismissed_reports: 0,
        }
    }
}

impl PlaybackSnapshot {
    fn apply(&mut self, command: PlaybackCommand) {
        match command {
            PlaybackCommand::StartRinging => {
                if self.status != PlaybackStatus::Completed {
                    self.status = PlaybackStatus::Ringing;
                }
            }
            PlaybackCommand::SilenceRinging => {
                if self.status == PlaybackStatus::Ringing {
                    self.status = PlaybackStatus::Silenced;
                }
            }
            PlaybackCommand::ReportUxCompleted => {
                self.status = PlaybackStatus::Completed;
            }
            PlaybackCommand::ReportUxDismissed => {
                self.ux_dismissed_reports += 1;
                // The UX vanished without the user finishing: keep the alarm going.
                if self.status != PlaybackStatus::Completed && !self.dismiss_allowed {
                    self.status = PlaybackStatus::Ringing;
                }
            }
            PlaybackCommand::RequestAllowDismiss => {
                self.dismiss_allowed = true;
            }
        }
    }
}

// ============================================================================
// LocalPlaybackService
// ============================================================================

/// Handle to the in-process playback service task.
#[derive(Debug, Clone)]
pub struct LocalPlaybackService {
    commands: mpsc::UnboundedSender<PlaybackCommand>,
    snapshot: watch::Receiver<PlaybackSnapshot>,
    connections: Arc<AtomicUsize>,
}

impl LocalPlaybackService {
    /// Spawns the service task. Must be called from within a tokio runtime.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<PlaybackCommand>();
        let (snapshot_tx, snapshot_rx) = watch::channel(PlaybackSnapshot::default());

        let task = tokio::spawn(async move {
            info!("再生サービスを開始しました");
            while let Some(command) = command_rx.recv().await {
                snapshot_tx.send_modify(|snapshot| snapshot.apply(command));
                debug!(%command, status = ?snapshot_tx.borrow().status, "Playback command applied");
            }
            debug!("Playback service stopped");
        });

        let service = Self {
            commands: command_tx,
            snapshot: snapshot_rx,
            connections: Arc::new(AtomicUsize::new(0)),
        };
        (service, task)
    }

    /// Returns the latest published snapshot.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Returns a receiver notified on every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot.clone()
    }

    /// Returns the number of sessions currently bound.
    pub fn active_connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    fn forward(&self, command: PlaybackCommand) {
        if self.commands.send(command).is_err() {
            debug!(%command, "Playback service gone, command ignored");
        }
    }
}

impl PlaybackController for LocalPlaybackService {
    fn start_ringing(&self) {
        self.forward(PlaybackCommand::StartRinging);
    }

    fn silence_ringing(&self) {
        self.forward(PlaybackCommand::SilenceRinging);
    }

    fn report_ux_completed(&self) {
        self.forward(PlaybackCommand::ReportUxCompleted);
    }

    fn report_ux_dismissed(&self) {
        self.forward(PlaybackCommand::ReportUxDismissed);
    }

    fn request_allow_dismiss(&self) {
        self.forward(PlaybackCommand::RequestAllowDismiss);
    }
}

// ============================================================================
// LocalPlaybackConnector
// ============================================================================

/// Binds sessions to a [`LocalPlaybackService`] after a configurable delay.
#[derive(Debug)]
pub struct LocalPlaybackConnector {
    service: LocalPlaybackService,
    bind_delay: Duration,
    bind_task: Option<JoinHandle<()>>,
    bound: Arc<AtomicUsize>,
}

impl LocalPlaybackConnector {
    pub fn new(service: LocalPlaybackService, bind_delay: Duration) -> Self {
        Self {
            service,
            bind_delay,
            bind_task: None,
            bound: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl PlaybackConnector for LocalPlaybackConnector {
    fn bind(&mut self, notifier: ConnectionNotifier) {
        let service = self.service.clone();
        let delay = self.bind_delay;
        let bound = Arc::clone(&self.bound);

        self.bind_task = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            service.connections.fetch_add(1, Ordering::SeqCst);
            bound.fetch_add(1, Ordering::SeqCst);
            notifier.connected(Arc::new(service));
        }));
    }

    fn unbind(&mut self) {
        if let Some(task) = self.bind_task.take() {
            task.abort();
        }
        if self.bound.swap(0, Ordering::SeqCst) > 0 {
            self.service.connections.fetch_sub(1, Ordering::SeqCst);
            debug!("Unbound from playback service");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
