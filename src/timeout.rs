//! Single-shot timeout scheduling.
//!
//! A ringing session schedules exactly one timeout, at creation, to cap how
//! long the alarm rings. The callback it hands over only posts an event onto
//! the session queue; all state changes happen when that event is processed.
//!
//! Cancelling is idempotent: a handle may be cancelled after its callback
//! fired, several times, or when nothing was ever scheduled because the ring
//! duration was not capped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::types::RingDuration;

/// Callback run when a timeout elapses.
pub type TimeoutCallback = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutHandle {
    id: Option<u64>,
}

impl TimeoutHandle {
    /// A handle for which nothing was scheduled.
    pub const INERT: TimeoutHandle = TimeoutHandle { id: None };

    fn scheduled(id: u64) -> Self {
        Self { id: Some(id) }
    }

    /// Returns true if this handle refers to a scheduled task.
    pub fn is_scheduled(&self) -> bool {
        self.id.is_some()
    }
}

/// Schedules delayed, single-shot callbacks.
pub trait TimeoutScheduler: Send {
    /// Schedules `callback` to run once `after` has elapsed.
    ///
    /// Uncapped durations schedule nothing and return an inert handle.
    fn schedule(&mut self, after: RingDuration, callback: TimeoutCallback) -> TimeoutHandle;

    /// Cancels a scheduled callback. Safe to call any number of times.
    fn cancel(&mut self, handle: TimeoutHandle);
}

// ============================================================================
// TokioTimeoutScheduler
// ============================================================================

/// Timeout scheduler backed by `tokio::time::sleep` tasks.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct TokioTimeoutScheduler {
    next_id: u64,
    tasks: HashMap<u64, JoinHandle<()>>,
}

impl TokioTimeoutScheduler {
    /// Creates a scheduler with no pending tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of timeouts that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }

    fn prune(&mut self) {
        self.tasks.retain(|_, task| !task.is_finished());
    }
}

impl TimeoutScheduler for TokioTimeoutScheduler {
    fn schedule(&mut self, after: RingDuration, callback: TimeoutCallback) -> TimeoutHandle {
        let Some(delay) = after.as_timeout() else {
            debug!("Ring duration is not capped, no timeout scheduled");
            return TimeoutHandle::INERT;
        };

        self.prune();
        self.next_id += 1;
        let id = self.next_id;

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        self.tasks.insert(id, task);

        debug!(timeout_id = id, ?delay, "Timeout scheduled");
        TimeoutHandle::scheduled(id)
    }

    fn cancel(&mut self, handle: TimeoutHandle) {
        let Some(id) = handle.id else {
            return;
        };
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
            debug!(timeout_id = id, "Timeout cancelled");
        }
    }
}

impl Drop for TokioTimeoutScheduler {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}

// ============================================================================
// ManualTimeoutScheduler
// ============================================================================

#[derive(Default)]
struct ManualState {
    next_id: u64,
    pending: Vec<(u64, RingDuration, TimeoutCallback)>,
    scheduled: usize,
    cancelled: usize,
}

/// Scheduler whose timeouts only fire when the owner says so.
///
/// Clones share state, so a test can hand one clone to a session and fire
/// the timeout through another.
#[derive(Clone, Default)]
pub struct ManualTimeoutScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTimeoutScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs every pending callback and returns how many fired.
    pub fn fire_all(&self) -> usize {
        let callbacks: Vec<_> = self.lock().pending.drain(..).collect();
        let fired = callbacks.len();
        for (_, _, callback) in callbacks {
            callback();
        }
        fired
    }

    /// Returns the number of pending callbacks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Returns the number of callbacks ever scheduled.
    #[must_use]
    pub fn schedule_count(&self) -> usize {
        self.lock().scheduled
    }

    /// Returns the number of pending callbacks that were cancelled.
    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.lock().cancelled
    }

    /// Returns the durations of the pending callbacks.
    #[must_use]
    pub fn pending_durations(&self) -> Vec<RingDuration> {
        self.lock().pending.iter().map(|(_, d, _)| *d).collect()
    }
}

impl TimeoutScheduler for ManualTimeoutScheduler {
    fn schedule(&mut self, after: RingDuration, callback: TimeoutCallback) -> TimeoutHandle {
        if !after.is_capped() {
            return TimeoutHandle::INERT;
        }
        let mut state = self.lock();
        state.next_id += 1;
        state.scheduled += 1;
        let id = state.next_id;
        state.pending.push((id, after, callback));
        TimeoutHandle::scheduled(id)
    }

    fn cancel(&mut self, handle: TimeoutHandle) {
        let Some(id) = handle.id else {
            return;
        };
        let mut state = self.lock();
        let before = state.pending.len();
        state.pending.retain(|(pending_id, _, _)| *pending_id != id);
        if state.pending.len() < before {
            state.cancelled += 1;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
