//! Integration tests for the session runner with the in-process services.
//!
//! These tests run sessions on a paused tokio clock against the local
//! playback service and tokio timeouts:
//! - TC-R-001: Ring timeout finishes an idle session
//! - TC-R-002: Late playback binding drops early commands
//! - TC-R-003: Timeout racing a user action
//! - TC-R-004: Independent sessions side by side

use std::sync::Arc;
use std::time::Duration;

use alarm_ringing::alarm::{AlarmRecord, AlarmStatus, FirstMimicSelector, InMemoryAlarmStore};
use alarm_ringing::playback::{LocalPlaybackConnector, LocalPlaybackService, PlaybackStatus};
use alarm_ringing::screen::{MockScreenPresenter, ScreenEvent};
use alarm_ringing::session::{SessionContext, SessionRunner};
use alarm_ringing::timeout::TokioTimeoutScheduler;
use alarm_ringing::types::{AlarmId, MimicKind, RingDuration, SessionState};

// ============================================================================
// Test Helpers
// ============================================================================

struct Setup {
    runner: SessionRunner,
    store: InMemoryAlarmStore,
    alarm_id: AlarmId,
    service: LocalPlaybackService,
}

fn setup(duration_ms: i64, bind_delay_ms: u64) -> Setup {
    let store = InMemoryAlarmStore::new();
    let alarm_id =
        store.insert(AlarmRecord::new("Wake up").with_mimics(vec![MimicKind::ColorCapture]));
    let (service, _task) = LocalPlaybackService::spawn();

    let context = SessionContext {
        store: Arc::new(store.clone()),
        presenter: Box::new(MockScreenPresenter::new()),
        connector: Box::new(LocalPlaybackConnector::new(
            service.clone(),
            Duration::from_millis(bind_delay_ms),
        )),
        scheduler: Box::new(TokioTimeoutScheduler::new()),
        selector: Box::new(FirstMimicSelector),
    };
    let runner = SessionRunner::start(alarm_id, RingDuration::from_millis(duration_ms), context)
        .expect("alarm exists");

    Setup {
        runner,
        store,
        alarm_id,
        service,
    }
}

/// Lets spawned tasks run until the playback service has caught up.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// TC-R-001: Ring timeout
// ============================================================================

#[tokio::test(start_paused = true)]
async fn tc_r_001_timeout_finishes_idle_session() {
    let setup = setup(5000, 0);
    let started = tokio::time::Instant::now();

    let summary = setup.runner.run().await;
    settle().await;

    assert!(summary.timed_out);
    assert_eq!(summary.state, SessionState::Finished);
    assert!(started.elapsed() >= Duration::from_millis(5000));
    assert_eq!(setup.service.snapshot().status, PlaybackStatus::Completed);
    assert_eq!(setup.service.snapshot().ux_dismissed_reports, 1);
    assert_eq!(setup.service.active_connections(), 0);
    assert_eq!(setup.store.status(setup.alarm_id), Some(AlarmStatus::Pending));
}

// ============================================================================
// TC-R-002: Late binding
// ============================================================================

#[tokio::test(start_paused = true)]
async fn tc_r_002_commands_before_binding_are_dropped() {
    let Setup {
        mut runner,
        service,
        ..
    } = setup(0, 1000);
    let sender = runner.sender();

    sender.send(ScreenEvent::RingingDismissed);
    runner.process_pending();
    settle().await;
    assert_eq!(service.snapshot().status, PlaybackStatus::Ringing);
    assert_eq!(runner.session().summary().dropped_playback_commands, 1);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    runner.process_pending();
    assert_eq!(service.active_connections(), 1);

    sender.send(ScreenEvent::MimicSucceeded { shareable: None });
    let summary = runner.run().await;
    settle().await;

    assert_eq!(summary.state, SessionState::Finished);
    assert_eq!(service.snapshot().status, PlaybackStatus::Completed);
    assert_eq!(service.active_connections(), 0);
}

// ============================================================================
// TC-R-003: Timeout racing a user action
// ============================================================================

#[tokio::test(start_paused = true)]
async fn tc_r_003_user_action_before_timeout_wins() {
    let Setup { runner, store, alarm_id, .. } = setup(5000, 0);
    let sender = runner.sender();

    let task = tokio::spawn(runner.run());
    tokio::time::sleep(Duration::from_millis(4000)).await;
    sender.send(ScreenEvent::RingingSnoozed);
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert!(!task.is_finished());

    sender.send(ScreenEvent::SnoozeDismissed);
    let summary = task.await.unwrap();

    assert!(!summary.timed_out);
    assert_eq!(
        summary.history,
        vec![
            SessionState::Ringing,
            SessionState::Snoozing,
            SessionState::Finished
        ]
    );
    assert_eq!(store.status(alarm_id), Some(AlarmStatus::Snoozed));
}

#[tokio::test(start_paused = true)]
async fn tc_r_003_timeout_during_game_waits_for_outcome() {
    let Setup { runner, service, .. } = setup(5000, 0);
    let sender = runner.sender();
    sender.send(ScreenEvent::RingingDismissed);

    let task = tokio::spawn(runner.run());
    tokio::time::sleep(Duration::from_millis(6000)).await;
    assert!(!task.is_finished());

    sender.send(ScreenEvent::MimicFailed);
    let summary = task.await.unwrap();
    settle().await;

    assert!(summary.timed_out);
    assert_eq!(summary.state, SessionState::Finished);
    assert_eq!(service.snapshot().status, PlaybackStatus::Completed);
}

// ============================================================================
// TC-R-004: Independent sessions
// ============================================================================

#[tokio::test(start_paused = true)]
async fn tc_r_004_sessions_do_not_share_state() {
    let first = setup(1000, 0);
    let second = setup(0, 0);
    let second_sender = second.runner.sender();

    second_sender.send(ScreenEvent::RingingSnoozed);
    second_sender.send(ScreenEvent::SnoozeDismissed);

    let (first_summary, second_summary) = tokio::join!(first.runner.run(), second.runner.run());

    assert!(first_summary.timed_out);
    assert!(!second_summary.timed_out);
    assert_eq!(
        first.store.status(first.alarm_id),
        Some(AlarmStatus::Pending)
    );
    assert_eq!(
        second.store.status(second.alarm_id),
        Some(AlarmStatus::Snoozed)
    );
}
