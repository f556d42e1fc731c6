//! Scripted ringing sessions.
//!
//! Wires a session to the in-process collaborators: an in-memory alarm
//! store, the local playback service, tokio timeouts and random mimic
//! selection. The script's steps are posted onto the session queue one by
//! one, draining the queue after each step.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use super::commands::SimulateArgs;
use super::presenter::ConsolePresenter;
use super::script::{Script, ScriptStep};
use crate::alarm::{
    AlarmRecord, AlarmStatus, InMemoryAlarmStore, MimicSelector, RandomMimicSelector,
};
use crate::config::RingingConfig;
use crate::playback::{LocalPlaybackConnector, LocalPlaybackService, PlaybackSnapshot};
use crate::session::{SessionContext, SessionRunner, SessionSummary};
use crate::timeout::TokioTimeoutScheduler;

/// Outcome of a simulated session.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub summary: SessionSummary,
    /// Final state of the playback service
    pub playback: PlaybackSnapshot,
    /// Stored status of the rung alarm, if it exists
    pub alarm_status: Option<AlarmStatus>,
}

/// Runs the script named in `args` and returns the outcome.
pub async fn simulate(args: &SimulateArgs) -> Result<SimulationReport> {
    let mut config = RingingConfig::load_or_default(args.config.as_deref())
        .context("設定の読み込みに失敗しました")?;
    if let Some(millis) = args.duration_ms {
        config = config.with_ring_duration_ms(millis);
    }

    let script = Script::load(&args.script)?;
    run_script(&script, args, &config).await
}

/// Runs a parsed script.
pub async fn run_script(
    script: &Script,
    args: &SimulateArgs,
    config: &RingingConfig,
) -> Result<SimulationReport> {
    let mimics = args
        .mimics
        .clone()
        .or_else(|| script.mimics.clone())
        .unwrap_or_else(|| config.default_mimics.clone());

    let store = InMemoryAlarmStore::new();
    let simulated = store.insert(AlarmRecord::new(script.label.clone()).with_mimics(mimics));
    let alarm_id = args.alarm_id.unwrap_or(simulated);

    let (service, service_task) = LocalPlaybackService::spawn();
    let playback = service.subscribe();

    let selector: Box<dyn MimicSelector> = match args.seed {
        Some(seed) => Box::new(RandomMimicSelector::with_seed(seed)),
        None => Box::new(RandomMimicSelector::new()),
    };
    let presenter = if args.json {
        ConsolePresenter::quiet()
    } else {
        ConsolePresenter::new()
    };

    let context = SessionContext {
        store: Arc::new(store.clone()),
        presenter: Box::new(presenter),
        connector: Box::new(LocalPlaybackConnector::new(
            service,
            Duration::from_millis(config.playback_bind_delay_ms),
        )),
        scheduler: Box::new(TokioTimeoutScheduler::new()),
        selector,
    };

    let mut runner = SessionRunner::start(alarm_id, config.ring_duration(), context)?;
    let sender = runner.sender();
    info!(
        steps = script.steps.len(),
        wait_ms = script.total_wait_ms(),
        "スクリプトを実行します"
    );

    for (index, step) in script.steps.iter().enumerate() {
        tokio::task::yield_now().await;
        runner.process_pending();

        if runner.session().is_finished() {
            debug!(
                remaining = script.steps.len() - index,
                "Session finished, remaining steps skipped"
            );
            break;
        }

        match step {
            ScriptStep::Screen(event) => sender.send(event.clone()),
            ScriptStep::Back => sender.back(),
            ScriptStep::Wait { ms } => tokio::time::sleep(Duration::from_millis(*ms)).await,
        }
        runner.process_pending();
    }

    tokio::task::yield_now().await;
    runner.process_pending();

    let summary = runner.shutdown();
    drop(sender);

    // The service stops once every session-side handle is gone.
    service_task.await.context("再生サービスが異常終了しました")?;
    let playback = playback.borrow().clone();

    info!(state = %summary.state, timed_out = summary.timed_out, "Simulation complete");

    Ok(SimulationReport {
        alarm_status: store.status(alarm_id),
        summary,
        playback,
    })
}
