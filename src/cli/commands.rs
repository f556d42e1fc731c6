//! Command definitions for the alarm ringing CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{AlarmId, MimicKind};

// ============================================================================
// CLI Structure
// ============================================================================

/// Alarm ringing session simulator
#[derive(Parser, Debug)]
#[command(
    name = "alarm-ringing",
    version,
    about = "アラーム鳴動セッションのシミュレーター",
    long_about = "鳴動画面、ミミックゲーム、スヌーズ、設定画面を巡るアラーム鳴動セッションを\n\
                  スクリプトに従って実行し、画面遷移と再生サービスへの指示を表示します。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a scripted ringing session
    Simulate(SimulateArgs),

    /// Show the effective configuration
    Config {
        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Simulate Command Arguments
// ============================================================================

/// Arguments for the simulate command
#[derive(Args, Debug, Clone, Default)]
pub struct SimulateArgs {
    /// Script of screen events to play (JSON)
    pub script: PathBuf,

    /// Ring duration in milliseconds; 0 rings until the user acts
    #[arg(short, long, value_parser = validate_duration)]
    pub duration_ms: Option<i64>,

    /// Comma-separated mimic games enabled for the alarm
    #[arg(short, long, value_delimiter = ',')]
    pub mimics: Option<Vec<MimicKind>>,

    /// Seed for mimic selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ring an alarm id instead of the simulated alarm
    #[arg(long)]
    pub alarm_id: Option<AlarmId>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the ring duration.
///
/// - Must be a number
/// - Must not exceed 24 hours
fn validate_duration(s: &str) -> Result<i64, String> {
    let millis: i64 = s
        .parse()
        .map_err(|_| format!("鳴動時間は数値で指定してください: {}", s))?;
    if millis > crate::config::MAX_RING_DURATION_MS {
        return Err("鳴動時間は24時間以内にしてください".to_string());
    }
    Ok(millis)
}

// ============================================================================
// Tests
// ============================================================================
