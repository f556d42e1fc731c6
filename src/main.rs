//! Alarm Ringing CLI - runs ringing sessions from scripts
//!
//! A ringing session walks the user from the ringing screen through a mimic
//! game, sharing, snoozing or the alarm settings, and tells the playback
//! service when to go quiet, when to ring again and when the user is done.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use alarm_ringing::cli::{simulate, Cli, Commands, Display};
use alarm_ringing::config::RingingConfig;
use alarm_ringing::error::RingingError;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        if let Some(err) = e.downcast_ref::<RingingError>() {
            Display::show_suggestion(err.suggestion());
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so that JSON output on stdout stays clean.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Simulate(args)) => {
            let report = simulate(&args).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                Display::show_report(&report);
            }
        }
        Some(Commands::Config { config }) => {
            let path = config.or_else(RingingConfig::default_path);
            let loaded = RingingConfig::load_or_default(path.as_deref())?;
            let shown = path.as_deref().filter(|path| path.exists());
            Display::show_config(&loaded, shown);
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
