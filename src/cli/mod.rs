//! CLI module for the alarm ringing simulator.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `script`: JSON scripts of user actions
//! - `simulate`: Runs a scripted session against in-process collaborators
//! - `presenter`: Terminal screen presenter
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod presenter;
pub mod script;
pub mod simulate;

pub use commands::{Cli, Commands, SimulateArgs};
pub use display::Display;
pub use presenter::ConsolePresenter;
pub use script::{Script, ScriptStep};
pub use simulate::{run_script, simulate, SimulationReport};
