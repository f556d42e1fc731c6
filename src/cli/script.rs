//! Simulator scripts.
//!
//! A script is a JSON document listing what the user does while the alarm
//! rings:
//!
//! ```json
//! {
//!   "label": "Morning",
//!   "steps": [
//!     { "action": "screen", "event": "ringing_dismissed" },
//!     { "action": "wait", "ms": 200 },
//!     { "action": "screen", "event": "mimic_succeeded", "shareable": "photo.jpg" },
//!     { "action": "back" }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RingingError;
use crate::screen::ScreenEvent;
use crate::types::MimicKind;

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// The visible screen reports an outcome
    Screen(ScreenEvent),
    /// The user presses back
    Back,
    /// Nothing happens for a while
    Wait { ms: u64 },
}

/// A scripted ringing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Label of the simulated alarm
    #[serde(default = "default_label")]
    pub label: String,

    /// Mimic games enabled for the simulated alarm
    #[serde(default)]
    pub mimics: Option<Vec<MimicKind>>,

    pub steps: Vec<ScriptStep>,
}

fn default_label() -> String {
    "Alarm".to_string()
}

impl Script {
    /// Parses a script from JSON text.
    pub fn parse(text: &str) -> Result<Self, RingingError> {
        serde_json::from_str(text).map_err(|e| RingingError::InvalidScript(e.to_string()))
    }

    /// Reads and parses a script file.
    pub fn load(path: &Path) -> Result<Self, RingingError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RingingError::InvalidScript(format!("{}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Returns the total time spent in wait steps.
    pub fn total_wait_ms(&self) -> u64 {
        self.steps
            .iter()
            .map(|step| match step {
                ScriptStep::Wait { ms } => *ms,
                _ => 0,
            })
            .sum()
    }
}
