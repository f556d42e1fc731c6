//! Terminal screen presenter.

use tracing::debug;

use super::display::Display;
use crate::screen::{Presentation, Screen, ScreenPresenter};
use crate::types::{MimicKind, ScreenKind};

/// Prints every screen change to stdout.
///
/// A quiet presenter only logs, so JSON output stays machine-readable.
#[derive(Debug, Clone, Copy)]
pub struct ConsolePresenter {
    quiet: bool,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl Default for ConsolePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenPresenter for ConsolePresenter {
    fn present(&mut self, screen: &Screen, presentation: Presentation) {
        debug!(screen = ?screen.kind(), ?presentation, "Present");
        if !self.quiet {
            Display::show_screen(screen, presentation);
        }
    }

    fn pop(&mut self) {
        debug!("Pop");
        if !self.quiet {
            Display::show_pop();
        }
    }

    fn update_alarm_settings(&mut self, enabled_mimics: &[MimicKind]) {
        debug!(?enabled_mimics, "Update alarm settings");
        if !self.quiet {
            Display::show_settings_update(enabled_mimics);
        }
    }

    fn forward_back(&mut self, screen: ScreenKind) {
        debug!(?screen, "Forward back");
        if !self.quiet {
            Display::show_forward_back(screen);
        }
    }

    fn close(&mut self) {
        debug!("Close");
        if !self.quiet {
            Display::show_close();
        }
    }
}
