//! Navigation stack of a ringing session.
//!
//! The visible screen is the top entry; screens pushed with history keep the
//! entry below them reachable with back. The session state is always derived
//! from the top entry, and nesting is read off the stack: a mimic settings
//! screen with an alarm settings entry below it was opened from the alarm
//! settings.

use std::collections::HashMap;

use crate::types::ScreenKind;

/// Stack of the screens a session has on display.
#[derive(Debug, Default)]
pub struct NavigationStack {
    entries: Vec<ScreenKind>,
    created: HashMap<ScreenKind, usize>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&mut self, kind: ScreenKind) {
        *self.created.entry(kind).or_insert(0) += 1;
    }

    /// Replaces the visible screen with a new instance of `kind`.
    pub fn replace(&mut self, kind: ScreenKind) {
        self.create(kind);
        self.entries.pop();
        self.entries.push(kind);
    }

    /// Shows a new instance of `kind` on top, keeping the current one below.
    pub fn push(&mut self, kind: ScreenKind) {
        self.create(kind);
        self.entries.push(kind);
    }

    /// Removes the visible screen if another one is below it.
    ///
    /// Returns the kind that became visible.
    pub fn pop(&mut self) -> Option<ScreenKind> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        self.top()
    }

    /// Returns the kind of the visible screen.
    pub fn top(&self) -> Option<ScreenKind> {
        self.entries.last().copied()
    }

    /// Returns true if an instance of `kind` is anywhere on the stack.
    pub fn contains(&self, kind: ScreenKind) -> bool {
        self.entries.contains(&kind)
    }

    /// Returns the number of instances of `kind` ever created.
    pub fn created(&self, kind: ScreenKind) -> usize {
        self.created.get(&kind).copied().unwrap_or(0)
    }

    /// Removes every screen.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
