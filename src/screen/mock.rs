//! Mock screen presenter for testing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Presentation, Screen, ScreenPresenter};
use crate::types::{MimicKind, ScreenKind};

/// A call made on the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    Present(Screen, Presentation),
    Pop,
    UpdateAlarmSettings(Vec<MimicKind>),
    ForwardBack(ScreenKind),
    Close,
}

/// Mock presenter that records every call.
///
/// Clones share the recorded calls.
#[derive(Debug, Clone, Default)]
pub struct MockScreenPresenter {
    calls: Arc<Mutex<Vec<PresenterCall>>>,
}

impl MockScreenPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PresenterCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: PresenterCall) {
        self.lock().push(call);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<PresenterCall> {
        self.lock().clone()
    }

    /// Returns the kinds of all presented screens, in order.
    #[must_use]
    pub fn presented_kinds(&self) -> Vec<ScreenKind> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                PresenterCall::Present(screen, _) => Some(screen.kind()),
                _ => None,
            })
            .collect()
    }

    /// Returns how many times a screen of `kind` was presented.
    #[must_use]
    pub fn present_count(&self, kind: ScreenKind) -> usize {
        self.presented_kinds()
            .into_iter()
            .filter(|presented| *presented == kind)
            .count()
    }

    /// Returns the last presented screen.
    #[must_use]
    pub fn last_presented(&self) -> Option<Screen> {
        self.lock()
            .iter()
            .rev()
            .find_map(|call| match call {
                PresenterCall::Present(screen, _) => Some(screen.clone()),
                _ => None,
            })
    }

    #[must_use]
    pub fn close_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|call| **call == PresenterCall::Close)
            .count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl ScreenPresenter for MockScreenPresenter {
    fn present(&mut self, screen: &Screen, presentation: Presentation) {
        self.record(PresenterCall::Present(screen.clone(), presentation));
    }

    fn pop(&mut self) {
        self.record(PresenterCall::Pop);
    }

    fn update_alarm_settings(&mut self, enabled_mimics: &[MimicKind]) {
        self.record(PresenterCall::UpdateAlarmSettings(enabled_mimics.to_vec()));
    }

    fn forward_back(&mut self, screen: ScreenKind) {
        self.record(PresenterCall::ForwardBack(screen));
    }

    fn close(&mut self) {
        self.record(PresenterCall::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlarmId;

    #[test]
    fn test_records_calls_in_order() {
        let mut presenter = MockScreenPresenter::new();
        let observer = presenter.clone();
        let id = AlarmId::new();

        presenter.present(&Screen::Ringing { alarm_id: id }, Presentation::Replace);
        presenter.present(&Screen::Snooze, Presentation::Replace);
        presenter.close();

        assert_eq!(
            observer.presented_kinds(),
            vec![ScreenKind::Ringing, ScreenKind::Snooze]
        );
        assert_eq!(observer.last_presented(), Some(Screen::Snooze));
        assert_eq!(observer.close_count(), 1);
        assert_eq!(observer.calls().len(), 3);
    }

    #[test]
    fn test_present_count() {
        let mut presenter = MockScreenPresenter::new();
        let id = AlarmId::new();

        presenter.present(&Screen::Ringing { alarm_id: id }, Presentation::Replace);
        presenter.present(&Screen::Ringing { alarm_id: id }, Presentation::Replace);

        assert_eq!(presenter.present_count(ScreenKind::Ringing), 2);
        assert_eq!(presenter.present_count(ScreenKind::Share), 0);

        presenter.clear();
        assert!(presenter.calls().is_empty());
    }

    #[test]
    fn test_keeps_recording_after_poisoned_lock() {
        let mut presenter = MockScreenPresenter::new();
        let poisoner = presenter.clone();

        let result = std::thread::spawn(move || {
            let _guard = poisoner.calls.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(result.is_err());

        presenter.close();

        assert_eq!(presenter.close_count(), 1);
    }
}
