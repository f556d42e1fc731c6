//! Alarm storage contract and mimic selection.
//!
//! The ringing session resolves its alarm exactly once, at start-up, through
//! an [`AlarmStore`]. The returned [`Alarm`] handle is what the session marks
//! dismissed or snoozed and where it reads the enabled mimic games from.
//!
//! # Usage
//!
//! ```
//! use alarm_ringing::alarm::{AlarmRecord, AlarmStore, InMemoryAlarmStore};
//! use alarm_ringing::types::MimicKind;
//!
//! let store = InMemoryAlarmStore::new();
//! let record = AlarmRecord::new("Morning").with_mimics(vec![MimicKind::TongueTwister]);
//! let id = store.insert(record);
//!
//! let alarm = store.lookup(id).expect("alarm exists");
//! assert_eq!(alarm.enabled_mimics(), vec![MimicKind::TongueTwister]);
//! ```

mod selector;
mod store;

pub use selector::{FirstMimicSelector, MimicSelector, RandomMimicSelector};
pub use store::{AlarmRecord, AlarmStatus, InMemoryAlarmStore};

use crate::types::{AlarmId, MimicKind};

/// A resolved alarm, as seen by the ringing session.
pub trait Alarm: Send {
    /// Returns the alarm identifier.
    fn id(&self) -> AlarmId;

    /// Returns the mimic games enabled for this alarm.
    fn enabled_mimics(&self) -> Vec<MimicKind>;

    /// Records that the alarm was dismissed.
    fn mark_dismissed(&mut self);

    /// Records that the alarm was snoozed.
    fn mark_snoozed(&mut self);
}

/// Lookup of alarms by identifier.
pub trait AlarmStore: Send + Sync {
    /// Resolves an alarm, or `None` if it does not exist.
    fn lookup(&self, id: AlarmId) -> Option<Box<dyn Alarm>>;
}
