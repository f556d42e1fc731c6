//! In-memory alarm storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Alarm, AlarmStore};
use crate::types::{AlarmId, MimicKind};

// ============================================================================
// AlarmStatus
// ============================================================================

/// What happened to an alarm the last time it rang.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmStatus {
    /// The alarm has not been handled yet
    #[default]
    Pending,
    /// The user dismissed the alarm
    Dismissed,
    /// The user snoozed the alarm
    Snoozed,
}

// ============================================================================
// AlarmRecord
// ============================================================================

/// Stored alarm data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRecord {
    /// Alarm identifier
    pub id: AlarmId,
    /// User-visible label
    #[serde(default)]
    pub label: String,
    /// Mimic games the user must play to dismiss the alarm
    #[serde(default)]
    pub enabled_mimics: Vec<MimicKind>,
    /// Outcome of the last ringing
    #[serde(default)]
    pub status: AlarmStatus,
}

impl AlarmRecord {
    /// Creates a pending alarm with a fresh identifier and no mimics.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: AlarmId::new(),
            label: label.into(),
            enabled_mimics: Vec::new(),
            status: AlarmStatus::Pending,
        }
    }

    /// Sets the enabled mimic games.
    #[must_use]
    pub fn with_mimics(mut self, mimics: Vec<MimicKind>) -> Self {
        self.enabled_mimics = mimics;
        self
    }
}

// ============================================================================
// InMemoryAlarmStore
// ============================================================================

type Records = Arc<Mutex<HashMap<AlarmId, AlarmRecord>>>;

fn lock(records: &Records) -> MutexGuard<'_, HashMap<AlarmId, AlarmRecord>> {
    records.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Thread-safe alarm store backed by a hash map.
///
/// Clones share the same records, so a test can keep a clone and inspect
/// the status the session wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAlarmStore {
    records: Records,
}

impl InMemoryAlarmStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an alarm, returning its identifier.
    pub fn insert(&self, record: AlarmRecord) -> AlarmId {
        let id = record.id;
        lock(&self.records).insert(id, record);
        id
    }

    /// Returns a copy of the stored record.
    pub fn get(&self, id: AlarmId) -> Option<AlarmRecord> {
        lock(&self.records).get(&id).cloned()
    }

    /// Returns the stored status of an alarm.
    pub fn status(&self, id: AlarmId) -> Option<AlarmStatus> {
        lock(&self.records).get(&id).map(|record| record.status)
    }

    /// Returns the number of stored alarms.
    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    /// Returns true if no alarms are stored.
    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }
}

impl AlarmStore for InMemoryAlarmStore {
    fn lookup(&self, id: AlarmId) -> Option<Box<dyn Alarm>> {
        if !lock(&self.records).contains_key(&id) {
            return None;
        }
        Some(Box::new(StoredAlarm {
            id,
            records: Arc::clone(&self.records),
        }))
    }
}

/// Alarm handle that writes through to an [`InMemoryAlarmStore`].
struct StoredAlarm {
    id: AlarmId,
    records: Records,
}

impl StoredAlarm {
    fn set_status(&mut self, status: AlarmStatus) {
        if let Some(record) = lock(&self.records).get_mut(&self.id) {
            record.status = status;
            debug!(alarm = %self.id, ?status, "Alarm status updated");
        }
    }
}

impl Alarm for StoredAlarm {
    fn id(&self) -> AlarmId {
        self.id
    }

    fn enabled_mimics(&self) -> Vec<MimicKind> {
        lock(&self.records)
            .get(&self.id)
            .map(|record| record.enabled_mimics.clone())
            .unwrap_or_default()
    }

    fn mark_dismissed(&mut self) {
        self.set_status(AlarmStatus::Dismissed);
    }

    fn mark_snoozed(&mut self) {
        self.set_status(AlarmStatus::Snoozed);
    }
}
