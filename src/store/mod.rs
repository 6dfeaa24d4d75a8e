//! Attendance store: check-in bookkeeping over a [`LocalStorage`] snapshot.
//!
//! The store owns the only copy of [`AttendanceState`]. Every check-in mutates it
//! and then writes the whole snapshot back under the configured key.

use chrono::Utc;

use crate::db::LocalStorage;
use crate::errors::AppError;
use crate::models::{AttendanceState, AttendeeRecord, CheckInRequest, Snapshot, TeamCounts};

/// Everything the presentation layer needs after a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceView {
    pub count: u32,
    pub capacity: u32,
    pub percentage: u32,
    pub team_counts: TeamCounts,
    pub capacity_exceeded: bool,
}

/// A check-in that was recorded in memory but could not be written to storage.
///
/// The record is still part of the state and must still be shown.
#[derive(Debug)]
pub struct UnsavedCheckIn {
    pub record: AttendeeRecord,
    pub error: AppError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No restore attempted and no check-in processed yet
    Fresh,
    /// Restore is no longer allowed
    Active,
}

pub struct AttendanceStore<S: LocalStorage> {
    storage: S,
    key: String,
    capacity: u32,
    state: AttendanceState,
    phase: Phase,
}

impl<S: LocalStorage> AttendanceStore<S> {
    /// Create an empty store persisting under `key`. `capacity` must be positive.
    pub fn new(storage: S, key: impl Into<String>, capacity: u32) -> Self {
        Self {
            storage,
            key: key.into(),
            capacity,
            state: AttendanceState::default(),
            phase: Phase::Fresh,
        }
    }

    pub fn state(&self) -> &AttendanceState {
        &self.state
    }

    /// Load the persisted snapshot into memory.
    ///
    /// Returns `None` when nothing usable is stored; read failures are logged,
    /// never returned. Only the first call before any check-in has an effect.
    pub async fn restore(&mut self) -> Option<&AttendanceState> {
        if self.phase != Phase::Fresh {
            tracing::warn!(
                "Ignoring restore of '{}': state already restored or modified",
                self.key
            );
            return None;
        }

        let snapshot = match self.load_snapshot().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::info!("No saved attendance data under '{}'", self.key);
                return None;
            }
            Err(e) => {
                tracing::error!("Error loading attendance data: {}", e);
                return None;
            }
        };

        self.state = AttendanceState::from_snapshot(snapshot);
        self.phase = Phase::Active;
        tracing::info!(
            "Restored {} check-ins ({} attendees) from '{}'",
            self.state.count,
            self.state.attendees.len(),
            self.key
        );
        Some(&self.state)
    }

    async fn load_snapshot(&self) -> Result<Option<Snapshot>, AppError> {
        match self.storage.get_item(&self.key).await? {
            Some(raw) => Ok(Some(Snapshot::from_json(&raw)?)),
            None => Ok(None),
        }
    }

    /// Record one check-in and persist the updated snapshot.
    ///
    /// Going over capacity does not block the check-in. If the write fails the
    /// in-memory state keeps the new record, which comes back with the error.
    pub async fn check_in(
        &mut self,
        request: CheckInRequest,
    ) -> Result<AttendeeRecord, UnsavedCheckIn> {
        self.phase = Phase::Active;
        self.state.count += 1;

        if self.capacity_exceeded() {
            tracing::warn!(
                "Maximum attendance reached: {} of {}",
                self.state.count,
                self.capacity
            );
        }

        let record = AttendeeRecord::new(request, &self.state.attendees);
        self.state.attendees.push(record.clone());

        if !self.state.team_counts.increment(&record.team) {
            tracing::debug!("Team '{}' is not tracked; team counters unchanged", record.team);
        }

        tracing::debug!(
            "Checked in '{}' ({}) as #{}",
            record.name,
            record.team,
            self.state.count
        );

        match self.persist().await {
            Ok(()) => Ok(record),
            Err(error) => Err(UnsavedCheckIn { record, error }),
        }
    }

    /// Strictly more check-ins than capacity. Reaching capacity exactly is fine.
    pub fn capacity_exceeded(&self) -> bool {
        self.state.count > self.capacity
    }

    /// Attendance as a rounded percentage of capacity, not clamped at 100.
    pub fn percentage(&self) -> u32 {
        (f64::from(self.state.count) / f64::from(self.capacity) * 100.0).round() as u32
    }

    pub fn view(&self) -> AttendanceView {
        AttendanceView {
            count: self.state.count,
            capacity: self.capacity,
            percentage: self.percentage(),
            team_counts: self.state.team_counts,
            capacity_exceeded: self.capacity_exceeded(),
        }
    }

    /// Serialize the current state, stamped with the current time.
    pub fn snapshot(&self) -> Snapshot {
        self.state.to_snapshot(Utc::now().timestamp_millis())
    }

    /// Remove the persisted snapshot. In-memory state is left untouched;
    /// call [`reset`](Self::reset) as well for a full reset.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.storage.remove_item(&self.key).await?;
        tracing::info!("Cleared saved attendance data under '{}'", self.key);
        Ok(())
    }

    /// Reinitialize in-memory state to empty without touching storage.
    pub fn reset(&mut self) {
        self.state = AttendanceState::default();
    }

    async fn persist(&self) -> Result<(), AppError> {
        let payload = serde_json::to_string(&self.snapshot())?;
        self.storage.set_item(&self.key, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::MemoryStorage;

    fn request(name: &str, team: &str) -> CheckInRequest {
        CheckInRequest {
            name: name.to_string(),
            team: team.to_string(),
            team_name: format!("Team {}", team),
        }
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        let mut store = AttendanceStore::new(MemoryStorage::default(), "k", 8);
        store.state.count = 1; // 12.5%
        assert_eq!(store.percentage(), 13);
        store.state.count = 3; // 37.5%
        assert_eq!(store.percentage(), 38);
        store.state.count = 0;
        assert_eq!(store.percentage(), 0);
    }

    #[tokio::test]
    async fn test_percentage_not_clamped() {
        let mut store = AttendanceStore::new(MemoryStorage::default(), "k", 50);
        for i in 0..60 {
            store
                .check_in(request(&format!("guest {}", i), "water"))
                .await
                .unwrap();
        }
        assert_eq!(store.percentage(), 120);
        assert!(store.view().capacity_exceeded);
    }

    #[tokio::test]
    async fn test_check_in_persists_snapshot() {
        let storage = MemoryStorage::default();
        let mut store = AttendanceStore::new(storage.clone(), "attendanceData", 50);

        store.check_in(request("Ada", "power")).await.unwrap();

        let raw = storage.get_item("attendanceData").await.unwrap().unwrap();
        let snapshot: Snapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(snapshot.count, 1);
        assert_eq!(snapshot.power_count, 1);
        assert_eq!(snapshot.attendees[0].name, "Ada");
        assert!(snapshot.timestamp > 0);
    }

    #[tokio::test]
    async fn test_restore_only_once() {
        let storage = MemoryStorage::default();
        storage
            .set_item("attendanceData", r#"{"count": 2}"#)
            .await
            .unwrap();

        let mut store = AttendanceStore::new(storage.clone(), "attendanceData", 50);
        assert_eq!(store.restore().await.map(|s| s.count), Some(2));

        storage
            .set_item("attendanceData", r#"{"count": 9}"#)
            .await
            .unwrap();
        assert!(store.restore().await.is_none());
        assert_eq!(store.state().count, 2);
    }

    #[tokio::test]
    async fn test_restore_after_check_in_is_ignored() {
        let storage = MemoryStorage::default();
        let mut store = AttendanceStore::new(storage.clone(), "attendanceData", 50);
        store.check_in(request("Ada", "power")).await.unwrap();

        storage
            .set_item("attendanceData", r#"{"count": 40}"#)
            .await
            .unwrap();
        assert!(store.restore().await.is_none());
        assert_eq!(store.state().count, 1);
    }

    #[tokio::test]
    async fn test_empty_name_is_accepted() {
        let mut store = AttendanceStore::new(MemoryStorage::default(), "k", 50);
        let record = store.check_in(request("", "zero")).await.unwrap();
        assert_eq!(record.name, "");
        assert_eq!(store.state().team_counts.zero, 1);
    }
}
