//! Attendance state and the snapshot persisted under the storage key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{null_as_default, AttendeeRecord, Team};
use crate::errors::AppError;

/// Per-team check-in counters. Only the known teams are tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamCounts {
    pub water: u32,
    pub zero: u32,
    pub power: u32,
}

impl TeamCounts {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Water => self.water,
            Team::Zero => self.zero,
            Team::Power => self.power,
        }
    }

    /// Bump the counter for `code`. Returns false for unknown codes.
    pub fn increment(&mut self, code: &str) -> bool {
        let counter = match Team::from_code(code) {
            Some(Team::Water) => &mut self.water,
            Some(Team::Zero) => &mut self.zero,
            Some(Team::Power) => &mut self.power,
            None => return false,
        };
        *counter += 1;
        true
    }
}

/// In-memory attendance state owned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceState {
    pub count: u32,
    pub team_counts: TeamCounts,
    /// Check-in order, never reordered or deduplicated
    pub attendees: Vec<AttendeeRecord>,
}

/// Serialized form of [`AttendanceState`].
///
/// Every field is optional on read so older or partially written snapshots
/// still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub water_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zero_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub power_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attendees: Vec<AttendeeRecord>,
    /// Snapshot write time in epoch millis; informational only
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
}

impl Snapshot {
    /// Decode a stored payload.
    ///
    /// Only a JSON object is a snapshot. The derived decoder would also accept
    /// an array and assign its elements to fields by position.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        match serde_json::from_str::<Value>(raw)? {
            value @ Value::Object(_) => Ok(Snapshot::deserialize(value)?),
            other => Err(AppError::Serialization(format!(
                "attendance snapshot must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl AttendanceState {
    /// Serialize the state into a snapshot stamped with `written_at` millis.
    pub fn to_snapshot(&self, written_at: i64) -> Snapshot {
        Snapshot {
            count: self.count,
            water_count: self.team_counts.water,
            zero_count: self.team_counts.zero,
            power_count: self.team_counts.power,
            attendees: self.attendees.clone(),
            timestamp: written_at,
        }
    }

    /// Rebuild state from a snapshot. The snapshot timestamp is dropped.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            count: snapshot.count,
            team_counts: TeamCounts {
                water: snapshot.water_count,
                zero: snapshot.zero_count,
                power: snapshot.power_count,
            },
            attendees: snapshot.attendees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> AttendanceState {
        AttendanceState {
            count: 3,
            team_counts: TeamCounts {
                water: 1,
                zero: 0,
                power: 1,
            },
            attendees: vec![
                AttendeeRecord {
                    id: 1718000000000.5,
                    name: "Ada".to_string(),
                    team: "power".to_string(),
                    team_name: "Team Renewables".to_string(),
                    timestamp: "9:00:01 AM".to_string(),
                },
                AttendeeRecord {
                    id: 1718000000100.125,
                    name: "Linus".to_string(),
                    team: "water".to_string(),
                    team_name: "Team Water Wise".to_string(),
                    timestamp: "9:00:02 AM".to_string(),
                },
                AttendeeRecord {
                    id: 1718000000200.0,
                    name: "".to_string(),
                    team: "fire".to_string(),
                    team_name: "fire".to_string(),
                    timestamp: "9:00:03 AM".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_state_survives_snapshot_json() {
        let state = sample_state();
        let json = serde_json::to_string(&state.to_snapshot(1718000000300)).unwrap();
        let decoded: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.timestamp, 1718000000300);
        assert_eq!(AttendanceState::from_snapshot(decoded), state);
    }

    #[test]
    fn test_snapshot_uses_flat_team_counters() {
        let value = serde_json::to_value(sample_state().to_snapshot(42)).unwrap();
        assert_eq!(value["count"], 3);
        assert_eq!(value["waterCount"], 1);
        assert_eq!(value["zeroCount"], 0);
        assert_eq!(value["powerCount"], 1);
        assert_eq!(value["timestamp"], 42);
        assert_eq!(value["attendees"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_empty_object_decodes_to_empty_state() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        let state = AttendanceState::from_snapshot(snapshot);
        assert_eq!(state, AttendanceState::default());
    }

    #[test]
    fn test_null_fields_decode_to_defaults() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"count": null, "waterCount": 4, "attendees": null}"#)
                .unwrap();
        assert_eq!(snapshot.count, 0);
        assert_eq!(snapshot.water_count, 4);
        assert!(snapshot.attendees.is_empty());
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        assert!(Snapshot::from_json(r#"{"count": "seven"}"#).is_err());
        assert!(Snapshot::from_json(r#"{"count": -1}"#).is_err());
        assert!(Snapshot::from_json("{\"count\": 3,").is_err());
    }

    #[test]
    fn test_non_object_payloads_are_rejected() {
        for raw in ["[7, 3, 2, 2]", "[]", "null", "42", "\"attendanceData\"", "true"] {
            let err = Snapshot::from_json(raw).unwrap_err();
            assert_eq!(err.error_code(), crate::errors::codes::SERIALIZATION_ERROR);
        }
        let err = Snapshot::from_json("[1, 2]").unwrap_err();
        assert!(err.message().contains("got an array"));
    }

    #[test]
    fn test_from_json_reads_objects() {
        let snapshot = Snapshot::from_json(r#"{"count": 2, "powerCount": 2}"#).unwrap();
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.power_count, 2);
        assert_eq!(Snapshot::from_json("{}").unwrap(), Snapshot::default());
    }

    #[test]
    fn test_unknown_team_increments_nothing() {
        let mut counts = TeamCounts::default();
        assert!(!counts.increment("fire"));
        assert!(!counts.increment("POWER"));
        assert_eq!(counts, TeamCounts::default());

        assert!(counts.increment("zero"));
        assert_eq!(counts.get(Team::Zero), 1);
        assert_eq!(counts.get(Team::Water), 0);
    }
}
