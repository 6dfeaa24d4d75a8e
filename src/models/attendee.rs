//! Attendee record model matching the persisted snapshot layout.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// One check-in as stored in the attendee list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_name: String,
    /// Local wall-clock time of the check-in, for display only
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
}

/// A check-in submitted by the form layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInRequest {
    pub name: String,
    /// Short team code, e.g. `water`
    pub team: String,
    /// Human-readable team label, e.g. `Team Water Wise`
    pub team_name: String,
}

impl AttendeeRecord {
    /// Build a record for `request` with an id not already used in `existing`.
    pub fn new(request: CheckInRequest, existing: &[AttendeeRecord]) -> Self {
        Self {
            id: next_attendee_id(existing),
            name: request.name,
            team: request.team,
            team_name: request.team_name,
            timestamp: Local::now().format("%-I:%M:%S %p").to_string(),
        }
    }
}

/// Epoch millis plus a random fraction; retried on collision.
fn next_attendee_id(existing: &[AttendeeRecord]) -> f64 {
    loop {
        let candidate = Utc::now().timestamp_millis() as f64 + random_fraction();
        if !existing.iter().any(|record| record.id == candidate) {
            return candidate;
        }
    }
}

/// Random bits in the low 62 bits of a v4 UUID; the version and variant
/// fields sit above them.
const UUID_LOW_RANDOM_MASK: u64 = (1 << 62) - 1;

/// Uniform value in `[0, 1)` drawn from 53 random bits of a v4 UUID.
pub fn random_fraction() -> f64 {
    let bits = (uuid::Uuid::new_v4().as_u128() as u64 & UUID_LOW_RANDOM_MASK) >> 9;
    bits as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> CheckInRequest {
        CheckInRequest {
            name: name.to_string(),
            team: "water".to_string(),
            team_name: "Team Water Wise".to_string(),
        }
    }

    #[test]
    fn test_ids_unique_within_list() {
        let mut records: Vec<AttendeeRecord> = Vec::new();
        for i in 0..200 {
            let record = AttendeeRecord::new(request(&format!("guest {}", i)), &records);
            records.push(record);
        }
        for (i, a) in records.iter().enumerate() {
            assert!(records[i + 1..].iter().all(|b| b.id != a.id));
        }
    }

    #[test]
    fn test_random_fraction_in_unit_interval() {
        for _ in 0..1000 {
            let value = random_fraction();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_random_fraction_uses_every_bit() {
        let mut any_set = 0u64;
        let mut all_set = u64::MAX;
        for _ in 0..512 {
            let bits = (random_fraction() * (1u64 << 53) as f64) as u64;
            any_set |= bits;
            all_set &= bits;
        }
        assert_eq!(any_set, (1u64 << 53) - 1);
        assert_eq!(all_set, 0);
    }

    #[test]
    fn test_record_serializes_with_snapshot_field_names() {
        let record = AttendeeRecord {
            id: 1718000000000.25,
            name: "Ada".to_string(),
            team: "power".to_string(),
            team_name: "Team Renewables".to_string(),
            timestamp: "9:05:00 AM".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["teamName"], "Team Renewables");
        assert_eq!(value["timestamp"], "9:05:00 AM");
        assert_eq!(value["id"], 1718000000000.25);
    }

    #[test]
    fn test_record_tolerates_missing_and_null_fields() {
        let record: AttendeeRecord =
            serde_json::from_str(r#"{"name": "Grace", "teamName": null}"#).unwrap();
        assert_eq!(record.name, "Grace");
        assert_eq!(record.team_name, "");
        assert_eq!(record.team, "");
        assert_eq!(record.id, 0.0);
    }
}
