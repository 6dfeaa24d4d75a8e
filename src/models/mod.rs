//! Data models for the check-in tracker.
//!
//! Field names follow the persisted snapshot layout so existing snapshots stay readable.

mod attendee;
mod snapshot;
mod team;

pub use attendee::*;
pub use snapshot::*;
pub use team::*;

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
