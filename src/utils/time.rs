use chrono::{DateTime, Utc};

/// Clamps a timestamp to the millisecond precision the persisted format carries, so that
/// a completion written out and read back compares equal to the in-memory value.
pub fn truncate_to_millis(time: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(time.timestamp_millis()).unwrap()
}
