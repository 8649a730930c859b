use std::{fmt::Display, ops::Deref, str::FromStr};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for how rarely a chore can recur. One day at minimum, ten years at most,
/// anything longer is treated as a typo.
pub const MAX_FREQUENCY_DAYS: u32 = 3650;

/// Number of days between required completions of a chore. Can only be constructed in the
/// 1..=[MAX_FREQUENCY_DAYS] range, which keeps the due date arithmetic from ever leaving the
/// calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frequency(u32);

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Frequency {
    pub fn new_opt(days: u32) -> Option<Frequency> {
        if (1..=MAX_FREQUENCY_DAYS).contains(&days) {
            Some(Frequency(days))
        } else {
            None
        }
    }
}

impl FromStr for Frequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s
            .trim()
            .parse::<u32>()
            .map_err(|_| anyhow!("Can't parse {s:?} into a number of days"))?;
        Frequency::new_opt(days)
            .ok_or_else(|| anyhow!("Frequency must be between 1 and {MAX_FREQUENCY_DAYS} days"))
    }
}

impl Deref for Frequency {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A single tracked chore as it's kept in the store. The serialized form keeps the shape the
/// mobile builds of the app wrote: camelCase `lastCompleted`, a frequency that may arrive as a
/// bare number or a numeric string, and an empty string standing in for "never completed".
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Chore {
    pub id: String,
    pub name: String,
    #[serde(with = "frequency_days")]
    pub frequency: Frequency,
    #[serde(with = "completed_at", default, rename = "lastCompleted")]
    pub last_completed: Option<DateTime<Utc>>,
}

mod frequency_days {
    use serde::{self, Deserialize, Deserializer, Serializer, de::Error};

    use super::Frequency;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Days(i64),
        Text(String),
    }

    pub fn serialize<S>(frequency: &Frequency, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(**frequency)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Frequency, D::Error>
    where
        D: Deserializer<'de>,
    {
        let days = match Raw::deserialize(deserializer)? {
            Raw::Days(v) => v,
            Raw::Text(v) => v
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::custom(format!("frequency isn't a number of days: {v:?}")))?,
        };
        u32::try_from(days)
            .ok()
            .and_then(Frequency::new_opt)
            .ok_or_else(|| Error::custom(format!("frequency is out of range: {days}")))
    }
}

mod completed_at {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_i64(time.timestamp_millis()),
            // "never completed" is stored as an empty string
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = match Option::<Raw>::deserialize(deserializer)? {
            None => return Ok(None),
            Some(Raw::Millis(v)) => v,
            Some(Raw::Text(v)) if v.trim().is_empty() => return Ok(None),
            Some(Raw::Text(v)) => v
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::custom(format!("lastCompleted isn't a timestamp: {v:?}")))?,
        };
        DateTime::from_timestamp_millis(millis)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("lastCompleted is out of range: {millis}")))
    }
}
