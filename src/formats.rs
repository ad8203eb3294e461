use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire format for local timestamps: ISO-8601 with an explicit offset (`+00:00`, never `Z`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    #[serde(rename = "PID")]
    pub pid: String,
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "START_TIME", with = "local_timestamp")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(rename = "END_TIME", with = "local_timestamp")]
    pub end_time: DateTime<FixedOffset>,
}

/// Programs in page order. Keys are 1-based positions and carry no meaning beyond ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    records: Vec<ScheduleRecord>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record under the next key.
    pub fn push(&mut self, record: ScheduleRecord) {
        self.records.push(record);
    }

    pub fn get(&self, key: usize) -> Option<&ScheduleRecord> {
        key.checked_sub(1).and_then(|idx| self.records.get(idx))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ScheduleRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(idx, record)| (idx + 1, record))
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for (key, record) in self.iter() {
            map.serialize_entry(&key.to_string(), record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ScheduleVisitor)
    }
}

struct ScheduleVisitor;

impl<'de> Visitor<'de> for ScheduleVisitor {
    type Value = Schedule;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from sequential keys \"1\"..\"N\" to schedule records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Schedule, A::Error> {
        let mut keyed: Vec<(usize, ScheduleRecord)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, record)) = access.next_entry::<String, ScheduleRecord>()? {
            // Only canonical decimal keys: no sign, no leading zeros.
            let Some(key) = key
                .parse::<usize>()
                .ok()
                .filter(|parsed| parsed.to_string() == key)
            else {
                return Err(de::Error::custom(format!(
                    "schedule key is not a plain decimal integer: {key:?}"
                )));
            };
            keyed.push((key, record));
        }

        keyed.sort_by_key(|(key, _)| *key);
        for (expected, (key, _)) in (1..).zip(&keyed) {
            if *key != expected {
                return Err(de::Error::custom(format!(
                    "schedule keys must run 1..={}, found {key} at position {expected}",
                    keyed.len()
                )));
            }
        }

        Ok(Schedule {
            records: keyed.into_iter().map(|(_, record)| record).collect(),
        })
    }
}

mod local_timestamp {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize as _, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(super::TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw).map_err(serde::de::Error::custom)
    }
}
