use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone as _};
use chrono_tz::Europe::London;
use serde_json::Value;

use crate::formats::{Schedule, ScheduleRecord, TIMESTAMP_FORMAT};

/// Source timestamps carry an XSD-style suffix; only `YYYY-MM-DDTHH:MM:SS` is significant.
const SIGNIFICANT_TIMESTAMP_CHARS: usize = 19;
const SOURCE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("entry {index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("entry {index} ({pid}): `{field}` is not a valid timestamp: {value:?}")]
    InvalidTimestamp {
        index: usize,
        pid: String,
        field: &'static str,
        value: String,
    },

    #[error("entry {index} ({pid}): end time {end} is not after start time {start}")]
    InvalidTimeRange {
        index: usize,
        pid: String,
        start: String,
        end: String,
    },
}

/// Turns JSON-LD program entries into a schedule keyed by page position.
///
/// The batch is all-or-nothing: the first malformed entry aborts it.
pub fn normalize(entries: &[Value]) -> Result<Schedule, NormalizeError> {
    let mut schedule = Schedule::new();
    for (idx, entry) in entries.iter().enumerate() {
        let record = normalize_entry(idx + 1, entry)?;
        schedule.push(record);
    }

    tracing::debug!(records = schedule.len(), "normalized schedule");
    Ok(schedule)
}

fn normalize_entry(index: usize, entry: &Value) -> Result<ScheduleRecord, NormalizeError> {
    let pid = required_str(entry, index, "identifier")?;
    let raw_start = required_str(entry, index, "publication.startDate")?;
    let raw_end = required_str(entry, index, "publication.endDate")?;
    let episode_name = required_str(entry, index, "name")?;

    let invalid_timestamp = |field: &'static str, value: &str| NormalizeError::InvalidTimestamp {
        index,
        pid: pid.to_owned(),
        field,
        value: value.to_owned(),
    };
    let start_time = london_time(raw_start)
        .ok_or_else(|| invalid_timestamp("publication.startDate", raw_start))?;
    let end_time =
        london_time(raw_end).ok_or_else(|| invalid_timestamp("publication.endDate", raw_end))?;

    if end_time <= start_time {
        return Err(NormalizeError::InvalidTimeRange {
            index,
            pid: pid.to_owned(),
            start: start_time.format(TIMESTAMP_FORMAT).to_string(),
            end: end_time.format(TIMESTAMP_FORMAT).to_string(),
        });
    }

    let name = series_name(entry).unwrap_or(episode_name);

    Ok(ScheduleRecord {
        pid: pid.to_owned(),
        name: name.to_owned(),
        start_time,
        end_time,
    })
}

/// Looks up a dotted field path, treating a non-string value as absent.
fn required_str<'a>(
    entry: &'a Value,
    index: usize,
    field: &'static str,
) -> Result<&'a str, NormalizeError> {
    field
        .split('.')
        .try_fold(entry, |value, key| value.get(key))
        .and_then(Value::as_str)
        .ok_or(NormalizeError::MissingField { index, field })
}

fn series_name(entry: &Value) -> Option<&str> {
    entry
        .get("partOfSeries")
        .and_then(|series| series.get("name"))
        .and_then(Value::as_str)
}

/// Reads a UTC wall-clock timestamp and expresses it in UK civil time.
pub fn london_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    let significant = match raw.char_indices().nth(SIGNIFICANT_TIMESTAMP_CHARS) {
        Some((end, _)) => &raw[..end],
        None => raw,
    };
    let naive = NaiveDateTime::parse_from_str(significant, SOURCE_TIMESTAMP_FORMAT).ok()?;
    Some(London.from_utc_datetime(&naive).fixed_offset())
}
