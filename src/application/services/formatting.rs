//! Date and form helpers used when filling and submitting forms.

use std::fmt::Display;

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc,
};
use indexmap::IndexMap;
use serde::Serialize;

/// Text produced for input that cannot be read as a timestamp.
pub const INVALID_DATE: &str = "Invalid Date";

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// `%#z` accepts `Z`, `+05`, `+0500` and `+05:00`.
const ZONED_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Formats a timestamp for a local date-time input field (`YYYY-MM-DDTHH:MM`).
///
/// Missing or empty input yields an empty string. Accepted inputs are ISO 8601
/// timestamps with an offset (seconds optional), naive local date-times,
/// `YYYY-MM-DD` dates (read as UTC midnight) and integer milliseconds since
/// the Unix epoch. A naive time that falls in a daylight-saving gap is moved
/// forward by the length of the gap. Anything else yields [`INVALID_DATE`].
#[must_use]
pub fn format_date_for_input(input: Option<&str>) -> String {
    format_date_in_zone(input, &Local)
}

/// Like [`format_date_for_input`], with `zone` standing in for local time.
#[must_use]
pub fn format_date_in_zone<Tz>(input: Option<&str>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return String::new();
    };

    parse_timestamp(raw, zone).map_or_else(
        || INVALID_DATE.to_string(),
        |datetime| datetime.format(INPUT_FORMAT).to_string(),
    )
}

/// Formats any zoned timestamp using its local-time components.
#[must_use]
pub fn format_datetime_for_input<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String {
    datetime
        .with_timezone(&Local)
        .format(INPUT_FORMAT)
        .to_string()
}

fn parse_timestamp<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<DateTime<Tz>> {
    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp_millis(millis).map(|utc| utc.with_timezone(zone));
    }

    if let Some(zoned) = parse_zoned(raw) {
        return Some(zoned.with_timezone(zone));
    }

    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return resolve_local(zone, naive);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| zone.from_utc_datetime(&midnight))
}

fn parse_zoned(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        ZONED_DATETIME_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(raw, format).ok())
    })
}

/// Reads a wall-clock time in `zone`; repeated times take the earlier instant.
fn resolve_local<Tz: TimeZone>(zone: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    zone.from_local_datetime(&naive).earliest().or_else(|| {
        // Skipped by a forward transition: apply the offset in force before it.
        let before = zone
            .offset_from_utc_datetime(&naive.checked_sub_signed(TimeDelta::days(1))?)
            .fix();
        let utc = naive.checked_sub_signed(TimeDelta::seconds(i64::from(before.local_minus_utc())))?;
        Some(zone.from_utc_datetime(&utc))
    })
}

/// Field name to value mapping built from submitted form fields.
///
/// Keys keep the position of their first occurrence; values are those of the
/// last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormMap {
    entries: IndexMap<String, String>,
}

impl FormMap {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a field. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of distinct fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no field was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates fields in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts the fields into a JSON object of strings.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Collects form fields into a mapping; repeated keys keep the last value.
pub fn form_data_to_json<I, K, V>(fields: I) -> FormMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    fields.into_iter().collect()
}

/// Decodes an `application/x-www-form-urlencoded` body into fields.
#[must_use]
pub fn parse_form_fields(body: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
