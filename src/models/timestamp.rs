use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, SecondsFormat, TimeZone};
use serde::{Deserialize, Deserializer};

/// Format used by `<input type="datetime-local">`
const FORM_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse a server or form timestamp into a naive UTC value.
///
/// Accepts RFC 3339 with an offset (`2025-01-01T10:00:00.000Z`), naive
/// ISO-8601 with optional fractional seconds (`2025-01-01T10:00:00`), and the
/// minute-precision form format (`2025-01-01T10:00`).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_utc());
    }
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, FORM_FORMAT))
}

/// Parse a form timestamp typed as wall-clock time in `zone` and return it
/// as naive UTC. Values that carry their own offset keep it.
pub fn parse_in_zone<Tz: TimeZone>(raw: &str, zone: &Tz) -> Result<NaiveDateTime, chrono::ParseError> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_utc());
    }
    let wall = raw
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, FORM_FORMAT))?;
    Ok(match zone.from_local_datetime(&wall) {
        LocalResult::Single(at) => at.naive_utc(),
        LocalResult::Ambiguous(earliest, _) => earliest.naive_utc(),
        // Skipped by a DST jump: shift by the offset in force just after it
        LocalResult::None => wall - zone.offset_from_utc_datetime(&wall).fix(),
    })
}

/// ISO-8601 UTC with millisecond precision, as the server expects on create.
pub fn to_iso_utc(value: &NaiveDateTime) -> String {
    value.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
