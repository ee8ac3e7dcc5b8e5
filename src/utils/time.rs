use chrono::{DateTime, SecondsFormat, Utc};

/// Current instant truncated to whole milliseconds, the precision backup names carry.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `2024-05-01T13:45:09.120Z` -> `2024-05-01T13-45-09-120Z`, safe for file names.
pub fn to_file_stamp(at: DateTime<Utc>) -> String {
    to_iso(at).replace([':', '.'], "-")
}

/// Inverse of [`to_file_stamp`]. Expects exactly `YYYY-MM-DDTHH-MM-SS-mmmZ`.
pub fn from_file_stamp(stamp: &str) -> Option<DateTime<Utc>> {
    let (date, time) = stamp.split_once('T')?;
    let time = time.strip_suffix('Z')?;
    let mut parts = time.split('-');
    let (h, m, s, ms) = (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let iso = format!("{date}T{h}:{m}:{s}.{ms}Z");
    DateTime::parse_from_rfc3339(&iso)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
