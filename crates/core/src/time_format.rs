//! Timestamp and elapsed-counter formatting
//!
//! Display formats are `YYYY/MM/DD HH:mm:ss` for timestamps and `HH:mm:ss`
//! for the elapsed counter. Storage uses fixed-width ISO-8601 with
//! millisecond precision so that text order matches time order.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Rendered in place of a timestamp that is not set yet
pub const UNKNOWN: &str = "unknown";

const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Render `n` with exactly two digits.
///
/// Only the last two digits survive, so `123` renders as `"23"`. Elapsed
/// values of 100 hours or more are not supported.
pub fn pad_two_digits(n: u32) -> String {
    format!("{:02}", n % 100)
}

/// `YYYY/MM/DD`
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{}/{}/{}",
        date.year(),
        pad_two_digits(date.month()),
        pad_two_digits(date.day())
    )
}

/// `HH:mm:ss`
pub fn format_time(time: NaiveTime) -> String {
    format_elapsed(time.hour(), time.minute(), time.second())
}

/// `YYYY/MM/DD HH:mm:ss`, or [`UNKNOWN`] when the timestamp is absent
pub fn format_date_time(ts: Option<&NaiveDateTime>) -> String {
    match ts {
        Some(ts) => format!("{} {}", format_date(ts.date()), format_time(ts.time())),
        None => UNKNOWN.to_string(),
    }
}

/// Compose the `HH:mm:ss` counter string
pub fn format_elapsed(hours: u32, minutes: u32, seconds: u32) -> String {
    format!(
        "{}:{}:{}",
        pad_two_digits(hours),
        pad_two_digits(minutes),
        pad_two_digits(seconds)
    )
}

/// Split an `HH:mm:ss` counter string into hours, minutes and seconds.
///
/// Returns `None` unless the input is exactly eight characters with two-digit
/// fields and minutes/seconds below 60.
pub fn parse_elapsed(value: &str) -> Option<(u32, u32, u32)> {
    if value.len() != 8 {
        return None;
    }
    let mut parts = value.split(':');
    let mut field = || -> Option<u32> {
        let raw = parts.next()?;
        if raw.len() != 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok()
    };
    let (hours, minutes, seconds) = (field()?, field()?, field()?);
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    Some((hours, minutes, seconds))
}

/// Encode a timestamp for the indexed store
pub fn to_storage(ts: &NaiveDateTime) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

/// Decode a timestamp written by [`to_storage`]
pub fn from_storage(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, STORAGE_FORMAT)
}
