//! Date parsing for listing and detail pages.
//!
//! Japanese portals print dates as `2025年5月1日`, optionally followed by a
//! time; detail pages carry ISO 8601 timestamps in meta tags. Dates without an
//! explicit offset are taken to be Japan Standard Time and converted to UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `YYYY年M月D日`, with an optional `H:MM` or `H時MM分` time.
static JAPANESE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})年\s*(\d{1,2})月\s*(\d{1,2})日(?:[^\d]{0,6}?(\d{1,2})(?::|時)(\d{2})分?)?")
        .expect("japanese date regex")
});

/// Explicit format the caller knows a date string is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateHint {
    /// `YYYY年MM月DD日`
    JapaneseYmd,
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("JST offset")
}

/// Find the first `YYYY年M月D日` substring in `text`.
pub fn find_japanese_date(text: &str) -> Option<&str> {
    JAPANESE_DATE.find(text).map(|m| m.as_str())
}

/// Whether `text` contains a `YYYY年M月D日` date.
pub fn contains_japanese_date(text: &str) -> bool {
    JAPANESE_DATE.is_match(text)
}

/// Parse a date string into UTC.
///
/// With a hint the string must be in that format. Without one, a Japanese
/// date is still recognised, then the common machine formats are tried.
/// Returns `None` when nothing matches.
pub fn parse_date(text: &str, hint: Option<DateHint>) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match hint {
        Some(DateHint::JapaneseYmd) => parse_japanese(text),
        None => parse_japanese(text).or_else(|| parse_generic(text)),
    }
}

fn parse_japanese(text: &str) -> Option<DateTime<Utc>> {
    let caps = JAPANESE_DATE.captures(text)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let time = match (caps.get(4), caps.get(5)) {
        (Some(h), Some(m)) => {
            NaiveTime::from_hms_opt(h.as_str().parse().ok()?, m.as_str().parse().ok()?, 0)?
        }
        _ => NaiveTime::MIN,
    };

    from_jst(date.and_time(time))
}

fn parse_generic(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats_with_tz = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S %z"];
    for fmt in &formats_with_tz {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let formats_naive = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y.%m.%d %H:%M",
    ];
    for fmt in &formats_naive {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return from_jst(naive);
        }
    }

    let formats_date = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
    for fmt in &formats_date {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return from_jst(date.and_time(NaiveTime::MIN));
        }
    }

    None
}

fn from_jst(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    jst()
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
