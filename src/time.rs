//! Date, time, and UTC-offset normalization.
//!
//! Journal documents carry times as loose tokens (`09:00`, `21:15:30-07:00`).
//! This module recognises those tokens, fills in missing pieces, and turns a
//! local `(date, time, offset)` triple into a UTC timestamp for row export.
//!
//! ## Daylight saving
//!
//! The DST window is the US rule evaluated on the local calendar, not a
//! timezone-database lookup:
//!
//! ```text
//! [second Sunday of March 02:00, first Sunday of November 02:00)
//! ```
//!
//! The start is inclusive, the end exclusive. Inside the window a default
//! offset gains one hour (`-08:00` → `-07:00`).
//!
//! ## UTC conversion modes
//!
//! [`UtcMode::NowDelta`] reproduces the historical export behaviour: the wall
//! clock is read as host-local time and corrected with the host's *current*
//! local-vs-UTC delta, so entries from the other side of a DST change drift by
//! an hour. [`UtcMode::Historical`] uses the delta in force at the entry's own
//! instant, which reduces to `local - offset`.

use chrono::{
    DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Weekday,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"));

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}:\d{2})(:\d{2})?([+-]\d{2}:\d{2})?$").expect("time pattern compiles")
});

static OFFSET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])(\d{2}):(\d{2})$").expect("offset pattern compiles"));

const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeError {
    #[error("invalid date/time: {0:?}")]
    InvalidDateTime(String),
    #[error("invalid UTC offset: {0:?}")]
    InvalidOffset(String),
    #[error("timestamp out of range: {0}")]
    OutOfRange(String),
}

/// How [`compute_utc_datetime`] corrects for the host's local zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UtcMode {
    /// Correct with the local-vs-UTC delta at the moment of computation.
    ///
    /// Seconds are carried through. The historical export truncated the
    /// wall clock to minutes, so its rows always ended in `:00`; rows from
    /// this mode only match it for times without seconds.
    #[default]
    NowDelta,
    /// Correct with the local-vs-UTC delta at the entry's own instant.
    Historical,
}

/// A time token split into its normalized time and optional offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInfo {
    /// Always `HH:MM:SS`.
    pub time: String,
    /// `±HH:MM` when the token carried one.
    pub offset: Option<String>,
}

/// A parsed `±HH:MM` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcOffset {
    pub negative: bool,
    pub hours: u32,
    pub minutes: u32,
}

impl UtcOffset {
    pub fn parse(offset: &str) -> Option<Self> {
        let caps = OFFSET_PATTERN.captures(offset)?;
        Some(Self {
            negative: &caps[1] == "-",
            hours: caps[2].parse().ok()?,
            minutes: caps[3].parse().ok()?,
        })
    }

    /// Signed offset east of UTC, in seconds.
    pub fn seconds(self) -> i64 {
        let magnitude = i64::from(self.hours) * 3600 + i64::from(self.minutes) * 60;
        if self.negative { -magnitude } else { magnitude }
    }
}

/// Whole-token match for `YYYY-MM-DD`.
pub fn is_date_token(text: &str) -> bool {
    DATE_PATTERN.is_match(text)
}

/// Whole-token match for `HH:MM[:SS][±HH:MM]`.
pub fn is_time_token(text: &str) -> bool {
    TIME_PATTERN.is_match(text)
}

/// Split a time token into a `HH:MM:SS` time and its optional offset.
///
/// ```
/// # use journal_cards::time::extract_time_info;
/// let info = extract_time_info("14:30").unwrap();
/// assert_eq!(info.time, "14:30:00");
/// assert_eq!(info.offset, None);
///
/// let info = extract_time_info("14:30:05-07:00").unwrap();
/// assert_eq!(info.time, "14:30:05");
/// assert_eq!(info.offset.as_deref(), Some("-07:00"));
///
/// assert!(extract_time_info("lunch").is_none());
/// ```
pub fn extract_time_info(text: &str) -> Option<TimeInfo> {
    let caps = TIME_PATTERN.captures(text)?;
    let time = match caps.get(2) {
        Some(seconds) => format!("{}{}", &caps[1], seconds.as_str()),
        None => format!("{}:00", &caps[1]),
    };
    Some(TimeInfo {
        time,
        offset: caps.get(3).map(|m| m.as_str().to_string()),
    })
}

/// Parse `YYYY-MM-DD` plus `HH:MM:SS` (or `HH:MM`) into a naive datetime.
pub fn parse_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .ok()?;
    Some(date.and_time(time))
}

/// DST bounds for `year`: second Sunday of March and first Sunday of
/// November, both at 02:00.
pub fn dst_window(year: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = NaiveDate::from_weekday_of_month_opt(year, 3, Weekday::Sun, 2)?;
    let end = NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Sun, 1)?;
    Some((start.and_hms_opt(2, 0, 0)?, end.and_hms_opt(2, 0, 0)?))
}

/// Whether `(date, time)` falls inside the US DST window of its year.
///
/// Unparseable input is treated as outside the window.
pub fn is_daylight_savings_time(date: &str, time: &str) -> bool {
    let Some(instant) = parse_datetime(date, time) else {
        log::warn!("cannot evaluate DST for {date:?} {time:?}; assuming standard time");
        return false;
    };
    match dst_window(chrono::Datelike::year(&instant)) {
        Some((start, end)) => instant >= start && instant < end,
        None => false,
    }
}

/// Add one hour to `offset` when `(date, time)` is inside the DST window.
///
/// The sign is recomputed from the adjusted hour, so `-01:00` becomes
/// `+00:00`. Minutes are carried over untouched.
pub fn adjust_offset_for_daylight_savings(date: &str, time: &str, offset: &str) -> String {
    if !is_daylight_savings_time(date, time) {
        return offset.to_string();
    }
    let Some(parsed) = UtcOffset::parse(offset) else {
        log::warn!("malformed offset {offset:?}; leaving it unadjusted");
        return offset.to_string();
    };
    let hours = parsed.hours as i32;
    let adjusted = if parsed.negative { -hours } else { hours } + 1;
    let sign = if adjusted < 0 { '-' } else { '+' };
    format!("{sign}{:02}:{:02}", adjusted.abs(), parsed.minutes)
}

/// Convert a local `(date, time, offset)` triple into a UTC timestamp string
/// (`YYYY-MM-DDTHH:MM:SS`).
pub fn compute_utc_datetime(
    date: &str,
    time: &str,
    offset: &str,
    mode: UtcMode,
) -> Result<String, TimeError> {
    let naive = parse_datetime(date, time)
        .ok_or_else(|| TimeError::InvalidDateTime(format!("{date} {time}")))?;
    let offset_seconds = UtcOffset::parse(offset)
        .ok_or_else(|| TimeError::InvalidOffset(offset.to_string()))?
        .seconds();
    let adjustment = match mode {
        UtcMode::Historical => 0,
        UtcMode::NowDelta => now_local_delta() - local_delta_at(&naive),
    };
    let utc = shift_to_utc(naive, offset_seconds, adjustment)?;
    Ok(utc.format(UTC_FORMAT).to_string())
}

/// `naive - offset + adjustment`, all in seconds.
fn shift_to_utc(
    naive: NaiveDateTime,
    offset_seconds: i64,
    adjustment_seconds: i64,
) -> Result<NaiveDateTime, TimeError> {
    let delta = TimeDelta::try_seconds(adjustment_seconds - offset_seconds)
        .ok_or_else(|| TimeError::OutOfRange(naive.to_string()))?;
    naive
        .checked_add_signed(delta)
        .ok_or_else(|| TimeError::OutOfRange(naive.to_string()))
}

/// Host local-minus-UTC delta right now, in seconds.
fn now_local_delta() -> i64 {
    i64::from(Local::now().offset().local_minus_utc())
}

/// Host local-minus-UTC delta in force at a local wall-clock instant.
///
/// Wall-clock times skipped by a DST jump fall back to reading `naive` as UTC.
fn local_delta_at(naive: &NaiveDateTime) -> i64 {
    let offset = Local
        .offset_from_local_datetime(naive)
        .earliest()
        .unwrap_or_else(|| Local.offset_from_utc_datetime(naive));
    i64::from(offset.fix().local_minus_utc())
}

/// Current local time as `YYYY-MM-DD HH:MM:SS`.
pub fn current_datetime() -> String {
    let now: DateTime<Local> = Local::now();
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}
