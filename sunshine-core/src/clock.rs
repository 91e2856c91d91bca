//! Local wall clock and face text formatting
//!
//! Wall time is carried as Unix epoch milliseconds and converted to local
//! time with a fixed UTC offset. Weekday and month names are the English
//! abbreviations, upper-cased for the face.

use core::fmt::Write;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Offset, Timelike, Utc, Weekday};
use heapless::String;

/// "H:MM" in 12-hour form
pub type TimeText = String<8>;
/// "WED, OCT 21 2026"
pub type DateText = String<24>;

const SECONDS_PER_DAY: i32 = 86_400;

/// Fixed-offset local clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    offset: FixedOffset,
}

impl Default for LocalClock {
    fn default() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl LocalClock {
    /// Offsets outside ±24h fall back to UTC
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self {
            offset: offset_from_minutes(utc_offset_minutes).unwrap_or(Utc.fix()),
        }
    }

    /// Change the zone; returns true if the offset changed
    ///
    /// Out-of-range offsets are ignored.
    pub fn set_offset_minutes(&mut self, utc_offset_minutes: i32) -> bool {
        match offset_from_minutes(utc_offset_minutes) {
            Some(offset) if offset != self.offset => {
                self.offset = offset;
                true
            }
            _ => false,
        }
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// Local date and time at `epoch_ms`
    pub fn local(&self, epoch_ms: u64) -> NaiveDateTime {
        let ms = i64::try_from(epoch_ms).unwrap_or(i64::MAX);
        let utc = DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH);
        utc.with_timezone(&self.offset).naive_local()
    }
}

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    let seconds = minutes.checked_mul(60)?;
    if seconds.abs() >= SECONDS_PER_DAY {
        return None;
    }
    FixedOffset::east_opt(seconds)
}

/// Hour and minute as "H:MM", 12-hour clock, no seconds
///
/// Midnight and noon read "12".
pub fn time_text<T: Timelike>(time: &T) -> TimeText {
    let (_, hour) = time.hour12();
    let mut out = TimeText::new();
    // "12:59" always fits
    let _ = write!(out, "{}:{:02}", hour, time.minute());
    out
}

/// Upper-case abbreviated date, e.g. "WED, OCT 21 2026"
pub fn date_text<D: Datelike>(date: &D) -> DateText {
    let mut out = DateText::new();
    let _ = write!(
        out,
        "{}, {} {} {}",
        weekday_abbrev(date.weekday()),
        month_abbrev(date.month()),
        date.day(),
        date.year()
    );
    out
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "JAN",
        2 => "FEB",
        3 => "MAR",
        4 => "APR",
        5 => "MAY",
        6 => "JUN",
        7 => "JUL",
        8 => "AUG",
        9 => "SEP",
        10 => "OCT",
        11 => "NOV",
        _ => "DEC",
    }
}
