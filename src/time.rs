//! Time and Timezone Utilities Module
//!
//! Date parsing, date ranges, intraday sampling windows and timezone
//! resolution.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_english::{Dialect, parse_date_string};
use chrono_tz::Tz;
use iana_time_zone::get_timezone;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

use crate::error::{EstimateError, Result};

// Built on first coordinate lookup
static TZF_FINDER: OnceLock<DefaultFinder> = OnceLock::new();

// ===================== DATE PARSING =====================

/// Parse a calendar date.
///
/// ISO dates ("2023-01-01") are read directly; anything else goes through
/// `chrono_english` relative to the current time in `tz` ("today",
/// "yesterday", "Jan 5 2023").
pub fn parse_date(s: &str, tz: Tz) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(d);
    }

    let anchor = Utc::now().with_timezone(&tz);
    parse_date_string(trimmed, anchor, Dialect::Us).map(|dt| dt.date_naive()).map_err(|e| {
        EstimateError::InvalidDate { input: s.to_string(), message: e.to_string() }
    })
}

// ===================== DATE RANGE =====================

/// Inclusive range of calendar days, interpreted in one time zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub tz: Tz,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate, tz: Tz) -> Self {
        Self { start, end, tz }
    }

    /// Days in order; empty when `end` precedes `start`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// Days paired with their window in the range's zone; `None` for days
    /// the zone skips.
    pub fn windows(
        &self,
    ) -> impl Iterator<Item = (NaiveDate, Option<(DateTime<Tz>, DateTime<Tz>)>)> + '_ {
        self.days().map(move |d| (d, day_window(self.tz, d)))
    }

    pub fn len(&self) -> usize {
        if self.end < self.start { 0 } else { (self.end - self.start).num_days() as usize + 1 }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ===================== DAY WINDOWS =====================

/// First existing instant of a calendar day.
///
/// Normally local midnight; DST gaps at midnight move it to the first valid
/// hour. Returns `None` for days that do not exist in the zone at all.
pub fn start_of_day(tz: Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    (0..24).find_map(|hour| {
        let naive = date.and_hms_opt(hour, 0, 0)?;
        match tz.from_local_datetime(&naive) {
            chrono::LocalResult::Single(t) => Some(t),
            chrono::LocalResult::Ambiguous(t, _) => Some(t), // first occurrence
            chrono::LocalResult::None => None,
        }
    })
}

/// Start and end instants of a calendar day in `tz`.
///
/// The end is the start of the next existing day, so 23 h and 25 h DST days
/// come out with their real length.
pub fn day_window(tz: Tz, date: NaiveDate) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
    let start = start_of_day(tz, date)?;
    let end = date
        .succ_opt()
        .and_then(|next| start_of_day(tz, next))
        .unwrap_or_else(|| start + Duration::hours(24));
    Some((start, end))
}

/// One integration interval inside a day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSlot {
    /// Instant the interval is evaluated at
    pub midpoint: DateTime<Tz>,
    /// Interval length in hours
    pub hours: f64,
}

/// Split `[start, end)` into slots of `step_minutes`, the last one possibly shorter.
pub fn time_slots(start: DateTime<Tz>, end: DateTime<Tz>, step_minutes: u32) -> Vec<TimeSlot> {
    let step = Duration::minutes(i64::from(step_minutes.max(1)));
    let mut slots = Vec::new();
    let mut current = start;

    while current < end {
        let next = (current + step).min(end);
        let length = next - current;
        slots.push(TimeSlot {
            midpoint: current + length / 2,
            hours: length.num_seconds() as f64 / 3600.0,
        });
        current = next;
    }
    slots
}

// ===================== TIMEZONE UTILITIES =====================

/// The system's configured zone, UTC when it cannot be determined.
pub fn system_timezone() -> Tz {
    get_timezone().ok().and_then(|name| name.parse().ok()).unwrap_or(Tz::UTC)
}

/// Zone containing the given coordinates, UTC when the lookup fails.
pub fn resolve_timezone(lon: f64, lat: f64) -> Tz {
    let finder = TZF_FINDER.get_or_init(DefaultFinder::new);
    finder.get_tz_name(lon, lat).parse().unwrap_or(Tz::UTC)
}

/// Interpret a `--timezone` value: "system", "location" or an IANA name.
pub fn timezone_from_arg(arg: &str, lon: f64, lat: f64) -> Result<Tz> {
    match arg {
        "system" => Ok(system_timezone()),
        "location" => Ok(resolve_timezone(lon, lat)),
        other => other.parse::<Tz>().map_err(|_| EstimateError::Timezone(other.to_string())),
    }
}

// ===================== FORMATTING =====================

/// Format a duration in hours as "Xh Ym".
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours.abs() * 60.0).round() as i64;
    let h = total_minutes / 60;
    let m = total_minutes % 60;

    match (h, m) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

// ===================== TESTS =====================
