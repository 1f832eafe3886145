//! Natural-language date/time extraction.
//!
//! Resolves an absolute moment from free-form command text using two
//! strategies in fixed priority order: an explicit phrase parser (clock
//! times, day words, weekday names, calendar dates) and a
//! calendar-arithmetic parser for relative offsets ("in 2 hours", "next
//! week"). The first strategy to produce a value wins; the order is a
//! tie-break policy because the strategies can disagree on ambiguous input.
//!
//! Absence of a date/time is a normal outcome for non-scheduling text and
//! is reported as `None`, never as an error.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday,
};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ParsedMoment;

static MERIDIEM_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*([ap])\.?m\.?\b").expect("valid regex")
});
static CLOCK24_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").expect("valid regex"));
static NAMED_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(noon|midday|midnight)\b").expect("valid regex"));

static DAY_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(day\s+after\s+tomorrow|tomorrow|today|tonight)\b").expect("valid regex")
});
static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(next\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("valid regex")
});
static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?\b",
    )
    .expect("valid regex")
});
static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(?:of\s+)?(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?(?:,?\s+(\d{4}))?\b",
    )
    .expect("valid regex")
});
static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?\b").expect("valid regex"));

static RELATIVE_OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bin\s+(\d+|an?|half\s+an)\s+(minute|hour|day|week|month)s?\b")
        .expect("valid regex")
});
static NEXT_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bnext\s+(week|month|year)\b").expect("valid regex"));

/// Extract an absolute moment from `text`, interpreted relative to `now`.
///
/// The returned moment carries `now`'s timezone as its context. Returns
/// `None` when neither strategy finds a date or time.
pub fn extract_moment(text: &str, now: DateTime<Tz>) -> Option<ParsedMoment> {
    parse_explicit(text, &now)
        .or_else(|| parse_relative(text, &now))
        .map(|local| ParsedMoment::new(local).with_timezone(now.timezone()))
}

/// Primary strategy: explicit calendar dates, day words, and clock times.
fn parse_explicit(text: &str, now: &DateTime<Tz>) -> Option<NaiveDateTime> {
    let date = explicit_date(text, now);
    let time = explicit_time(text);

    match (date, time) {
        (Some(date), Some(time)) => Some(date.and_time(time)),
        // Date without a time keeps the current wall-clock time on the
        // named day.
        (Some(date), None) => Some(date.and_time(truncate_to_minute(now.time()))),
        (None, Some(time)) => Some(next_occurrence(time, now)),
        (None, None) => None,
    }
}

/// Secondary strategy: relative offsets computed with calendar arithmetic.
fn parse_relative(text: &str, now: &DateTime<Tz>) -> Option<NaiveDateTime> {
    let base = truncate_to_minute_dt(now.naive_local());

    if let Some(caps) = RELATIVE_OFFSET.captures(text) {
        let quantity = caps.get(1)?.as_str().to_ascii_lowercase();
        let unit = caps.get(2)?.as_str().to_ascii_lowercase();

        if quantity.starts_with("half") {
            // "in half an hour" is the only half-unit phrase supported
            return if unit == "hour" { Some(base + Duration::minutes(30)) } else { None };
        }

        let count: i64 = match quantity.as_str() {
            "a" | "an" => 1,
            digits => digits.parse().ok()?,
        };

        return match unit.as_str() {
            "minute" => Some(base + Duration::minutes(count)),
            "hour" => Some(base + Duration::hours(count)),
            "day" => Some(base + Duration::days(count)),
            "week" => Some(base + Duration::weeks(count)),
            "month" => base.checked_add_months(Months::new(u32::try_from(count).ok()?)),
            _ => None,
        };
    }

    if let Some(caps) = NEXT_PERIOD.captures(text) {
        return match caps.get(1)?.as_str().to_ascii_lowercase().as_str() {
            "week" => Some(base + Duration::weeks(1)),
            "month" => base.checked_add_months(Months::new(1)),
            "year" => base.checked_add_months(Months::new(12)),
            _ => None,
        };
    }

    None
}

fn explicit_time(text: &str) -> Option<NaiveTime> {
    if let Some(caps) = MERIDIEM_TIME.captures(text) {
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
        if !(1..=12).contains(&hour) {
            return None;
        }
        let meridiem = caps.get(3)?.as_str().to_ascii_lowercase();
        let hour24 = match (hour, meridiem.as_str()) {
            (12, "a") => 0,
            (12, "p") => 12,
            (h, "a") => h,
            (h, _) => h + 12,
        };
        return NaiveTime::from_hms_opt(hour24, minute, 0);
    }

    if let Some(caps) = NAMED_TIME.captures(text) {
        return match caps.get(1)?.as_str().to_ascii_lowercase().as_str() {
            "midnight" => NaiveTime::from_hms_opt(0, 0, 0),
            _ => NaiveTime::from_hms_opt(12, 0, 0),
        };
    }

    if let Some(caps) = CLOCK24_TIME.captures(text) {
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }

    None
}

fn explicit_date(text: &str, now: &DateTime<Tz>) -> Option<NaiveDate> {
    let today = now.date_naive();

    if let Some(caps) = DAY_WORD.captures(text) {
        let word = caps.get(1)?.as_str().to_ascii_lowercase();
        let offset = if word.starts_with("day") {
            2
        } else if word == "tomorrow" {
            1
        } else {
            0
        };
        return today.checked_add_days(chrono::Days::new(offset));
    }

    if let Some(caps) = WEEKDAY.captures(text) {
        let target = parse_weekday(caps.get(2)?.as_str())?;
        let mut offset = i64::from(target.num_days_from_monday())
            - i64::from(now.weekday().num_days_from_monday());
        offset = offset.rem_euclid(7);
        if offset == 0 {
            offset = 7;
        }
        if caps.get(1).is_some() && offset < 7 {
            offset += 7;
        }
        return today.checked_add_days(chrono::Days::new(u64::try_from(offset).ok()?));
    }

    if let Some(caps) = MONTH_DAY.captures(text) {
        let month = parse_month(caps.get(1)?.as_str())?;
        let day: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year = caps.get(3).map_or(Ok(today.year()), |y| y.as_str().parse()).ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DAY_MONTH.captures(text) {
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month = parse_month(caps.get(2)?.as_str())?;
        let year = caps.get(3).map_or(Ok(today.year()), |y| y.as_str().parse()).ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = NUMERIC_DATE.captures(text) {
        let first: u32 = caps.get(1)?.as_str().parse().ok()?;
        let second: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year = match caps.get(3) {
            Some(y) => {
                let raw: i32 = y.as_str().parse().ok()?;
                if raw < 100 {
                    2000 + raw
                } else {
                    raw
                }
            }
            None => today.year(),
        };
        // Day-first reading; swapped only when that is the sole valid order.
        let (day, month) = if first > 12 && second <= 12 {
            (first, second)
        } else if first <= 12 && second > 12 {
            (second, first)
        } else {
            (first, second)
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Next occurrence of `time`: today if still ahead of `now`, else tomorrow.
fn next_occurrence(time: NaiveTime, now: &DateTime<Tz>) -> NaiveDateTime {
    let today = now.date_naive();
    if time > now.time() {
        today.and_time(time)
    } else {
        today.and_time(time) + Duration::days(1)
    }
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_month(prefix: &str) -> Option<u32> {
    match prefix.to_ascii_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

fn truncate_to_minute_dt(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(truncate_to_minute(dt.time()))
}
