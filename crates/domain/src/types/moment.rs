//! Resolved date/time moments
//!
//! A [`ParsedMoment`] is the extractor's output: a wall-clock date and time
//! plus whatever timezone context the winning parse strategy had. Callers
//! must not assume UTC; a moment with no zone of its own is resolved against
//! a default zone at the calendar boundary.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// An absolute point in time with optional timezone context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMoment {
    /// Wall-clock date and time as spoken.
    pub local: NaiveDateTime,
    /// Zone the parse happened in; `None` means ambiguous.
    pub timezone: Option<Tz>,
}

impl ParsedMoment {
    pub fn new(local: NaiveDateTime) -> Self {
        Self { local, timezone: None }
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }

    /// Zone used when serializing this moment for the calendar provider.
    pub fn effective_timezone(&self, default: Tz) -> Tz {
        self.timezone.unwrap_or(default)
    }

    /// Resolve the wall-clock value into a zoned instant.
    ///
    /// DST ambiguity picks the earlier instant; a nonexistent local time
    /// (spring-forward gap) is interpreted as UTC in the same zone.
    pub fn resolve(&self, default: Tz) -> DateTime<Tz> {
        let tz = self.effective_timezone(default);
        match tz.from_local_datetime(&self.local) {
            LocalResult::Single(instant) => instant,
            LocalResult::Ambiguous(earlier, _) => earlier,
            LocalResult::None => tz.from_utc_datetime(&self.local),
        }
    }

    /// RFC 3339 rendering in the given default zone, as the provider expects.
    pub fn to_rfc3339(&self, default: Tz) -> String {
        self.resolve(default).to_rfc3339()
    }

    /// Canonical textual form injected into the interpreter prompt.
    pub fn canonical_text(&self) -> String {
        match self.timezone {
            Some(tz) => format!("{} {}", self.local.format("%Y-%m-%dT%H:%M:%S"), tz),
            None => self.local.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }

    /// Moment shifted forward, keeping the timezone context.
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        Self { local: self.local + Duration::minutes(minutes), timezone: self.timezone }
    }
}
