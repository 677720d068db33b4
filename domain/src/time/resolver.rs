//! Relative date and fuzzy clock-time resolution.
//!
//! All arithmetic happens in one configured timezone. Date expressions
//! degrade to "today" when they cannot be understood; clock times do not
//! degrade, because inventing a time would silently book the wrong slot.

use super::clock::{Clock, SystemClock};
use crate::core::error::DomainError;
use chrono::{
    DateTime, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use std::sync::Arc;
use thiserror::Error;

/// Timezone used when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Errors from time parsing.
///
/// Date expressions never produce these; only clock times and explicit
/// timestamps can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Could not understand the time '{0}'")]
    UnrecognizedTime(String),

    #[error("Could not understand the date and time '{0}'")]
    UnrecognizedDateTime(String),
}

/// A half-open `[start, end)` interval in the resolver's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeRange {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        *instant >= self.start && *instant < self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Outcome of resolving a date expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    /// True when the expression was not understood and "today" was assumed.
    pub fell_back: bool,
}

/// Turns relative date expressions and fuzzy clock times into absolute
/// timestamps anchored to a fixed timezone.
#[derive(Clone)]
pub struct TimeResolver {
    tz: Tz,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TimeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeResolver").field("tz", &self.tz).finish()
    }
}

impl Default for TimeResolver {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl TimeResolver {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            clock: Arc::new(SystemClock),
        }
    }

    /// Build from an IANA name such as `"America/New_York"`.
    pub fn from_name(name: &str) -> Result<Self, DomainError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| DomainError::UnknownTimezone(name.to_string()))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.tz)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Human-readable current time, injected into every user message.
    pub fn context_line(&self) -> String {
        format!(
            "{} ({})",
            self.now().format("%A, %B %d, %Y at %I:%M %p"),
            self.tz.name()
        )
    }

    /// Resolve "today", "tomorrow", an ISO date or an ISO timestamp.
    /// Anything else falls back to today.
    pub fn resolve_date(&self, expression: &str) -> ResolvedDate {
        let today = self.today();
        let normalized = expression.trim().to_lowercase();

        let parsed = match normalized.as_str() {
            "" | "today" => Some(today),
            "tomorrow" => today.checked_add_days(Days::new(1)),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                .ok()
                .or_else(|| self.parse_datetime(other).ok().map(|dt| dt.date_naive())),
        };

        match parsed {
            Some(date) => ResolvedDate {
                date,
                fell_back: false,
            },
            None => ResolvedDate {
                date: today,
                fell_back: true,
            },
        }
    }

    /// Resolve a date expression into `[midnight, midnight + span_days)`.
    ///
    /// A `span_days` of zero is treated as one day.
    pub fn resolve_range(&self, expression: &str, span_days: u32) -> TimeRange {
        let resolved = self.resolve_date(expression);
        self.day_range(resolved.date, span_days)
    }

    /// Range covering whole calendar days starting at `date`.
    pub fn day_range(&self, date: NaiveDate, span_days: u32) -> TimeRange {
        let span = u64::from(span_days.max(1));
        let end_date = date.checked_add_days(Days::new(span)).unwrap_or(date);
        TimeRange::new(
            self.localize(date.and_time(NaiveTime::MIN)),
            self.localize(end_date.and_time(NaiveTime::MIN)),
        )
    }

    /// Combine a fuzzy clock time ("3pm", "15:00", "3:00 PM", "noon") with
    /// the calendar day of `reference_date`.
    pub fn resolve_point(
        &self,
        time_expression: &str,
        reference_date: NaiveDate,
    ) -> Result<DateTime<Tz>, TimeParseError> {
        let time = parse_clock_time(time_expression)
            .ok_or_else(|| TimeParseError::UnrecognizedTime(time_expression.trim().to_string()))?;
        Ok(self.localize(reference_date.and_time(time)))
    }

    /// Parse an explicit timestamp. Offsets are honoured and converted;
    /// naive timestamps are localized to the configured timezone.
    pub fn parse_datetime(&self, value: &str) -> Result<DateTime<Tz>, TimeParseError> {
        let trimmed = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.with_timezone(&self.tz));
        }

        const NAIVE_FORMATS: [&str; 4] = [
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
        ];
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .map(|naive| self.localize(naive))
            .ok_or_else(|| TimeParseError::UnrecognizedDateTime(trimmed.to_string()))
    }

    /// Attach the configured timezone to a wall-clock time.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant; times in a
    /// DST gap move forward by an hour.
    pub fn localize(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => self
                .tz
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .unwrap_or_else(|| self.tz.from_utc_datetime(&naive)),
        }
    }

    /// Convert any instant into the configured timezone.
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }
}

/// Parse a clock time. Returns `None` for anything unrecognised.
fn parse_clock_time(input: &str) -> Option<NaiveTime> {
    let lowered = input.trim().to_lowercase();
    match lowered.as_str() {
        "noon" | "midday" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }

    let compact: String = lowered
        .replace("a.m.", "am")
        .replace("p.m.", "pm")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let (body, meridiem) = if let Some(rest) = compact.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = compact.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (compact.as_str(), None)
    };

    let mut fields = body.split([':', '.']);
    let hour: u32 = fields.next()?.parse().ok()?;
    let minute: u32 = match fields.next() {
        Some(m) if m.len() == 2 => m.parse().ok()?,
        Some(_) => return None,
        None if meridiem.is_some() => 0,
        // A bare number like "3" is too ambiguous to book.
        None => return None,
    };
    let second: u32 = match fields.next() {
        Some(s) if s.len() == 2 => s.parse().ok()?,
        Some(_) => return None,
        None => 0,
    };
    if fields.next().is_some() {
        return None;
    }

    let hour = match meridiem {
        Some(is_pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (hour, is_pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, false) => h,
                (h, true) => h + 12,
            }
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::clock::FixedClock;
    use chrono::Timelike;

    /// 2026-10-18 14:30 in New York (EDT, UTC-4).
    fn resolver() -> TimeResolver {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 18, 30, 0).unwrap();
        TimeResolver::new(DEFAULT_TIMEZONE).with_clock(Arc::new(FixedClock(now)))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_is_local_date() {
        assert_eq!(resolver().today(), date(2026, 10, 18));
    }

    #[test]
    fn test_resolve_range_today_and_tomorrow() {
        let r = resolver();
        let today = r.resolve_range("today", 1);
        assert_eq!(today.start, r.localize(date(2026, 10, 18).and_time(NaiveTime::MIN)));
        assert_eq!(today.end, r.localize(date(2026, 10, 19).and_time(NaiveTime::MIN)));

        let tomorrow = r.resolve_range("Tomorrow", 1);
        assert_eq!(tomorrow.start.date_naive(), date(2026, 10, 19));
        assert_eq!(tomorrow.end.date_naive(), date(2026, 10, 20));
    }

    #[test]
    fn test_resolve_range_iso_date_with_span() {
        let range = resolver().resolve_range("2026-12-24", 3);
        assert_eq!(range.start.date_naive(), date(2026, 12, 24));
        assert_eq!(range.end.date_naive(), date(2026, 12, 27));
    }

    #[test]
    fn test_unparseable_date_falls_back_to_today() {
        let r = resolver();
        assert_eq!(r.resolve_range("not-a-real-date", 1), r.resolve_range("today", 1));
        assert!(r.resolve_date("someday").fell_back);
        assert!(!r.resolve_date("today").fell_back);
    }

    #[test]
    fn test_zero_span_is_one_day() {
        let r = resolver();
        assert_eq!(r.resolve_range("today", 0), r.resolve_range("today", 1));
    }

    #[test]
    fn test_resolve_point_accepts_fuzzy_formats() {
        let r = resolver();
        let day = date(2026, 10, 19);
        let expected = r.localize(day.and_hms_opt(15, 0, 0).unwrap());

        for input in ["3pm", "3 PM", "3:00 PM", "15:00", "3:00pm", "3 p.m.", "15:00:00"] {
            assert_eq!(r.resolve_point(input, day).unwrap(), expected, "input {input}");
        }

        assert_eq!(r.resolve_point("12am", day).unwrap().hour(), 0);
        assert_eq!(r.resolve_point("12pm", day).unwrap().hour(), 12);
        assert_eq!(r.resolve_point("noon", day).unwrap().hour(), 12);
        assert_eq!(r.resolve_point("9:45am", day).unwrap().minute(), 45);
    }

    #[test]
    fn test_resolve_point_failure_is_distinct() {
        let r = resolver();
        let day = date(2026, 10, 19);
        for input in ["sometime", "3", "25:00", "13pm", "3:7pm", ""] {
            assert!(
                matches!(r.resolve_point(input, day), Err(TimeParseError::UnrecognizedTime(_))),
                "input {input}"
            );
        }
    }

    #[test]
    fn test_parse_datetime_localizes_naive_and_converts_offsets() {
        let r = resolver();
        let naive = r.parse_datetime("2026-10-19T15:00:00").unwrap();
        assert_eq!(naive.hour(), 15);
        assert_eq!(naive.timezone(), DEFAULT_TIMEZONE);

        let utc = r.parse_datetime("2026-10-19T19:00:00Z").unwrap();
        assert_eq!(utc, naive);

        assert!(r.parse_datetime("next tuesday").is_err());
    }

    #[test]
    fn test_iso_timestamp_resolves_to_its_date() {
        let resolved = resolver().resolve_date("2026-11-02T09:00:00");
        assert_eq!(resolved.date, date(2026, 11, 2));
        assert!(!resolved.fell_back);
    }

    #[test]
    fn test_localize_handles_dst_gap() {
        let r = resolver();
        // 2027-03-14 02:30 does not exist in New York
        let dt = r.localize(date(2027, 3, 14).and_hms_opt(2, 30, 0).unwrap());
        assert_eq!(dt.hour(), 3);
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        assert!(TimeResolver::from_name("Europe/Berlin").is_ok());
        assert_eq!(
            TimeResolver::from_name("Mars/Olympus").unwrap_err(),
            DomainError::UnknownTimezone("Mars/Olympus".to_string())
        );
    }

    #[test]
    fn test_context_line_mentions_zone() {
        let line = resolver().context_line();
        assert_eq!(line, "Sunday, October 18, 2026 at 02:30 PM (America/New_York)");
    }

    #[test]
    fn test_range_contains_and_overlaps() {
        let r = resolver();
        let today = r.resolve_range("today", 1);
        let tomorrow = r.resolve_range("tomorrow", 1);
        assert!(today.contains(&r.now()));
        assert!(!tomorrow.contains(&r.now()));
        assert!(!today.overlaps(&tomorrow));
        assert!(r.resolve_range("today", 2).overlaps(&tomorrow));
    }
}
