//! Calendar helpers pinned to a display offset.
//!
//! Content published from the CMS carries UTC timestamps, while pages show
//! dates in a single local offset (Japan Standard Time unless configured
//! otherwise). [`Calendar`] does parsing, arithmetic and dayjs-style
//! formatting in that offset.
//!
//! Text inputs accept RFC 3339 (`2024-01-15T10:30:00Z`), naive date-times
//! (`2024-01-15T10:30:00`, `2024-01-15 10:30`) and plain dates (`2024-01-15`,
//! `2024/01/15`, `2024.01.15`). Naive values are read in the calendar offset.

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, Offset, SecondsFormat,
    TimeDelta, TimeZone, Timelike, Utc,
};

use crate::{
    config::CalendarConfig,
    error::{CoreError, Result},
};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// A date argument: either text to parse or an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    /// Text in one of the accepted layouts.
    Text(&'a str),
    /// An already-resolved instant.
    Instant(DateTime<Utc>),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl From<DateTime<Utc>> for DateInput<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

impl From<DateTime<FixedOffset>> for DateInput<'_> {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Instant(value.with_timezone(&Utc))
    }
}

/// Direction for [`Calendar::adjusted_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Move forward by the difference.
    Add,
    /// Move backward by the difference.
    Subtract,
}

/// Output shape for [`Calendar::current_date`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CurrentDateStyle {
    /// Default display format.
    #[default]
    Formatted,
    /// Four-digit year only.
    YearOnly,
    /// RFC 3339 with the calendar offset.
    Unformatted,
}

/// Date utilities bound to one display offset and default format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
    default_format: String,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            // +09:00 is always in range.
            offset: FixedOffset::east_opt(9 * 3600).unwrap_or(Utc.fix()),
            default_format: "YYYY.MM.DD".to_string(),
        }
    }
}

impl Calendar {
    /// Create a calendar for the given offset and default format.
    pub fn new(offset: FixedOffset, default_format: impl Into<String>) -> Self {
        Self {
            offset,
            default_format: default_format.into(),
        }
    }

    /// Build a calendar from configuration.
    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        Ok(Self::new(config.offset()?, config.default_format.clone()))
    }

    /// The display offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The default display format.
    pub fn default_format(&self) -> &str {
        &self.default_format
    }

    /// Resolve an input to a date-time in the calendar offset.
    pub fn parse<'a>(&self, input: impl Into<DateInput<'a>>) -> Result<DateTime<FixedOffset>> {
        match input.into() {
            DateInput::Instant(instant) => Ok(instant.with_timezone(&self.offset)),
            DateInput::Text(text) => self.parse_text(text),
        }
    }

    fn parse_text(&self, text: &str) -> Result<DateTime<FixedOffset>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::date(text, "empty input"));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(dt.with_timezone(&self.offset));
        }

        let naive = NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .or_else(|| {
                NAIVE_DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| CoreError::date(text, "unrecognized date layout"))?;

        self.localize(naive)
            .ok_or_else(|| CoreError::date(text, "not representable in the calendar offset"))
    }

    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        self.offset.from_local_datetime(&naive).single()
    }

    /// Format a date with dayjs-style tokens.
    pub fn format_date<'a>(&self, date: impl Into<DateInput<'a>>, format: &str) -> Result<String> {
        Ok(format_tokens(&self.parse(date)?, format))
    }

    /// Format a date with the default format.
    pub fn format_default<'a>(&self, date: impl Into<DateInput<'a>>) -> Result<String> {
        self.format_date(date, &self.default_format)
    }

    /// Add (or subtract, when negative) whole days.
    pub fn add_days<'a>(&self, date: impl Into<DateInput<'a>>, days: i64) -> Result<String> {
        let dt = self.parse(date)?;
        let shifted = TimeDelta::try_days(days)
            .and_then(|delta| dt.checked_add_signed(delta))
            .ok_or_else(|| CoreError::date(dt.to_rfc3339(), "day offset out of range"))?;
        Ok(self.display(&shifted))
    }

    /// Add (or subtract) calendar months, clamping to the end of the month.
    pub fn add_months<'a>(&self, date: impl Into<DateInput<'a>>, months: i32) -> Result<String> {
        let dt = self.parse(date)?;
        let shifted = shift_months(dt, months)
            .ok_or_else(|| CoreError::date(dt.to_rfc3339(), "month offset out of range"))?;
        Ok(self.display(&shifted))
    }

    /// Add (or subtract) calendar years; Feb 29 clamps to Feb 28.
    pub fn add_years<'a>(&self, date: impl Into<DateInput<'a>>, years: i32) -> Result<String> {
        let months = years
            .checked_mul(12)
            .ok_or_else(|| CoreError::date(years.to_string(), "year offset out of range"))?;
        self.add_months(date, months)
    }

    /// Whole days from `date2` to `date1`, truncated toward zero.
    pub fn diff_in_days<'a, 'b>(
        &self,
        date1: impl Into<DateInput<'a>>,
        date2: impl Into<DateInput<'b>>,
    ) -> Result<i64> {
        let d1 = self.parse(date1)?;
        let d2 = self.parse(date2)?;
        Ok(d1.signed_duration_since(d2).num_days())
    }

    /// Absolute difference between the calendar years of two dates.
    pub fn diff_in_years<'a, 'b>(
        &self,
        date1: impl Into<DateInput<'a>>,
        date2: impl Into<DateInput<'b>>,
    ) -> Result<u32> {
        let d1 = self.parse(date1)?;
        let d2 = self.parse(date2)?;
        Ok(d1.year().abs_diff(d2.year()))
    }

    /// Whether the input resolves to a real date.
    pub fn is_valid_date<'a>(&self, date: impl Into<DateInput<'a>>) -> bool {
        self.parse(date).is_ok()
    }

    /// Shift a UTC instant into the calendar offset and format it.
    pub fn convert_to_local_time<'a>(&self, date: impl Into<DateInput<'a>>) -> Result<String> {
        self.format_default(date)
    }

    /// The current date in the requested style.
    pub fn current_date(&self, style: CurrentDateStyle) -> String {
        self.current_date_at(Utc::now(), style)
    }

    /// [`Calendar::current_date`] against a fixed clock.
    pub fn current_date_at(&self, now: DateTime<Utc>, style: CurrentDateStyle) -> String {
        let now = now.with_timezone(&self.offset);
        match style {
            CurrentDateStyle::Formatted => self.display(&now),
            CurrentDateStyle::YearOnly => now.year().to_string(),
            CurrentDateStyle::Unformatted => now.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }

    /// Whether the date lies strictly before now.
    pub fn is_past_date<'a>(&self, date: impl Into<DateInput<'a>>) -> Result<bool> {
        self.is_past_date_at(date, Utc::now())
    }

    /// [`Calendar::is_past_date`] against a fixed clock.
    pub fn is_past_date_at<'a>(
        &self,
        date: impl Into<DateInput<'a>>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self.parse(date)? < now)
    }

    /// Whether the date lies strictly after now.
    pub fn is_future_date<'a>(&self, date: impl Into<DateInput<'a>>) -> Result<bool> {
        self.is_future_date_at(date, Utc::now())
    }

    /// [`Calendar::is_future_date`] against a fixed clock.
    pub fn is_future_date_at<'a>(
        &self,
        date: impl Into<DateInput<'a>>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self.parse(date)? > now)
    }

    /// ISO 8601 in UTC with millisecond precision, e.g. `2024-01-15T10:30:00.000Z`.
    pub fn to_iso_format<'a>(&self, date: impl Into<DateInput<'a>>) -> Result<String> {
        Ok(iso_utc(&self.parse(date)?))
    }

    /// First instant of `year` in the calendar offset, as a UTC ISO string.
    ///
    /// With the default offset, 2024 starts at `2023-12-31T15:00:00.000Z`.
    pub fn utc_start_of_year(&self, year: i32) -> Result<String> {
        Ok(iso_utc(&self.start_of_year(year)?))
    }

    /// Last millisecond of `year` in the calendar offset, as a UTC ISO string.
    pub fn utc_end_of_year(&self, year: i32) -> Result<String> {
        let end = self.start_of_year(year.saturating_add(1))? - TimeDelta::milliseconds(1);
        Ok(iso_utc(&end))
    }

    /// One millisecond before [`Calendar::utc_start_of_year`].
    pub fn utc_just_before_start_of_year(&self, year: i32) -> Result<String> {
        let start = self.start_of_year(year)?;
        Ok(iso_utc(&(start - TimeDelta::milliseconds(1))))
    }

    /// One millisecond before [`Calendar::utc_end_of_year`].
    pub fn utc_just_before_end_of_year(&self, year: i32) -> Result<String> {
        let end = self.start_of_year(year.saturating_add(1))? - TimeDelta::milliseconds(2);
        Ok(iso_utc(&end))
    }

    fn start_of_year(&self, year: i32) -> Result<DateTime<FixedOffset>> {
        NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|naive| self.localize(naive))
            .ok_or_else(|| CoreError::date(year.to_string(), "year out of range"))
    }

    /// The later of two dates, formatted. Ties return `date2`.
    pub fn newer_date<'a, 'b>(
        &self,
        date1: impl Into<DateInput<'a>>,
        date2: impl Into<DateInput<'b>>,
    ) -> Result<String> {
        let d1 = self.parse(date1)?;
        let d2 = self.parse(date2)?;
        Ok(self.display(if d1 > d2 { &d1 } else { &d2 }))
    }

    /// The earlier of two dates, formatted. Ties return `date2`.
    pub fn older_date<'a, 'b>(
        &self,
        date1: impl Into<DateInput<'a>>,
        date2: impl Into<DateInput<'b>>,
    ) -> Result<String> {
        let d1 = self.parse(date1)?;
        let d2 = self.parse(date2)?;
        Ok(self.display(if d1 < d2 { &d1 } else { &d2 }))
    }

    /// The midpoint between two dates, formatted.
    pub fn middle_date<'a, 'b>(
        &self,
        date1: impl Into<DateInput<'a>>,
        date2: impl Into<DateInput<'b>>,
    ) -> Result<String> {
        let d1 = self.parse(date1)?;
        let d2 = self.parse(date2)?;
        let half = d2.signed_duration_since(d1) / 2;
        let middle = d1
            .checked_add_signed(half)
            .ok_or_else(|| CoreError::date(d1.to_rfc3339(), "midpoint out of range"))?;
        Ok(self.display(&middle))
    }

    /// Move `date1` by the absolute whole-day distance between both dates.
    pub fn adjusted_date<'a, 'b>(
        &self,
        date1: impl Into<DateInput<'a>>,
        date2: impl Into<DateInput<'b>>,
        adjustment: Adjustment,
    ) -> Result<String> {
        let d1 = self.parse(date1)?;
        let d2 = self.parse(date2)?;
        let adjusted = TimeDelta::try_days(d1.signed_duration_since(d2).num_days().abs())
            .and_then(|days| match adjustment {
                Adjustment::Add => d1.checked_add_signed(days),
                Adjustment::Subtract => d1.checked_sub_signed(days),
            })
            .ok_or_else(|| CoreError::date(d1.to_rfc3339(), "adjusted date out of range"))?;
        Ok(self.display(&adjusted))
    }

    fn display(&self, dt: &DateTime<FixedOffset>) -> String {
        format_tokens(dt, &self.default_format)
    }
}

fn shift_months(dt: DateTime<FixedOffset>, months: i32) -> Option<DateTime<FixedOffset>> {
    let delta = Months::new(months.unsigned_abs());
    if months >= 0 {
        dt.checked_add_months(delta)
    } else {
        dt.checked_sub_months(delta)
    }
}

fn iso_utc(dt: &DateTime<FixedOffset>) -> String {
    dt.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy)]
enum Token {
    Year4,
    Year2,
    Month2,
    Month,
    Day2,
    Day,
    Hour2,
    Hour,
    Minute2,
    Minute,
    Second2,
    Second,
    Millis,
    Offset,
}

// Longest tokens first so `YYYY` wins over `YY`.
const TOKENS: &[(&str, Token)] = &[
    ("YYYY", Token::Year4),
    ("SSS", Token::Millis),
    ("YY", Token::Year2),
    ("MM", Token::Month2),
    ("DD", Token::Day2),
    ("HH", Token::Hour2),
    ("mm", Token::Minute2),
    ("ss", Token::Second2),
    ("M", Token::Month),
    ("D", Token::Day),
    ("H", Token::Hour),
    ("m", Token::Minute),
    ("s", Token::Second),
    ("Z", Token::Offset),
];

/// Render `dt` with dayjs-style tokens; `[...]` emits its content verbatim.
fn format_tokens(dt: &DateTime<FixedOffset>, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        if let Some((text, token)) = TOKENS.iter().find(|(text, _)| rest.starts_with(text)) {
            push_token(&mut out, dt, *token);
            rest = &rest[text.len()..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    out
}

fn push_token(out: &mut String, dt: &DateTime<FixedOffset>, token: Token) {
    use std::fmt::Write;

    // Writing into a String cannot fail.
    let _ = match token {
        Token::Year4 => write!(out, "{:04}", dt.year()),
        Token::Year2 => write!(out, "{:02}", dt.year().rem_euclid(100)),
        Token::Month2 => write!(out, "{:02}", dt.month()),
        Token::Month => write!(out, "{}", dt.month()),
        Token::Day2 => write!(out, "{:02}", dt.day()),
        Token::Day => write!(out, "{}", dt.day()),
        Token::Hour2 => write!(out, "{:02}", dt.hour()),
        Token::Hour => write!(out, "{}", dt.hour()),
        Token::Minute2 => write!(out, "{:02}", dt.minute()),
        Token::Minute => write!(out, "{}", dt.minute()),
        Token::Second2 => write!(out, "{:02}", dt.second()),
        Token::Second => write!(out, "{}", dt.second()),
        Token::Millis => write!(out, "{:03}", dt.timestamp_subsec_millis().min(999)),
        Token::Offset => write!(out, "{}", dt.offset()),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jst() -> Calendar {
        Calendar::default()
    }

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid rfc3339")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_format_date_from_instant() {
        let cal = jst();
        let date = instant("2024-01-15T10:30:00Z");
        assert_eq!(cal.format_date(date, "YYYY.MM.DD").unwrap(), "2024.01.15");
        assert_eq!(cal.format_default(date).unwrap(), "2024.01.15");
    }

    #[test]
    fn test_format_date_from_text() {
        let cal = jst();
        assert_eq!(cal.format_date("2024-01-15", "YYYY/MM/DD").unwrap(), "2024/01/15");
        assert_eq!(
            cal.format_date("2024-01-15T10:30:00Z", "YYYY年MM月DD日").unwrap(),
            "2024年01月15日"
        );
    }

    #[test]
    fn test_format_date_shifts_into_offset() {
        let cal = jst();
        assert_eq!(
            cal.format_date("2024-01-15T10:30:45Z", "YYYY.MM.DD HH:mm:ss").unwrap(),
            "2024.01.15 19:30:45"
        );
        // 20:00 UTC is already the next day in JST.
        assert_eq!(cal.format_default("2024-01-15T20:00:00Z").unwrap(), "2024.01.16");
    }

    #[test]
    fn test_format_tokens_misc() {
        let cal = jst();
        let date = "2024-03-05T01:02:03.045+09:00";
        assert_eq!(cal.format_date(date, "YY-M-D H:m:s.SSS Z").unwrap(), "24-3-5 1:2:3.045 +09:00");
        assert_eq!(cal.format_date(date, "[YYYY] YYYY").unwrap(), "YYYY 2024");
    }

    #[test]
    fn test_add_days() {
        let cal = jst();
        assert_eq!(cal.add_days("2024-01-15", 10).unwrap(), "2024.01.25");
        assert_eq!(cal.add_days("2024-01-15", -5).unwrap(), "2024.01.10");
        assert_eq!(cal.add_days("2024-01-31", 1).unwrap(), "2024.02.01");
        assert_eq!(cal.add_days("2023-12-31", 1).unwrap(), "2024.01.01");
        assert_eq!(
            cal.add_days(instant("2024-01-15T00:00:00Z"), 1).unwrap(),
            "2024.01.16"
        );
    }

    #[test]
    fn test_add_months() {
        let cal = jst();
        assert_eq!(cal.add_months("2024-01-15", 3).unwrap(), "2024.04.15");
        assert_eq!(cal.add_months("2024-01-15", -2).unwrap(), "2023.11.15");
        assert_eq!(cal.add_months("2023-10-15", 5).unwrap(), "2024.03.15");
        assert_eq!(cal.add_months("2024-01-31", 1).unwrap(), "2024.02.29");
    }

    #[test]
    fn test_add_years() {
        let cal = jst();
        assert_eq!(cal.add_years("2024-01-15", 2).unwrap(), "2026.01.15");
        assert_eq!(cal.add_years("2024-01-15", -3).unwrap(), "2021.01.15");
        assert_eq!(cal.add_years("2024-02-29", 1).unwrap(), "2025.02.28");
    }

    #[test]
    fn test_diff_in_days() {
        let cal = jst();
        assert_eq!(cal.diff_in_days("2024-01-20", "2024-01-15").unwrap(), 5);
        assert_eq!(cal.diff_in_days("2024-01-15", "2024-01-20").unwrap(), -5);
        assert_eq!(cal.diff_in_days("2024-01-15", "2024-01-15").unwrap(), 0);
        assert_eq!(
            cal.diff_in_days(instant("2024-01-20T00:00:00Z"), instant("2024-01-15T00:00:00Z"))
                .unwrap(),
            5
        );
        // Partial days truncate.
        assert_eq!(
            cal.diff_in_days("2024-01-16T23:00:00", "2024-01-15T00:00:00").unwrap(),
            1
        );
    }

    #[test]
    fn test_diff_in_years() {
        let cal = jst();
        assert_eq!(cal.diff_in_years("2024-01-15", "2020-01-15").unwrap(), 4);
        assert_eq!(cal.diff_in_years("2020-01-15", "2024-01-15").unwrap(), 4);
        assert_eq!(cal.diff_in_years("2024-01-15", "2024-12-31").unwrap(), 0);
    }

    #[test]
    fn test_is_valid_date() {
        let cal = jst();
        assert!(cal.is_valid_date("2024-01-15"));
        assert!(cal.is_valid_date(instant("2024-01-15T00:00:00Z")));
        assert!(!cal.is_valid_date("invalid-date"));
        assert!(!cal.is_valid_date("not-a-date-at-all"));
        assert!(!cal.is_valid_date("2024-02-30"));
        assert!(!cal.is_valid_date(""));
    }

    #[test]
    fn test_invalid_input_reports_date_error() {
        let err = jst().add_days("yesterday", 1).unwrap_err();
        assert!(matches!(err, CoreError::Date { .. }));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_convert_to_local_time() {
        let cal = jst();
        assert_eq!(cal.convert_to_local_time("2024-01-15T10:30:00Z").unwrap(), "2024.01.15");
        assert_eq!(
            cal.convert_to_local_time(instant("2024-01-15T10:30:00Z")).unwrap(),
            "2024.01.15"
        );
    }

    #[test]
    fn test_current_date_styles() {
        let cal = jst();
        let now = instant("2024-01-15T01:30:00Z");
        assert_eq!(cal.current_date_at(now, CurrentDateStyle::Formatted), "2024.01.15");
        assert_eq!(cal.current_date_at(now, CurrentDateStyle::YearOnly), "2024");
        assert!(
            cal.current_date_at(now, CurrentDateStyle::Unformatted)
                .starts_with("2024-01-15T10:30:00")
        );
    }

    #[test]
    fn test_past_and_future() {
        let cal = jst();
        let now = instant("2024-01-15T10:30:00Z");
        assert!(cal.is_past_date_at("2024-01-10", now).unwrap());
        assert!(!cal.is_past_date_at("2024-01-20", now).unwrap());
        assert!(!cal.is_past_date_at("2024-01-15T10:30:00Z", now).unwrap());
        assert!(cal.is_future_date_at("2024-01-20", now).unwrap());
        assert!(!cal.is_future_date_at("2024-01-10", now).unwrap());
        assert!(!cal.is_future_date_at("2024-01-15T10:30:00Z", now).unwrap());
        assert!(cal.is_past_date("2000-01-01").unwrap());
        assert!(cal.is_future_date("2999-01-01").unwrap());
    }

    #[test]
    fn test_to_iso_format() {
        let cal = jst();
        assert_eq!(
            cal.to_iso_format("2024-01-15T10:30:00Z").unwrap(),
            "2024-01-15T10:30:00.000Z"
        );
        // Naive input is read in JST.
        assert_eq!(cal.to_iso_format("2024-01-15").unwrap(), "2024-01-14T15:00:00.000Z");
    }

    #[test]
    fn test_year_boundaries() {
        let cal = jst();
        assert_eq!(cal.utc_start_of_year(2024).unwrap(), "2023-12-31T15:00:00.000Z");
        assert_eq!(cal.utc_end_of_year(2024).unwrap(), "2024-12-31T14:59:59.999Z");
        assert_eq!(
            cal.utc_just_before_start_of_year(2024).unwrap(),
            "2023-12-31T14:59:59.999Z"
        );
        assert_eq!(
            cal.utc_just_before_end_of_year(2024).unwrap(),
            "2024-12-31T14:59:59.998Z"
        );
    }

    #[test]
    fn test_year_boundaries_in_utc() {
        let cal = Calendar::new(Utc.fix(), "YYYY-MM-DD");
        assert_eq!(cal.utc_start_of_year(2024).unwrap(), "2024-01-01T00:00:00.000Z");
        assert_eq!(cal.utc_end_of_year(2024).unwrap(), "2024-12-31T23:59:59.999Z");
    }

    #[test]
    fn test_newer_and_older() {
        let cal = jst();
        assert_eq!(cal.newer_date("2024-01-15", "2024-01-20").unwrap(), "2024.01.20");
        assert_eq!(cal.newer_date("2024-01-20", "2024-01-15").unwrap(), "2024.01.20");
        assert_eq!(cal.older_date("2024-01-15", "2024-01-20").unwrap(), "2024.01.15");
        assert_eq!(cal.older_date("2024-01-20", "2024-01-15").unwrap(), "2024.01.15");
        assert_eq!(cal.newer_date("2024-01-15", "2024-01-15").unwrap(), "2024.01.15");
    }

    #[test]
    fn test_middle_date() {
        let cal = jst();
        assert_eq!(cal.middle_date("2024-01-01", "2024-01-11").unwrap(), "2024.01.06");
        assert_eq!(cal.middle_date("2024-01-11", "2024-01-01").unwrap(), "2024.01.06");
    }

    #[test]
    fn test_adjusted_date() {
        let cal = jst();
        assert_eq!(
            cal.adjusted_date("2024-01-15", "2024-01-10", Adjustment::Add).unwrap(),
            "2024.01.20"
        );
        assert_eq!(
            cal.adjusted_date("2024-01-15", "2024-01-20", Adjustment::Subtract)
                .unwrap(),
            "2024.01.10"
        );
    }

    #[test]
    fn test_adjusted_date_out_of_range() {
        let cal = Calendar::from_config(&CalendarConfig {
            utc_offset: "Z".to_string(),
            default_format: "YYYY-MM-DD".to_string(),
        })
        .unwrap();
        let near_max = DateTime::<Utc>::MAX_UTC - TimeDelta::days(10);
        let near_min = DateTime::<Utc>::MIN_UTC + TimeDelta::days(10);

        let err = cal
            .adjusted_date(DateTime::<Utc>::MAX_UTC, near_min, Adjustment::Add)
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(
            cal.adjusted_date(DateTime::<Utc>::MIN_UTC, near_max, Adjustment::Subtract)
                .is_err()
        );
        assert!(
            cal.adjusted_date(near_max, DateTime::<Utc>::MAX_UTC, Adjustment::Subtract)
                .is_ok()
        );
        assert!(cal.middle_date(near_min, near_max).is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = CalendarConfig {
            utc_offset: "+00:00".to_string(),
            default_format: "DD/MM/YYYY".to_string(),
        };
        let cal = Calendar::from_config(&config).unwrap();
        assert_eq!(cal.offset().local_minus_utc(), 0);
        assert_eq!(cal.format_default("2024-01-15T23:30:00Z").unwrap(), "15/01/2024");
    }
}
