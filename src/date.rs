//! Date parsing for calendar cells.
//!
//! Two notations occur in the source calendars: numeric day-month-year
//! (`01-07-2025`) in summary tables, and a month name followed by a day
//! (`Aug 23`) in prose, where the year is left implicit. Numeric dates are
//! always read day first; a month-day-year document cannot be told apart
//! from the string alone.

use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::normalize::builtin;

/// Month in which an academic year starts.
const ACADEMIC_YEAR_START_MONTH: u32 = 6;

/// Options for date parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateOptions {
    /// Year used for month-name dates; `None` means the current academic year
    pub year_hint: Option<i32>,
}

impl DateOptions {
    /// Create new date options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the year hint.
    pub fn with_year_hint(mut self, year: i32) -> Self {
        self.year_hint = Some(year);
        self
    }

    /// The year hint in effect.
    pub fn resolved_year(&self) -> i32 {
        self.year_hint
            .unwrap_or_else(|| academic_year_start(Local::now().date_naive()))
    }
}

/// Calendar year in which the academic year containing `today` began.
pub fn academic_year_start(today: NaiveDate) -> i32 {
    if today.month() >= ACADEMIC_YEAR_START_MONTH {
        today.year()
    } else {
        today.year() - 1
    }
}

fn numeric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| builtin(r"\b(\d{1,2})-(\d{1,2})-(\d{4})\b"))
}

fn month_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        builtin(
            r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b[\s\-.,]*(\d{1,2})(?:st|nd|rd|th)?\b",
        )
    })
}

/// Whether `text` contains a numeric day-month-year date.
pub fn has_numeric_date(text: &str) -> bool {
    numeric_regex().is_match(text)
}

/// Parse the first numeric `D-M-YYYY` date in `text`.
pub fn parse_numeric(text: &str) -> Option<NaiveDate> {
    let caps = numeric_regex().captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse the first month-name date in `text`, in `year`.
pub fn parse_month_name(text: &str, year: i32) -> Option<NaiveDate> {
    let caps = month_name_regex().captures(text)?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a date from a text snippet.
///
/// The numeric form is tried first; the month-name form uses `year_hint`.
/// Impossible dates (`31-02-2025`) never roll over into the next month.
pub fn parse_date(text: &str, year_hint: i32) -> Option<NaiveDate> {
    parse_numeric(text).or_else(|| parse_month_name(text, year_hint))
}

/// Month number from a name or abbreviation.
fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
