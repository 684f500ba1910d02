//! Event assembly: program block lines → ordered, deduplicated events.

use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::date::{has_numeric_date, parse_date};
use crate::error::{Error, Result};
use crate::normalize::builtin;

/// Event names are kept only when longer than this many characters.
pub const MIN_NAME_LEN: usize = 5;

/// A dated entry of the academic calendar.
///
/// Serializes as `{"event_name": "...", "event_date": "YYYY-MM-DD"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Event description
    pub event_name: String,
    /// Civil date of the event
    pub event_date: NaiveDate,
}

impl CalendarEvent {
    /// Create an event.
    pub fn new(event_name: impl Into<String>, event_date: NaiveDate) -> Self {
        Self {
            event_name: event_name.into(),
            event_date,
        }
    }
}

/// Options for assembling events.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Column separator as produced by layout reconstruction
    pub column_separator: String,

    /// Year used when a date cell lacks one
    pub year_hint: i32,

    /// Events whose name matches any of these are dropped
    pub exclude_names: Vec<Regex>,
}

impl AssembleOptions {
    /// Options with the given year hint and default filters.
    pub fn new(year_hint: i32) -> Self {
        Self {
            column_separator: " | ".to_string(),
            year_hint,
            exclude_names: vec![builtin(r"(?i)university|calendar|page")],
        }
    }

    /// Set the column separator.
    pub fn with_column_separator(mut self, separator: impl Into<String>) -> Self {
        self.column_separator = separator.into();
        self
    }

    /// Add an exclusion pattern for event names.
    pub fn with_excluded_name(mut self, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)
            .map_err(|e| Error::Config(format!("invalid name filter {pattern:?}: {e}")))?;
        self.exclude_names.push(re);
        Ok(self)
    }

    /// Drop all name filters.
    pub fn without_name_filters(mut self) -> Self {
        self.exclude_names.clear();
        self
    }
}

fn row_index_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| builtin(r"^\d+\s+"))
}

/// Turn block text into events sorted by date.
///
/// Only lines whose last column holds a numeric date become events; other
/// lines are prose and are skipped. The first occurrence of each
/// `(date, name)` pair wins, and events on the same date keep their
/// document order.
pub fn assemble_events(block: &str, options: &AssembleOptions) -> Vec<CalendarEvent> {
    let mut seen = HashSet::new();
    let mut events = Vec::new();

    for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(event) = parse_line(line, options) else {
            continue;
        };
        if options.exclude_names.iter().any(|re| re.is_match(&event.event_name)) {
            log::debug!("Filtered event name {:?}", event.event_name);
            continue;
        }
        if seen.insert((event.event_date, event.event_name.clone())) {
            events.push(event);
        }
    }

    events.sort_by_key(|e| e.event_date);
    events
}

/// Parse one table row of the form `[index |] name [| ...] | D-M-YYYY`.
pub fn parse_line(line: &str, options: &AssembleOptions) -> Option<CalendarEvent> {
    let separator = match options.column_separator.trim() {
        "" => options.column_separator.as_str(),
        trimmed => trimmed,
    };
    let parts: Vec<&str> = line.split(separator).map(str::trim).collect();
    if parts.len() < 2 {
        return None;
    }

    let (date_cell, name_cells) = parts.split_last()?;
    if !has_numeric_date(date_cell) {
        return None;
    }
    let event_date = parse_date(date_cell, options.year_hint)?;

    let joined = name_cells
        .iter()
        .filter(|c| !c.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let event_name = row_index_regex().replace(&joined, "").trim().to_string();

    if event_name.chars().count() <= MIN_NAME_LEN {
        return None;
    }

    Some(CalendarEvent {
        event_name,
        event_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn options() -> AssembleOptions {
        AssembleOptions::new(2025)
    }

    #[test]
    fn test_parse_line_strips_row_index() {
        let event = parse_line("1 | Commencement of classes | 01-08-2025", &options()).unwrap();
        assert_eq!(event, CalendarEvent::new("Commencement of classes", ymd(2025, 8, 1)));
    }

    #[test]
    fn test_parse_line_joins_middle_columns() {
        let event =
            parse_line("12 | Supplementary | Exam Registration | 15-09-2025", &options()).unwrap();
        assert_eq!(event.event_name, "Supplementary Exam Registration");
    }

    #[test]
    fn test_parse_line_rejections() {
        // no separator
        assert!(parse_line("Commencement of classes 01-08-2025", &options()).is_none());
        // date not in last column
        assert!(parse_line("01-08-2025 | Commencement of classes", &options()).is_none());
        // month-name cell is not a table date
        assert!(parse_line("Commencement of classes | Aug 1", &options()).is_none());
        // name too short after stripping the index
        assert!(parse_line("4 | Onam | 05-09-2025", &options()).is_none());
        // invalid date
        assert!(parse_line("Mid semester break | 31-09-2025", &options()).is_none());
    }

    #[test]
    fn test_deduplicates_on_date_and_name() {
        let block = "3 | Exam Registration | 01-07-2025\n\
                     3 | Exam Registration | 01-07-2025\n\
                     4 | Exam Registration | 02-07-2025";
        let events = assemble_events(block, &options());
        assert_eq!(
            events,
            vec![
                CalendarEvent::new("Exam Registration", ymd(2025, 7, 1)),
                CalendarEvent::new("Exam Registration", ymd(2025, 7, 2)),
            ]
        );
    }

    #[test]
    fn test_sorted_by_date_stable_within_day() {
        let block = "Last instructional day | 14-11-2025\n\
                     Commencement of classes | 01-08-2025\n\
                     Zeta orientation | 01-08-2025\n\
                     Alpha orientation | 01-08-2025";
        let names: Vec<_> = assemble_events(block, &options())
            .into_iter()
            .map(|e| e.event_name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Commencement of classes",
                "Zeta orientation",
                "Alpha orientation",
                "Last instructional day"
            ]
        );
    }

    #[test]
    fn test_name_filters() {
        let block = "University Day celebration | 01-09-2025\nClass committee | 02-09-2025";
        let events = assemble_events(block, &options());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_name, "Class committee");

        let events = assemble_events(block, &options().without_name_filters());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_empty_block() {
        assert!(assemble_events("", &options()).is_empty());
        assert!(assemble_events("prose only\nno dates here", &options()).is_empty());
    }

    #[test]
    fn test_serializes_iso_date() {
        let event = CalendarEvent::new("First Series Test", ymd(2025, 8, 23));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event_name":"First Series Test","event_date":"2025-08-23"}"#);
    }
}
