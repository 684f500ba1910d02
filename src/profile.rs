//! Academic profile of the user a calendar is extracted for.

use serde::{Deserialize, Serialize};

/// Program, semester and scheme identifying one block of a calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicProfile {
    /// Program or branch name as entered by the user (e.g. "CSE", "B.Tech")
    pub program: String,

    /// Semester number; `None` matches any semester
    #[serde(default)]
    pub semester: Option<u32>,

    /// Curriculum scheme year; informational
    #[serde(default)]
    pub scheme: Option<u32>,
}

impl AcademicProfile {
    /// Create a profile for `program` with no semester constraint.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            semester: None,
            scheme: None,
        }
    }

    /// Set the semester.
    pub fn with_semester(mut self, semester: u32) -> Self {
        self.semester = Some(semester);
        self
    }

    /// Set the scheme year.
    pub fn with_scheme(mut self, scheme: u32) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Semester constraint in effect; semester 0 means none.
    pub fn semester_number(&self) -> Option<u32> {
        self.semester.filter(|&n| n > 0)
    }

    /// Semester token as printed in calendars (`S5`).
    pub fn semester_token(&self) -> Option<String> {
        self.semester_number().map(|n| format!("S{n}"))
    }
}

/// Parse a semester given as `5`, `S5` or `s5`.
pub fn parse_semester(value: &str) -> Option<u32> {
    let value = value.trim();
    let digits = value
        .strip_prefix('S')
        .or_else(|| value.strip_prefix('s'))
        .unwrap_or(value);
    digits.trim().parse().ok().filter(|&n| n > 0)
}
