//! Boilerplate removal and whitespace cleanup.
//!
//! Letterheads, footers and table headers repeat once per physical page.
//! Left in place they inject noise into event assembly, so they are
//! dropped line by line. Lines carrying the block header marker are
//! protected: the block locator needs every occurrence.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::locate::DEFAULT_HEADER_MARKER;

/// Lines recurring on every page of the source calendars.
const DEFAULT_BOILERPLATE: &[&str] = &[
    r"(?i)^Academic Calendar",
    r"(?i)^Odd Semester",
    r"(?i)^Even Semester",
    r"(?i)Page \d+ of \d+",
    r"(?i)^Thiruvananthapuram",
    r"(?i)^U\.O\.No",
    r"(?i)^Dean \(Academic\)",
    r"(?i)^Section Officer",
    r"(?i)^Important Dates",
    r"(?i)^SL\.No",
    r"(?i)^\* This is a computer system",
];

/// Options for normalizing reconstructed text.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Lines matching any of these are discarded
    pub boilerplate: Vec<Regex>,

    /// Lines matching any of these are always kept
    pub protected: Vec<Regex>,

    /// Apply Unicode NFC normalization first
    pub normalize_unicode: bool,
}

impl NormalizeOptions {
    /// Create options with the built-in boilerplate list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that only collapse whitespace.
    pub fn empty() -> Self {
        Self {
            boilerplate: Vec::new(),
            protected: Vec::new(),
            normalize_unicode: true,
        }
    }

    /// Add a boilerplate pattern.
    pub fn with_boilerplate(mut self, pattern: &str) -> Result<Self> {
        self.boilerplate.push(compile(pattern)?);
        Ok(self)
    }

    /// Add a protected pattern.
    pub fn with_protected(mut self, pattern: &str) -> Result<Self> {
        self.protected.push(compile(pattern)?);
        Ok(self)
    }

    /// Protect an already compiled pattern.
    pub fn protect(mut self, pattern: Regex) -> Self {
        if !self.protected.iter().any(|p| p.as_str() == pattern.as_str()) {
            self.protected.push(pattern);
        }
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            boilerplate: DEFAULT_BOILERPLATE.iter().map(|p| builtin(p)).collect(),
            protected: vec![builtin(DEFAULT_HEADER_MARKER)],
            normalize_unicode: true,
        }
    }
}

/// Line-oriented text normalizer.
#[derive(Debug, Clone)]
pub struct Normalizer {
    options: NormalizeOptions,
    spaces: Regex,
}

impl Normalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            spaces: builtin(r"[^\S\n]{2,}"),
        }
    }

    /// Collapse whitespace, trim lines and drop blank or boilerplate lines.
    pub fn normalize(&self, text: &str) -> String {
        let text: String = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        let collapsed = self.spaces.replace_all(&text, " ");

        collapsed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && self.keep(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn keep(&self, line: &str) -> bool {
        self.options.protected.iter().any(|p| p.is_match(line))
            || !self.options.boilerplate.iter().any(|p| p.is_match(line))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

/// Normalize `text` with `options`.
pub fn normalize(text: &str, options: &NormalizeOptions) -> String {
    Normalizer::new(options.clone()).normalize(text)
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("invalid pattern {pattern:?}: {e}")))
}

/// Compile a pattern that ships with the crate.
pub(crate) fn builtin(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}
