//! Program block location.
//!
//! Multi-program calendars repeat the institution letterhead at the top of
//! every program's table. The letterhead splits the text into segments;
//! the first segment mentioning the profile's program (or its umbrella
//! alias) and semester is selected.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{Error, Result};
use crate::normalize::builtin;
use crate::profile::AcademicProfile;

/// Institution letterhead that opens each program block.
pub const DEFAULT_HEADER_MARKER: &str = r"(?i)APJ\s+ABDUL\s+KALAM\s+TECHNOLOGICAL\s+UNIVERSITY";

/// Branch names that calendars only list under their degree.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("cse", "b tech"),
    ("computer science", "b tech"),
    ("computer science and engineering", "b tech"),
    ("ece", "b tech"),
    ("eee", "b tech"),
    ("mechanical", "b tech"),
    ("civil", "b tech"),
];

/// Mapping from department or branch names to their umbrella program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace an alias. Both sides are match-normalized.
    pub fn insert(&mut self, name: &str, program: &str) {
        self.entries
            .insert(normalize_for_match(name), normalize_for_match(program));
    }

    /// Builder form of [`AliasTable::insert`].
    pub fn with_alias(mut self, name: &str, program: &str) -> Self {
        self.insert(name, program);
        self
    }

    /// Parse a `name=program` entry, as given on the command line.
    pub fn insert_entry(&mut self, entry: &str) -> Result<()> {
        let (name, program) = entry
            .split_once('=')
            .filter(|(n, p)| !n.trim().is_empty() && !p.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("alias must be NAME=PROGRAM, got {entry:?}")))?;
        self.insert(name, program);
        Ok(())
    }

    /// Umbrella program for an already normalized name.
    pub fn resolve(&self, normalized_name: &str) -> Option<&str> {
        self.entries.get(normalized_name).map(String::as_str)
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no aliases.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        DEFAULT_ALIASES
            .iter()
            .fold(Self::empty(), |table, (name, program)| {
                table.with_alias(name, program)
            })
    }
}

/// What to return when no segment matches the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Use the whole normalized text
    #[default]
    FullText,
    /// Return an empty block
    Strict,
}

/// Options for locating the program block.
#[derive(Debug, Clone)]
pub struct LocatorOptions {
    /// Pattern opening each block
    pub header_marker: Regex,

    /// Branch → umbrella program aliases
    pub aliases: AliasTable,

    /// Behavior when nothing matches
    pub fallback: FallbackPolicy,
}

impl LocatorOptions {
    /// Create new locator options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header marker pattern.
    pub fn with_header_marker(mut self, pattern: &str) -> Result<Self> {
        self.header_marker = Regex::new(pattern)
            .map_err(|e| Error::Config(format!("invalid header marker {pattern:?}: {e}")))?;
        Ok(self)
    }

    /// Replace the alias table.
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// Set the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Shorthand for [`FallbackPolicy::Strict`].
    pub fn strict(self) -> Self {
        self.with_fallback(FallbackPolicy::Strict)
    }
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            header_marker: builtin(DEFAULT_HEADER_MARKER),
            aliases: AliasTable::default(),
            fallback: FallbackPolicy::FullText,
        }
    }
}

/// Where a [`ProgramBlock`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOrigin {
    /// The n-th header-delimited segment (0-based)
    Segment(usize),
    /// Nothing matched; the whole text is used
    FullText,
    /// Nothing matched under the strict policy
    Unmatched,
}

/// The part of a calendar relevant to one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramBlock {
    /// Block text, verbatim from the normalized document
    pub text: String,
    /// How the block was selected
    pub origin: BlockOrigin,
}

impl ProgramBlock {
    /// Whether the block came from a matching segment.
    pub fn is_match(&self) -> bool {
        matches!(self.origin, BlockOrigin::Segment(_))
    }
}

/// Splits normalized text into program blocks and picks the relevant one.
#[derive(Debug, Clone, Default)]
pub struct BlockLocator {
    options: LocatorOptions,
}

impl BlockLocator {
    /// Create a locator with the given options.
    pub fn new(options: LocatorOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Split `text` at each header marker.
    ///
    /// Each segment runs from a marker up to the next marker or the end of
    /// the text; anything before the first marker belongs to no segment.
    /// Without any marker the whole text is the only segment.
    pub fn segments<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let starts: Vec<usize> = self
            .options
            .header_marker
            .find_iter(text)
            .map(|m| m.start())
            .collect();

        if starts.is_empty() {
            return vec![text];
        }

        starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(text.len());
                &text[start..end]
            })
            .collect()
    }

    /// Candidate substrings identifying the profile's program.
    pub fn program_tokens(&self, profile: &AcademicProfile) -> Vec<String> {
        let name = normalize_for_match(&profile.program);
        let mut tokens: Vec<String> = name.split_whitespace().map(str::to_string).collect();

        if let Some(program) = self.options.aliases.resolve(&name) {
            tokens.push(program.to_string());
            tokens.push(program.replace(' ', ""));
        }

        let mut seen = std::collections::HashSet::new();
        tokens.retain(|t| seen.insert(t.clone()));
        tokens
    }

    /// Select the block for `profile`.
    pub fn locate(&self, text: &str, profile: &AcademicProfile) -> ProgramBlock {
        let tokens = self.program_tokens(profile);
        let semester = profile.semester_number().map(semester_pattern);
        let segments = self.segments(text);

        log::debug!(
            "{} segment(s); tokens {:?}, semester {:?}, scheme {:?}",
            segments.len(),
            tokens,
            profile.semester_token(),
            profile.scheme
        );

        for (index, segment) in segments.iter().enumerate() {
            let normalized = normalize_for_match(segment);
            let program_match = tokens.iter().any(|t| normalized.contains(t.as_str()));
            let semester_match = semester.as_ref().map_or(true, |re| re.is_match(&normalized));

            if program_match && semester_match {
                log::debug!("Matched segment {}", index);
                return ProgramBlock {
                    text: segment.to_string(),
                    origin: BlockOrigin::Segment(index),
                };
            }
        }

        match self.options.fallback {
            FallbackPolicy::FullText => {
                log::warn!(
                    "No block for {:?} {:?}; falling back to full text",
                    profile.program,
                    profile.semester_token()
                );
                ProgramBlock {
                    text: text.to_string(),
                    origin: BlockOrigin::FullText,
                }
            }
            FallbackPolicy::Strict => {
                log::warn!(
                    "No block for {:?} {:?}",
                    profile.program,
                    profile.semester_token()
                );
                ProgramBlock {
                    text: String::new(),
                    origin: BlockOrigin::Unmatched,
                }
            }
        }
    }
}

/// Lowercase, drop dots, turn other punctuation into spaces and collapse
/// whitespace: "B. Tech (CSE)" → "b tech cse", "B.Tech" → "btech".
pub fn normalize_for_match(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| c != '.')
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `s<n>` ending at a word boundary in match-normalized text. The
/// semester may be glued to the program ("btechs5").
fn semester_pattern(semester: u32) -> Regex {
    builtin(&format!(r"s\s*{semester}\b"))
}
