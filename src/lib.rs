//! # uncal
//!
//! Academic calendar event extraction for Rust.
//!
//! This library reads a calendar PDF whose text is stored as positioned,
//! unordered glyph runs, rebuilds its rows and columns, picks the block
//! that belongs to one program and semester, and returns the dated events
//! of that block in chronological order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use uncal::{extract_events_blocking, AcademicProfile};
//!
//! fn main() -> uncal::Result<()> {
//!     let data = std::fs::read("calendar.pdf")?;
//!     let profile = AcademicProfile::new("cse").with_semester(5);
//!
//!     for event in extract_events_blocking(&data, &profile)? {
//!         println!("{} {}", event.event_date, event.event_name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout reconstruction**: rows from quantized baselines, columns from horizontal gaps
//! - **Multi-program documents**: blocks split at the institution letterhead
//! - **Date notations**: `D-M-YYYY` and month-name forms
//! - **Async entry point**: parsing runs on Rayon, awaited once
//! - **Exports**: JSON output and a CSV inspection file

pub mod date;
pub mod detect;
pub mod error;
pub mod events;
pub mod export;
pub mod layout;
pub mod locate;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod profile;

// Re-export commonly used types
pub use date::{parse_date, DateOptions};
pub use detect::{is_pdf_bytes, sniff, PdfHeader};
pub use error::{Error, Result};
pub use events::{assemble_events, AssembleOptions, CalendarEvent};
pub use export::{save_csv, to_json, write_csv, JsonFormat};
pub use layout::{reconstruct, LayoutOptions, ReconstructedText};
pub use locate::{AliasTable, BlockLocator, BlockOrigin, FallbackPolicy, LocatorOptions, ProgramBlock};
pub use normalize::{NormalizeOptions, Normalizer};
pub use parser::{ErrorMode, PageRows, PageSelection, ParseOptions, TextFragment};
pub use pipeline::{Extraction, Pipeline, PipelineOptions};
pub use profile::AcademicProfile;

use std::path::{Path, PathBuf};

/// Extract the events of `profile` from a calendar PDF.
///
/// # Example
///
/// ```no_run
/// use uncal::{extract_events, AcademicProfile};
///
/// # async fn run() -> uncal::Result<()> {
/// let data = std::fs::read("calendar.pdf")?;
/// let events = extract_events(data, &AcademicProfile::new("mca")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn extract_events(data: Vec<u8>, profile: &AcademicProfile) -> Result<Vec<CalendarEvent>> {
    Pipeline::default().extract(data, profile).await
}

/// Blocking form of [`extract_events`].
pub fn extract_events_blocking(data: &[u8], profile: &AcademicProfile) -> Result<Vec<CalendarEvent>> {
    Pipeline::default().extract_blocking(data, profile)
}

/// Extract events from a calendar PDF on disk.
///
/// # Example
///
/// ```no_run
/// use uncal::{extract_file, AcademicProfile};
///
/// let profile = AcademicProfile::new("b.tech").with_semester(3);
/// let events = extract_file("calendar.pdf", &profile).unwrap();
/// println!("{} events", events.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P, profile: &AcademicProfile) -> Result<Vec<CalendarEvent>> {
    let data = std::fs::read(path)?;
    extract_events_blocking(&data, profile)
}

/// Render the reconstructed text of a calendar PDF.
pub fn extract_text(data: &[u8]) -> Result<String> {
    let rows = parser::collect_fragments_blocking(data, &ParseOptions::default())?;
    Ok(reconstruct(&rows, &LayoutOptions::default()).to_string())
}

/// Builder for configuring an extraction run.
///
/// # Example
///
/// ```no_run
/// use uncal::{AcademicProfile, Uncal};
///
/// let events = Uncal::new()
///     .lenient()
///     .with_year(2025)
///     .with_alias("it", "b tech")
///     .with_csv_dir("./exports")
///     .extract_file("calendar.pdf", &AcademicProfile::new("it").with_semester(5))?;
/// # Ok::<(), uncal::Error>(())
/// ```
pub struct Uncal {
    options: PipelineOptions,
}

impl Uncal {
    /// Create a new Uncal builder.
    pub fn new() -> Self {
        Self {
            options: PipelineOptions::default(),
        }
    }

    /// Skip pages whose content cannot be decoded.
    pub fn lenient(mut self) -> Self {
        self.options.parse = self.options.parse.lenient();
        self
    }

    /// Return no events when no block matches the profile.
    pub fn strict(mut self) -> Self {
        self.options.locator = self.options.locator.strict();
        self
    }

    /// Set the year for dates written without one.
    pub fn with_year(mut self, year: i32) -> Self {
        self.options.date = self.options.date.with_year_hint(year);
        self
    }

    /// Map a program name to the umbrella program printed in block headers.
    pub fn with_alias(mut self, name: &str, program: &str) -> Self {
        self.options.locator.aliases.insert(name, program);
        self
    }

    /// Set the horizontal gap that separates columns.
    pub fn with_gap_threshold(mut self, threshold: f32) -> Self {
        self.options.layout = self.options.layout.with_gap_threshold(threshold);
        self
    }

    /// Set the baseline distance within which fragments share a row.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.options.parse = self.options.parse.with_row_tolerance(tolerance);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options.parse = self.options.parse.with_pages(pages);
        self
    }

    /// Write a CSV of every non-empty result into `dir`.
    pub fn with_csv_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_csv_dir(dir);
        self
    }

    /// Set the header marker that opens each program block.
    pub fn with_header_marker(mut self, pattern: &str) -> Result<Self> {
        self.options.locator = self.options.locator.with_header_marker(pattern)?;
        Ok(self)
    }

    /// Finish configuration.
    pub fn build(self) -> Pipeline {
        Pipeline::new(self.options)
    }

    /// Extract events from a buffer.
    pub async fn extract(self, data: Vec<u8>, profile: &AcademicProfile) -> Result<Vec<CalendarEvent>> {
        self.build().extract(data, profile).await
    }

    /// Extract events from a buffer without an async runtime.
    pub fn extract_bytes(self, data: &[u8], profile: &AcademicProfile) -> Result<Vec<CalendarEvent>> {
        self.build().extract_blocking(data, profile)
    }

    /// Extract events from a file.
    pub fn extract_file<P: AsRef<Path>>(
        self,
        path: P,
        profile: &AcademicProfile,
    ) -> Result<Vec<CalendarEvent>> {
        let data = std::fs::read(path)?;
        self.extract_bytes(&data, profile)
    }
}

impl Default for Uncal {
    fn default() -> Self {
        Self::new()
    }
}
