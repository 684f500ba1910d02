//! The extraction pipeline.
//!
//! ```text
//! buffer → fragments → rows/columns → normalized text → program block → events
//!          (await)     layout          normalize         locate          events + date
//! ```
//!
//! Only fragment collection can fail or suspend; every later stage is a
//! total, synchronous function of its input.

use std::path::PathBuf;

use crate::date::DateOptions;
use crate::error::Result;
use crate::events::{assemble_events, AssembleOptions, CalendarEvent};
use crate::export;
use crate::layout::{reconstruct, LayoutOptions, ReconstructedText};
use crate::locate::{BlockLocator, LocatorOptions, ProgramBlock};
use crate::normalize::{NormalizeOptions, Normalizer};
use crate::parser::{collect_fragments, collect_fragments_blocking, PageRows, ParseOptions};
use crate::profile::AcademicProfile;

/// Options for every pipeline stage.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Fragment collection
    pub parse: ParseOptions,
    /// Row and column reconstruction
    pub layout: LayoutOptions,
    /// Boilerplate removal
    pub normalize: NormalizeOptions,
    /// Program block selection
    pub locator: LocatorOptions,
    /// Date parsing
    pub date: DateOptions,
    /// Directory for the CSV inspection export; `None` disables it
    pub csv_dir: Option<PathBuf>,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parse options.
    pub fn with_parse(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set normalize options.
    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set locator options.
    pub fn with_locator(mut self, locator: LocatorOptions) -> Self {
        self.locator = locator;
        self
    }

    /// Set date options.
    pub fn with_date(mut self, date: DateOptions) -> Self {
        self.date = date;
        self
    }

    /// Enable the CSV inspection export.
    pub fn with_csv_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.csv_dir = Some(dir.into());
        self
    }
}

/// Intermediate results of one run, for inspection.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Text after boilerplate removal
    pub normalized: String,
    /// Block selected for the profile
    pub block: ProgramBlock,
    /// Final events
    pub events: Vec<CalendarEvent>,
}

/// Configured extraction pipeline.
///
/// A pipeline holds only immutable configuration; one instance can serve
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct Pipeline {
    parse: ParseOptions,
    layout: LayoutOptions,
    normalizer: Normalizer,
    locator: BlockLocator,
    assemble: AssembleOptions,
    csv_dir: Option<PathBuf>,
}

impl Pipeline {
    /// Build a pipeline from options.
    pub fn new(options: PipelineOptions) -> Self {
        let PipelineOptions {
            parse,
            layout,
            normalize,
            locator,
            date,
            csv_dir,
        } = options;

        // Block boundaries must survive boilerplate removal.
        let normalize = normalize.protect(locator.header_marker.clone());
        let assemble = AssembleOptions::new(date.resolved_year())
            .with_column_separator(layout.column_separator.clone());

        Self {
            parse,
            layout,
            normalizer: Normalizer::new(normalize),
            locator: BlockLocator::new(locator),
            assemble,
            csv_dir,
        }
    }

    /// Extract events from a document buffer.
    pub async fn extract(
        &self,
        data: Vec<u8>,
        profile: &AcademicProfile,
    ) -> Result<Vec<CalendarEvent>> {
        let rows = collect_fragments(data, self.parse.clone()).await?;
        Ok(self.finish(&rows, profile))
    }

    /// Blocking form of [`Pipeline::extract`].
    pub fn extract_blocking(
        &self,
        data: &[u8],
        profile: &AcademicProfile,
    ) -> Result<Vec<CalendarEvent>> {
        let rows = collect_fragments_blocking(data, &self.parse)?;
        Ok(self.finish(&rows, profile))
    }

    /// Rebuild the text of collected fragments.
    pub fn reconstruct(&self, rows: &PageRows) -> ReconstructedText {
        reconstruct(rows, &self.layout)
    }

    /// Run every stage after collection, keeping intermediate results.
    pub fn analyze_text(&self, text: &str, profile: &AcademicProfile) -> Extraction {
        let normalized = self.normalizer.normalize(text);
        let block = self.locator.locate(&normalized, profile);
        let events = assemble_events(&block.text, &self.assemble);
        log::info!("Extracted {} probable events", events.len());

        Extraction {
            normalized,
            block,
            events,
        }
    }

    /// Events for already reconstructed text.
    pub fn process_text(&self, text: &str, profile: &AcademicProfile) -> Vec<CalendarEvent> {
        self.analyze_text(text, profile).events
    }

    /// Events for collected fragments.
    pub fn process_rows(&self, rows: &PageRows, profile: &AcademicProfile) -> Vec<CalendarEvent> {
        let text = self.reconstruct(rows);
        log::debug!("Reconstructed {} lines", text.line_count());
        self.process_text(&text.to_string(), profile)
    }

    /// The block locator in use.
    pub fn locator(&self) -> &BlockLocator {
        &self.locator
    }

    /// The normalizer in use.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    fn finish(&self, rows: &PageRows, profile: &AcademicProfile) -> Vec<CalendarEvent> {
        let events = self.process_rows(rows, profile);

        if let Some(dir) = &self.csv_dir {
            if let Err(e) = export::save_csv(&events, dir) {
                log::warn!("CSV export failed: {}", e);
            }
        }

        events
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}
