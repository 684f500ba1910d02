//! Positioned text fragments and the per-request page/row accumulator.

use std::collections::BTreeMap;

/// Glyph advance assumed when a fragment is built without a measured width.
pub const DEFAULT_CHAR_WIDTH: f32 = 3.0;

/// A run of text at a position on a page.
///
/// `y` grows downwards from the top of the page, so ascending `y` is
/// reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    /// 1-indexed page number
    pub page: u32,
    /// Left edge
    pub x: f32,
    /// Distance from the top of the page
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// The text content
    pub text: String,
}

impl TextFragment {
    /// Create a fragment whose width is estimated from its character count.
    pub fn new(page: u32, x: f32, y: f32, text: impl Into<String>) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * DEFAULT_CHAR_WIDTH;
        Self {
            page,
            x,
            y,
            width,
            text,
        }
    }

    /// Override the estimated width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width.max(0.0);
        self
    }

    /// Right edge of the fragment.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Quantized vertical position shared by all fragments of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey(i64);

impl RowKey {
    /// Quantize `y` to the nearest multiple of `tolerance`.
    pub fn quantize(y: f32, tolerance: f32) -> Self {
        let step = if tolerance > 0.0 { tolerance } else { 1.0 };
        RowKey((y / step).round() as i64)
    }

    /// Raw quantized value.
    pub fn value(self) -> i64 {
        self.0
    }
}

/// Fragments of one page keyed by row.
pub type PageLayout = BTreeMap<RowKey, Vec<TextFragment>>;

/// All collected fragments: page number → row → fragments.
pub type PageRows = BTreeMap<u32, PageLayout>;

/// Notifications emitted while a document is walked.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    /// A page has started; the page exists even if it yields no text.
    PageStart(u32),
    /// A text fragment was decoded.
    Fragment(TextFragment),
    /// No more fragments will follow.
    Finished,
}

/// Accumulates [`ParseEvent`]s into a [`PageRows`] arena.
///
/// One collector belongs to one document walk; it is never shared.
#[derive(Debug)]
pub struct FragmentCollector {
    rows: PageRows,
    tolerance: f32,
    finished: bool,
}

impl FragmentCollector {
    /// Create a collector quantizing rows with `tolerance`.
    pub fn new(tolerance: f32) -> Self {
        Self {
            rows: PageRows::new(),
            tolerance,
            finished: false,
        }
    }

    /// Feed one notification.
    ///
    /// Events after [`ParseEvent::Finished`] are ignored.
    pub fn accept(&mut self, event: ParseEvent) {
        if self.finished {
            return;
        }
        match event {
            ParseEvent::PageStart(page) => {
                self.rows.entry(page).or_default();
            }
            ParseEvent::Fragment(fragment) => {
                if fragment.text.trim().is_empty() {
                    return;
                }
                let key = RowKey::quantize(fragment.y, self.tolerance);
                self.rows
                    .entry(fragment.page)
                    .or_default()
                    .entry(key)
                    .or_default()
                    .push(fragment);
            }
            ParseEvent::Finished => self.finished = true,
        }
    }

    /// Whether the terminal notification has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of distinct (page, row) keys collected so far.
    pub fn row_count(&self) -> usize {
        self.rows.values().map(|rows| rows.len()).sum()
    }

    /// Consume the collector and return the arena.
    pub fn into_rows(self) -> PageRows {
        self.rows
    }
}
