//! Layout reconstruction: page/row fragments → ordered text lines.
//!
//! Document text carries no reading order, so rows are rebuilt from
//! coordinates: pages ascending, rows top to bottom, fragments left to
//! right. A horizontal gap wider than [`LayoutOptions::gap_threshold`]
//! between two fragments marks a table column boundary and is rendered as
//! [`LayoutOptions::column_separator`].

use std::fmt;

use crate::parser::{PageRows, TextFragment};

/// Options for rebuilding rows and columns.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Token inserted between columns
    pub column_separator: String,

    /// Minimum gap (layout units) between fragments that starts a new column
    pub gap_threshold: f32,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column separator token.
    pub fn with_column_separator(mut self, separator: impl Into<String>) -> Self {
        self.column_separator = separator.into();
        self
    }

    /// Set the column gap threshold.
    pub fn with_gap_threshold(mut self, threshold: f32) -> Self {
        self.gap_threshold = threshold;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            column_separator: " | ".to_string(),
            gap_threshold: 40.0,
        }
    }
}

/// Text lines of one page, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-indexed page number
    pub page: u32,
    /// One line per layout row
    pub lines: Vec<String>,
}

/// Reconstructed document text: ordered pages of ordered lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconstructedText {
    pages: Vec<PageText>,
}

impl ReconstructedText {
    /// Pages in ascending order.
    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    /// All lines across pages, in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.lines.iter().map(String::as_str))
    }

    /// Number of lines, one per (page, row).
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    /// Whether no text was recovered.
    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }
}

impl fmt::Display for ReconstructedText {
    /// Rows joined by a newline, pages by a blank line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            f.write_str(&page.lines.join("\n"))?;
        }
        Ok(())
    }
}

/// Rebuild ordered text from collected fragments.
pub fn reconstruct(rows: &PageRows, options: &LayoutOptions) -> ReconstructedText {
    let pages = rows
        .iter()
        .map(|(&page, layout)| PageText {
            page,
            lines: layout
                .values()
                .map(|fragments| render_row(fragments, options))
                .collect(),
        })
        .collect();

    ReconstructedText { pages }
}

/// Render one row, splitting columns on wide horizontal gaps.
pub fn render_row(fragments: &[TextFragment], options: &LayoutOptions) -> String {
    let mut ordered: Vec<&TextFragment> = fragments.iter().collect();
    ordered.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut line = String::new();
    let mut prev: Option<&TextFragment> = None;

    for fragment in ordered {
        let text = fragment.text.trim();
        if text.is_empty() {
            continue;
        }
        if let Some(prev) = prev {
            if fragment.x - prev.right() > options.gap_threshold {
                line.push_str(&options.column_separator);
            } else {
                line.push(' ');
            }
        }
        line.push_str(text);
        prev = Some(fragment);
    }

    line
}
