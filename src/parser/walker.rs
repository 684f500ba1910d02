//! Content stream walker.
//!
//! Interprets the text-showing operators of each page and reports every
//! decoded glyph run as a [`ParseEvent::Fragment`]. Positions are mapped
//! through the text and graphics matrices into page space and flipped so
//! that `y` is measured from the top edge.

use super::backend::{get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue};
use super::fragments::{ParseEvent, TextFragment};
use super::options::{ErrorMode, ParseOptions};
use crate::error::{Error, Result};

/// TJ adjustments (thousandths of text space) wider than this read as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Walk every selected page of `backend`, emitting notifications to `emit`.
///
/// On success the final notification is [`ParseEvent::Finished`]. In strict
/// mode the first page that fails to decode aborts the walk with its error.
pub fn walk_document<B, F>(backend: &B, options: &ParseOptions, mut emit: F) -> Result<()>
where
    B: PdfBackend + ?Sized,
    F: FnMut(ParseEvent),
{
    let pages = backend.pages();
    let page_count = pages.len() as u32;
    if let Some(first) = options.pages.first() {
        if first == 0 || first > page_count {
            return Err(Error::PageOutOfRange(first, page_count));
        }
    }

    for (page_num, page_id) in pages {
        if !options.pages.includes(page_num) {
            continue;
        }
        emit(ParseEvent::PageStart(page_num));

        let ops = match backend
            .page_content(page_id)
            .and_then(|data| backend.decode_content(&data))
        {
            Ok(ops) => ops,
            Err(e) if options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping page {}: {}", page_num, e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let mut count = 0usize;
        let page = PageWalker {
            backend,
            options,
            page_num,
            page_id,
            top: backend.page_top(page_id),
        };
        page.run(&ops, |fragment| {
            count += 1;
            emit(ParseEvent::Fragment(fragment));
        });
        log::debug!("Page {}: {} fragments", page_num, count);
    }

    emit(ParseEvent::Finished);
    Ok(())
}

/// Affine transform `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_op(op: &ContentOp) -> Option<Self> {
        Some(Self {
            a: op.number(0)?,
            b: op.number(1)?,
            c: op.number(2)?,
            d: op.number(3)?,
            e: op.number(4)?,
            f: op.number(5)?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

/// Text state for one page.
#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    matrix: Matrix,
    line_matrix: Matrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }
}

struct PageWalker<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    options: &'a ParseOptions,
    page_num: u32,
    page_id: PageId,
    top: f32,
}

impl<B: PdfBackend + ?Sized> PageWalker<'_, B> {
    fn run(&self, ops: &[ContentOp], mut emit: impl FnMut(TextFragment)) {
        let mut ctm = Matrix::IDENTITY;
        let mut saved: Vec<Matrix> = Vec::new();
        let mut text = TextState::default();
        let mut in_text = false;

        for op in ops {
            match op.operator.as_str() {
                "q" => saved.push(ctm),
                "Q" => ctm = saved.pop().unwrap_or(Matrix::IDENTITY),
                "cm" => {
                    if let Some(m) = Matrix::from_op(op) {
                        ctm = m.then(&ctm);
                    }
                }
                "BT" => {
                    in_text = true;
                    text.matrix = Matrix::IDENTITY;
                    text.line_matrix = Matrix::IDENTITY;
                }
                "ET" => in_text = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        text.font = name.clone();
                    }
                    if let Some(size) = op.number(1) {
                        text.font_size = size;
                    }
                }
                "TL" => {
                    if let Some(leading) = op.number(0) {
                        text.leading = leading;
                    }
                }
                "Td" => {
                    if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                        text.move_line(tx, ty);
                    }
                }
                "TD" => {
                    if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                        text.leading = -ty;
                        text.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_op(op) {
                        text.matrix = m;
                        text.line_matrix = m;
                    }
                }
                "T*" => text.next_line(),
                "Tj" | "TJ" | "'" | "\"" if in_text => {
                    if op.operator != "Tj" && op.operator != "TJ" {
                        text.next_line();
                    }
                    let shown = self.shown_text(op, &text.font);
                    if let Some(fragment) = self.place(&shown, &mut text, &ctm) {
                        emit(fragment);
                    }
                }
                _ => {}
            }
        }
    }

    /// Decode the string operand(s) of a text-showing operator.
    fn shown_text(&self, op: &ContentOp, font: &[u8]) -> String {
        let decode = |bytes: &[u8]| self.backend.decode_text(self.page_id, font, bytes);

        match op.operator.as_str() {
            "TJ" => {
                let Some(PdfValue::Array(items)) = op.operands.first() else {
                    return String::new();
                };
                let mut combined = String::new();
                for item in items {
                    match item {
                        PdfValue::Str(bytes) => combined.push_str(&decode(bytes)),
                        PdfValue::Integer(_) | PdfValue::Real(_) => {
                            let adjustment = -get_number_from_value(item).unwrap_or(0.0);
                            if adjustment > TJ_SPACE_THRESHOLD
                                && !combined.is_empty()
                                && !combined.ends_with(char::is_whitespace)
                            {
                                combined.push(' ');
                            }
                        }
                        _ => {}
                    }
                }
                combined
            }
            "\"" => match op.operands.get(2) {
                Some(PdfValue::Str(bytes)) => decode(bytes),
                _ => String::new(),
            },
            _ => match op.operands.first() {
                Some(PdfValue::Str(bytes)) => decode(bytes),
                _ => String::new(),
            },
        }
    }

    /// Position `shown` at the current text origin and advance past it.
    fn place(&self, shown: &str, text: &mut TextState, ctm: &Matrix) -> Option<TextFragment> {
        let chars = shown.chars().count() as f32;
        let advance = chars * text.font_size * self.options.char_width_ratio;

        let device = text.matrix.then(ctm);
        let width = advance * device.horizontal_scale();
        let (x, y) = (device.e, device.f);

        text.matrix = Matrix::translation(advance, 0.0).then(&text.matrix);

        if shown.trim().is_empty() {
            return None;
        }

        Some(TextFragment {
            page: self.page_num,
            x,
            y: self.top - y,
            width,
            text: shown.to_string(),
        })
    }
}
