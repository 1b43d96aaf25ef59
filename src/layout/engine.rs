//! Fit-and-grow text layout.
//!
//! Wraps paragraphs into lines that fit a margin box, growing the canvas
//! until everything fits, then assigns each line a draw position.
//!
//! ```text
//! Sizing(1000) ──▶ Packing ──┬── Fits ──▶ Positioning ──▶ Done
//!      ▲                     │
//!      └──── +100px ◀── Overflow (word too wide | text too tall)
//! ```
//!
//! Every retry starts from scratch; nothing from a failed attempt is kept.
//! Growth stops at [`TextStyle::max_height`], after which the last overflow
//! is reported as an error.

use super::backend::TextMeasurer;
use super::calculations::{
    CanvasGeometry, aligned_x, contains_descender, line_height, start_cursor,
};
use super::params::{Alignment, DrawLine, TextStyle};
use thiserror::Error;

/// Canvas height of the first attempt.
pub const INITIAL_HEIGHT: u32 = 1000;
/// Height added after each failed attempt.
pub const HEIGHT_DELTA: u32 = 100;
/// Extra depth reserved under lines with descenders.
pub const DESCENDER_SPACING: u32 = 30;
/// Gap between consecutive lines.
pub const LINE_SPACING: u32 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Invalid text alignment: {0:?} (expected left, center, or right)")]
    InvalidAlignment(String),
    #[error(
        "Word {word:?} is {width}px wide but the text area is {max_width}px at the {max_height}px height cap"
    )]
    UnfittableWord {
        word: String,
        width: u32,
        max_width: i64,
        max_height: u32,
    },
    #[error("Text does not fit on a canvas up to {max_height}px tall")]
    CanvasTooSmall { max_height: u32 },
}

/// A finished layout: the canvas it fits on and every positioned line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    pub canvas: CanvasGeometry,
    /// Stacked height of all lines and spacing.
    pub text_height: i64,
    /// Lines in reading order.
    pub lines: Vec<DrawLine>,
    /// Number of lines produced for each input paragraph.
    pub line_counts: Vec<usize>,
    /// Canvas sizes tried, the successful one included.
    pub attempts: u32,
}

/// Outcome of packing every paragraph into one canvas.
enum Packing {
    Fits {
        paragraphs: Vec<Vec<String>>,
        text_height: i64,
    },
    WordTooWide {
        word: String,
        width: u32,
        max_width: i64,
    },
    TooTall,
}

/// Lay out `paragraphs` with `style`, measuring text with `measurer`.
///
/// Each paragraph is split on whitespace and packed greedily into lines no
/// wider than the text area. A paragraph with no words contributes no lines
/// but still takes part in paragraph spacing.
pub fn layout_text(
    paragraphs: &[String],
    style: &TextStyle,
    measurer: &impl TextMeasurer,
) -> Result<TextLayout, LayoutError> {
    let alignment: Alignment = style.alignment.parse()?;
    let mut height = INITIAL_HEIGHT;
    let mut attempts = 0;

    loop {
        attempts += 1;
        let canvas = CanvasGeometry::for_height(height, style.aspect_ratio, style.margins);
        log::trace!(
            "layout attempt {attempts}: {}x{} canvas",
            canvas.width,
            canvas.height
        );

        let overflow = match pack(paragraphs, style, measurer, &canvas) {
            Packing::Fits {
                paragraphs: packed,
                text_height,
            } => {
                return Ok(position(
                    packed,
                    text_height,
                    canvas,
                    alignment,
                    style,
                    measurer,
                    attempts,
                ));
            }
            overflow => overflow,
        };

        let next = height + HEIGHT_DELTA;
        if next > style.max_height {
            return Err(match overflow {
                Packing::WordTooWide {
                    word,
                    width,
                    max_width,
                } => LayoutError::UnfittableWord {
                    word,
                    width,
                    max_width,
                    max_height: style.max_height,
                },
                _ => LayoutError::CanvasTooSmall {
                    max_height: style.max_height,
                },
            });
        }
        log::debug!("text overflows {height}px canvas; growing to {next}px");
        height = next;
    }
}

fn paragraph_spacing(style: &TextStyle) -> i64 {
    i64::from(style.font_size + DESCENDER_SPACING + LINE_SPACING)
}

fn style_line_height(line: &str, style: &TextStyle) -> i64 {
    line_height(
        line,
        style.font_size,
        DESCENDER_SPACING,
        &style.descenders,
        style.always_use_descender_spacing,
    )
}

/// Height a line adds to the block. The very first line of the text adds
/// only its own height; every later line also adds the line gap.
fn line_advance(line: &str, paragraph: usize, index: usize, style: &TextStyle) -> i64 {
    if paragraph == 0 && index == 0 {
        style_line_height(line, style)
    } else {
        i64::from(LINE_SPACING) + style_line_height(line, style)
    }
}

fn pack(
    paragraphs: &[String],
    style: &TextStyle,
    measurer: &impl TextMeasurer,
    canvas: &CanvasGeometry,
) -> Packing {
    let max_width = canvas.text_area_width();
    let max_height = canvas.text_area_height();

    let mut packed = Vec::with_capacity(paragraphs.len());
    let mut text_height: i64 = 0;

    for (p, paragraph) in paragraphs.iter().enumerate() {
        if p > 0 {
            text_height += paragraph_spacing(style);
            if text_height > max_height {
                return Packing::TooTall;
            }
        }

        let mut lines: Vec<String> = Vec::new();
        let mut line = String::new();

        for word in paragraph.split_whitespace() {
            let width = measurer.text_width(style.font_size, word);
            let word_width = i64::from(width);
            if word_width > max_width {
                return Packing::WordTooWide {
                    word: word.to_string(),
                    width,
                    max_width,
                };
            }

            if line.is_empty() {
                line.push_str(word);
                continue;
            }

            // Kerning and rounding make widths non-additive.
            let candidate = format!("{line} {word}");
            if i64::from(measurer.text_width(style.font_size, &candidate)) <= max_width {
                line = candidate;
            } else {
                text_height += line_advance(&line, p, lines.len(), style);
                lines.push(std::mem::take(&mut line));
                if text_height > max_height {
                    return Packing::TooTall;
                }
                line.push_str(word);
            }
        }

        if !line.is_empty() {
            text_height += line_advance(&line, p, lines.len(), style);
            lines.push(line);
            if text_height > max_height {
                return Packing::TooTall;
            }
        }
        packed.push(lines);
    }

    Packing::Fits {
        paragraphs: packed,
        text_height,
    }
}

fn position(
    paragraphs: Vec<Vec<String>>,
    text_height: i64,
    canvas: CanvasGeometry,
    alignment: Alignment,
    style: &TextStyle,
    measurer: &impl TextMeasurer,
    attempts: u32,
) -> TextLayout {
    let mut cursor = start_cursor(&canvas, text_height, style.font_size);
    let mut lines = Vec::new();
    let mut line_counts = Vec::with_capacity(paragraphs.len());

    for paragraph in paragraphs {
        line_counts.push(paragraph.len());
        for text in paragraph {
            let width = measurer.text_width(style.font_size, &text);
            let x = aligned_x(alignment, &canvas, i64::from(width));
            let advance = i64::from(LINE_SPACING) + style_line_height(&text, style);
            lines.push(DrawLine {
                has_descenders: contains_descender(&text, &style.descenders),
                text,
                x,
                y: cursor,
                width,
            });
            cursor -= advance;
        }
        cursor -= paragraph_spacing(style);
    }

    TextLayout {
        canvas,
        text_height,
        lines,
        line_counts,
        attempts,
    }
}
