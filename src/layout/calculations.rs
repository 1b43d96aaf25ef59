//! Pure calculation functions for canvas geometry and line placement.
//!
//! All functions here are pure and testable without fonts or images.
//! Coordinates follow the bottom-left origin used throughout the layout
//! module: `y` grows upward and the text cursor moves down by decreasing it.

use super::params::Alignment;

/// Canvas size and the margin box inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub width: u32,
    pub height: u32,
    pub left_margin: i64,
    pub right_margin: i64,
    pub bottom_margin: i64,
    pub top_margin: i64,
}

impl CanvasGeometry {
    /// Geometry for a canvas of `height`, width derived from `aspect`.
    ///
    /// # Examples
    /// ```
    /// # use journal_cards::layout::CanvasGeometry;
    /// // 7:9 at 1000px tall → 778px wide, 700x900 text area at 5% margins
    /// let canvas = CanvasGeometry::for_height(1000, (7, 9), 0.05);
    /// assert_eq!(canvas.width, 778);
    /// assert_eq!(canvas.text_area_width(), 700);
    /// assert_eq!(canvas.text_area_height(), 900);
    /// ```
    pub fn for_height(height: u32, aspect: (u32, u32), margins: f64) -> Self {
        let (aspect_w, aspect_h) = aspect;
        let width = (height as f64 * aspect_w as f64 / aspect_h as f64).round() as u32;
        Self {
            width,
            height,
            left_margin: (width as f64 * margins).round() as i64,
            right_margin: (width as f64 * (1.0 - margins)).round() as i64,
            bottom_margin: (height as f64 * margins).round() as i64,
            top_margin: (height as f64 * (1.0 - margins)).round() as i64,
        }
    }

    pub fn text_area_width(&self) -> i64 {
        self.right_margin - self.left_margin
    }

    pub fn text_area_height(&self) -> i64 {
        self.top_margin - self.bottom_margin
    }
}

/// Whether `line` contains any character from `descenders`.
pub fn contains_descender(line: &str, descenders: &str) -> bool {
    line.chars().any(|c| descenders.contains(c))
}

/// Vertical space a line occupies, before inter-line spacing.
pub fn line_height(
    line: &str,
    font_size: u32,
    descender_spacing: u32,
    descenders: &str,
    always_use_descender_spacing: bool,
) -> i64 {
    if always_use_descender_spacing || contains_descender(line, descenders) {
        i64::from(font_size + descender_spacing)
    } else {
        i64::from(font_size)
    }
}

/// Left edge of a line of `line_width` under `alignment`.
pub fn aligned_x(alignment: Alignment, canvas: &CanvasGeometry, line_width: i64) -> i64 {
    match alignment {
        Alignment::Left => canvas.left_margin,
        Alignment::Right => canvas.right_margin - line_width,
        Alignment::Center => canvas.left_margin + (canvas.text_area_width() - line_width) / 2,
    }
}

/// Baseline of the first line, centering a block of `text_height` in the
/// text area.
pub fn start_cursor(canvas: &CanvasGeometry, text_height: i64, font_size: u32) -> i64 {
    canvas.top_margin - (canvas.text_area_height() - text_height) / 2 - i64::from(font_size)
}
