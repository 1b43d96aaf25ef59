//! Parameter types for laying out and drawing title cards.
//!
//! These structs describe *what* to draw, not *how*. [`TextStyle`] feeds the
//! layout engine; [`RenderParams`] is the hand-off from the engine's output
//! to a [`TextBackend`](super::backend::TextBackend), which does the pixel
//! work. Keeping them apart lets tests swap in a mock backend without
//! touching layout logic.
//!
//! ## Types
//!
//! - [`Alignment`]: horizontal placement of each line inside the text area.
//! - [`TextStyle`]: typography and canvas geometry for one layout call.
//! - [`DrawLine`]: one positioned line, ready to draw.
//! - [`RenderParams`]: everything one PNG needs, from canvas size to debug borders.

use super::engine::LayoutError;
use crate::config::{DebugConfig, LayoutConfig};
use std::path::PathBuf;
use std::str::FromStr;

/// Horizontal line alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl FromStr for Alignment {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(LayoutError::InvalidAlignment(other.to_string())),
        }
    }
}

/// Typography and geometry for one layout call.
///
/// `alignment` stays a string until layout time so a bad value fails the
/// layout call itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: u32,
    /// `(width, height)`.
    pub aspect_ratio: (u32, u32),
    /// Fraction of each canvas dimension kept clear on every side.
    pub margins: f64,
    pub alignment: String,
    pub color: [u8; 3],
    pub always_use_descender_spacing: bool,
    pub descenders: String,
    pub max_height: u32,
    pub show_line_borders: bool,
}

impl TextStyle {
    pub fn from_config(layout: &LayoutConfig, debug: &DebugConfig) -> Self {
        Self {
            font_size: layout.font_size,
            aspect_ratio: (layout.aspect_ratio[0], layout.aspect_ratio[1]),
            margins: layout.margins,
            alignment: layout.text_alignment.clone(),
            color: layout.font_color,
            always_use_descender_spacing: layout.always_use_descender_spacing,
            descenders: layout.descenders.clone(),
            max_height: layout.max_height,
            show_line_borders: debug.show_line_borders,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default(), &DebugConfig::default())
    }
}

/// A line of text positioned on the canvas.
///
/// `x` is the left edge and `y` the baseline, both measured from the
/// bottom-left corner with `y` growing upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawLine {
    pub text: String,
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub has_descenders: bool,
}

/// Everything a backend needs to produce one title card.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub color: [u8; 3],
    pub lines: Vec<DrawLine>,
    /// Extra depth below the baseline on lines with descenders.
    pub descender_spacing: u32,
    pub show_line_borders: bool,
}
