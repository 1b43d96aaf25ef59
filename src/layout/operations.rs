//! High-level card operations.
//!
//! These functions combine the layout engine with backend execution: lay
//! out an entry's title, turn the layout into [`RenderParams`], and hand
//! them to the backend.

use super::backend::{BackendError, TextBackend};
use super::engine::{DESCENDER_SPACING, LayoutError, TextLayout, layout_text};
use super::params::{RenderParams, TextStyle};
use crate::entry::Entry;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("Render failed: {0}")]
    Backend(#[from] BackendError),
}

/// A title card written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub line_count: usize,
    pub attempts: u32,
}

/// Turn a finished layout into backend parameters.
pub fn plan_render(layout: &TextLayout, style: &TextStyle, output: &Path) -> RenderParams {
    RenderParams {
        output: output.to_path_buf(),
        width: layout.canvas.width,
        height: layout.canvas.height,
        font_size: style.font_size,
        color: style.color,
        lines: layout.lines.clone(),
        descender_spacing: DESCENDER_SPACING,
        show_line_borders: style.show_line_borders,
    }
}

/// Lay out `paragraphs` and render them to `output`.
pub fn create_card(
    backend: &impl TextBackend,
    paragraphs: &[String],
    style: &TextStyle,
    output: &Path,
) -> Result<RenderedCard, CardError> {
    let layout = layout_text(paragraphs, style, backend)?;
    let params = plan_render(&layout, style, output);
    backend.render(&params)?;
    Ok(RenderedCard {
        path: output.to_path_buf(),
        width: layout.canvas.width,
        height: layout.canvas.height,
        line_count: layout.lines.len(),
        attempts: layout.attempts,
    })
}

/// Render an entry's title to `<output_dir>/<generated id>.png`.
pub fn create_title_card(
    backend: &impl TextBackend,
    entry: &Entry,
    style: &TextStyle,
    output_dir: &Path,
) -> Result<RenderedCard, CardError> {
    let output = output_dir.join(entry.to_filename());
    create_card(backend, entry.title(), style, &output)
}
