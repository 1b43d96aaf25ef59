//! Title card layout and rendering.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Measure** | `ab_glyph` advances + kerning |
//! | **Fit-and-grow** | [`layout_text`], pure apart from measuring |
//! | **Draw** | `ab_glyph` coverage onto an `image::RgbImage` |
//! | **Encode** | `image` PNG encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for canvas and line geometry (unit testable)
//! - **Parameters**: Data structures describing styles and draw calls
//! - **Engine**: The fit-and-grow loop and line positioning
//! - **Backend**: [`TextMeasurer`] / [`TextBackend`] traits + [`FontBackend`]
//! - **Operations**: High-level functions combining the engine + backend

pub mod backend;
mod calculations;
pub mod engine;
pub mod font_backend;
pub mod operations;
mod params;

pub use backend::{BackendError, TextBackend, TextMeasurer};
pub use calculations::CanvasGeometry;
pub use engine::{
    DESCENDER_SPACING, HEIGHT_DELTA, INITIAL_HEIGHT, LINE_SPACING, LayoutError, TextLayout,
    layout_text,
};
pub use font_backend::FontBackend;
pub use operations::{CardError, RenderedCard, create_card, create_title_card, plan_render};
pub use params::{Alignment, DrawLine, RenderParams, TextStyle};
