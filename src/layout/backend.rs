//! Text backend traits and shared types.
//!
//! Layout only needs to know how wide a run of text is; drawing needs the
//! full [`RenderParams`]. The two concerns are split so the layout engine can
//! be driven by anything that measures text:
//!
//! - [`TextMeasurer`]: `text_width` for a font size.
//! - [`TextBackend`]: a measurer that can also draw a card to disk.
//!
//! The production implementation is
//! [`FontBackend`](super::font_backend::FontBackend), built on `ab_glyph`
//! and `image`.

use super::params::RenderParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Font load failed: {0}")]
    Font(String),
    #[error("Image encode failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Measures rendered text width.
pub trait TextMeasurer {
    /// Horizontal extent of `text` at `font_size`, in pixels.
    fn text_width(&self, font_size: u32, text: &str) -> u32;
}

/// A measurer that can also draw title cards.
///
/// `Sync` so one backend can be shared across rayon workers.
pub trait TextBackend: TextMeasurer + Sync {
    /// Draw every line in `params` and write the PNG to `params.output`.
    fn render(&self, params: &RenderParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::layout::params::DrawLine;
    use std::sync::Mutex;

    /// Mock backend with fixed-advance glyphs that records renders without
    /// touching disk. Every character, space included, is `font_size / 2`
    /// pixels wide.
    ///
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub renders: Mutex<Vec<RenderParams>>,
        /// Render calls whose output path contains this string fail.
        pub fail_on: Option<String>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(fragment: &str) -> Self {
            Self {
                renders: Mutex::new(Vec::new()),
                fail_on: Some(fragment.to_string()),
            }
        }

        pub fn glyph_width(font_size: u32) -> u32 {
            font_size / 2
        }

        pub fn get_renders(&self) -> Vec<RenderParams> {
            self.renders.lock().unwrap().clone()
        }
    }

    impl TextMeasurer for MockBackend {
        fn text_width(&self, font_size: u32, text: &str) -> u32 {
            text.chars().count() as u32 * Self::glyph_width(font_size)
        }
    }

    impl TextBackend for MockBackend {
        fn render(&self, params: &RenderParams) -> Result<(), BackendError> {
            let fails = self
                .fail_on
                .as_deref()
                .is_some_and(|fragment| params.output.to_string_lossy().contains(fragment));
            if fails {
                return Err(BackendError::Font(format!(
                    "mock failure for {}",
                    params.output.display()
                )));
            }
            self.renders.lock().unwrap().push(params.clone());
            Ok(())
        }
    }

    #[test]
    fn mock_measures_fixed_advance() {
        let backend = MockBackend::new();
        assert_eq!(backend.text_width(100, "abc"), 150);
        assert_eq!(backend.text_width(100, "a b"), 150);
        assert_eq!(backend.text_width(100, ""), 0);
        assert_eq!(backend.text_width(40, "éé"), 40);
    }

    #[test]
    fn mock_records_render() {
        let backend = MockBackend::new();
        backend
            .render(&RenderParams {
                output: "/out/card.png".into(),
                width: 778,
                height: 1000,
                font_size: 100,
                color: [255, 255, 255],
                lines: vec![DrawLine {
                    text: "Hi".into(),
                    x: 339,
                    y: 450,
                    width: 100,
                    has_descenders: false,
                }],
                descender_spacing: 30,
                show_line_borders: false,
            })
            .unwrap();

        let renders = backend.get_renders();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].width, 778);
        assert_eq!(renders[0].lines[0].text, "Hi");
    }

    #[test]
    fn mock_can_fail() {
        let backend = MockBackend::failing_on("bad");
        let params = RenderParams {
            output: "/out/bad.png".into(),
            width: 10,
            height: 10,
            font_size: 10,
            color: [0, 0, 0],
            lines: Vec::new(),
            descender_spacing: 3,
            show_line_borders: false,
        };
        assert!(backend.render(&params).is_err());
        assert!(backend.get_renders().is_empty());
    }
}
