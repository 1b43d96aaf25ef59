//! Font rasterizing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Font loading | `ab_glyph::FontVec::try_from_vec` (TrueType / OpenType) |
//! | Measuring | `ab_glyph::ScaleFont` advances plus kerning |
//! | Glyph coverage | `ab_glyph::OutlinedGlyph::draw` |
//! | Canvas + PNG encode | `image::RgbImage`, `ImageFormat::Png` |
//!
//! Layout coordinates put the origin at the bottom-left with `y` as the
//! baseline; the raster is top-down, so rows are flipped when drawing.

use super::backend::{BackendError, TextBackend, TextMeasurer};
use super::params::{DrawLine, RenderParams};
use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use image::{ImageFormat, Rgb, RgbImage};
use std::fs;
use std::path::Path;

const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
const BORDER: Rgb<u8> = Rgb([255, 0, 0]);

/// Backend that measures and draws with a single loaded font.
pub struct FontBackend {
    font: FontVec,
}

impl FontBackend {
    pub fn from_file(path: &Path) -> Result<Self, BackendError> {
        let data = fs::read(path)?;
        let font = FontVec::try_from_vec(data)
            .map_err(|e| BackendError::Font(format!("{}: {e}", path.display())))?;
        Ok(Self { font })
    }

    /// Scale at which one em is `font_size` pixels.
    fn scale(&self, font_size: u32) -> PxScale {
        let size = font_size as f32;
        match self.font.units_per_em() {
            Some(units_per_em) => PxScale::from(size * self.font.height_unscaled() / units_per_em),
            None => PxScale::from(size),
        }
    }

    fn draw_line(&self, canvas: &mut RgbImage, line: &DrawLine, params: &RenderParams) {
        let scale = self.scale(params.font_size);
        let scaled = self.font.as_scaled(scale);
        let baseline = params.height as f32 - line.y as f32;
        let mut caret = line.x as f32;
        let mut previous: Option<GlyphId> = None;

        for c in line.text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = bounds.min.x as i64 + i64::from(gx);
                    let py = bounds.min.y as i64 + i64::from(gy);
                    blend(canvas, px, py, params.color, coverage);
                });
            }
        }
    }
}

impl TextMeasurer for FontBackend {
    fn text_width(&self, font_size: u32, text: &str) -> u32 {
        let scaled = self.font.as_scaled(self.scale(font_size));
        let mut width = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width.max(0.0).round() as u32
    }
}

impl TextBackend for FontBackend {
    fn render(&self, params: &RenderParams) -> Result<(), BackendError> {
        let mut canvas = RgbImage::from_pixel(params.width, params.height, BACKGROUND);
        for line in &params.lines {
            if params.show_line_borders {
                draw_border(&mut canvas, line, params);
            }
            self.draw_line(&mut canvas, line, params);
        }
        save_png(&canvas, &params.output)
    }
}

/// Mix `color` into the pixel at `(x, y)` by `coverage`. Out-of-bounds
/// pixels are skipped.
fn blend(canvas: &mut RgbImage, x: i64, y: i64, color: [u8; 3], coverage: f32) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for (channel, target) in pixel.0.iter_mut().zip(color) {
        let mixed = f32::from(*channel) * (1.0 - coverage) + f32::from(target) * coverage;
        *channel = mixed.round() as u8;
    }
}

/// Outline the box a line occupies: from its descender depth up to one
/// font size above that.
fn draw_border(canvas: &mut RgbImage, line: &DrawLine, params: &RenderParams) {
    let depth = if line.has_descenders {
        i64::from(params.descender_spacing)
    } else {
        0
    };
    let bottom = line.y - depth;
    let top = bottom + i64::from(params.font_size);
    let height = i64::from(params.height);

    let (x0, x1) = (line.x, line.x + i64::from(line.width));
    let (y0, y1) = (height - top, height - bottom);

    for x in x0..=x1 {
        put(canvas, x, y0, BORDER);
        put(canvas, x, y1, BORDER);
    }
    for y in y0..=y1 {
        put(canvas, x0, y, BORDER);
        put(canvas, x1, y, BORDER);
    }
}

fn put(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(canvas.width()) && y < i64::from(canvas.height()) {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

fn save_png(canvas: &RgbImage, path: &Path) -> Result<(), BackendError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    canvas.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// A system font for the rasterizing tests, when one is installed.
    fn system_font() -> Option<FontBackend> {
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/Library/Fonts/Arial.ttf",
        ]
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .and_then(|p| FontBackend::from_file(p).ok())
    }

    fn params(output: &Path, lines: Vec<DrawLine>, borders: bool) -> RenderParams {
        RenderParams {
            output: output.to_path_buf(),
            width: 200,
            height: 100,
            font_size: 40,
            color: [255, 255, 255],
            lines,
            descender_spacing: 12,
            show_line_borders: borders,
        }
    }

    fn line(text: &str, x: i64, y: i64, width: u32, has_descenders: bool) -> DrawLine {
        DrawLine {
            text: text.to_string(),
            x,
            y,
            width,
            has_descenders,
        }
    }

    // =========================================================================
    // Font loading
    // =========================================================================

    #[test]
    fn missing_font_is_io_error() {
        let result = FontBackend::from_file(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn garbage_font_is_font_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.ttf");
        fs::write(&path, b"not a font").unwrap();
        let result = FontBackend::from_file(&path);
        assert!(matches!(result, Err(BackendError::Font(_))));
    }

    // =========================================================================
    // Pixel helpers
    // =========================================================================

    #[test]
    fn blend_mixes_by_coverage() {
        let mut canvas = RgbImage::from_pixel(2, 2, BACKGROUND);
        blend(&mut canvas, 0, 0, [200, 100, 0], 1.0);
        blend(&mut canvas, 1, 0, [200, 100, 0], 0.5);
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([200, 100, 0]));
        assert_eq!(canvas.get_pixel(1, 0), &Rgb([100, 50, 0]));
        assert_eq!(canvas.get_pixel(0, 1), &BACKGROUND);
    }

    #[test]
    fn blend_ignores_out_of_bounds() {
        let mut canvas = RgbImage::from_pixel(2, 2, BACKGROUND);
        blend(&mut canvas, -1, 0, [255, 255, 255], 1.0);
        blend(&mut canvas, 2, 2, [255, 255, 255], 1.0);
        assert!(canvas.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn border_flips_to_raster_rows() {
        let mut canvas = RgbImage::from_pixel(200, 100, BACKGROUND);
        let p = params(Path::new("unused.png"), Vec::new(), true);
        // Baseline 30 from the bottom with descenders: box spans 18..58
        // bottom-up, rows 42..82 top-down.
        draw_border(&mut canvas, &line("gap", 10, 30, 50, true), &p);

        assert_eq!(canvas.get_pixel(10, 42), &BORDER);
        assert_eq!(canvas.get_pixel(60, 82), &BORDER);
        assert_eq!(canvas.get_pixel(35, 42), &BORDER);
        assert_eq!(canvas.get_pixel(35, 60), &BACKGROUND);
        assert_eq!(canvas.get_pixel(9, 42), &BACKGROUND);
    }

    #[test]
    fn save_png_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/card.png");
        let canvas = RgbImage::from_pixel(4, 3, BACKGROUND);
        save_png(&canvas, &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
    }

    // =========================================================================
    // With a real font (skipped when none is installed)
    // =========================================================================

    #[test]
    fn measures_longer_text_wider() {
        let Some(backend) = system_font() else {
            return;
        };
        let short = backend.text_width(40, "Hi");
        let long = backend.text_width(40, "Hi there");
        assert!(short > 0);
        assert!(long > short);
        assert!(backend.text_width(80, "Hi") > short);
        assert_eq!(backend.text_width(40, ""), 0);
    }

    #[test]
    fn renders_text_onto_black_canvas() {
        let Some(backend) = system_font() else {
            return;
        };
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("card.png");
        let width = backend.text_width(40, "Hi");
        backend
            .render(&params(&path, vec![line("Hi", 20, 40, width, false)], false))
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (200, 100));
        assert!(img.pixels().any(|p| p.0[0] > 128));
        assert_eq!(img.get_pixel(199, 0), &BACKGROUND);
    }
}
