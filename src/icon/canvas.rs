//! Drawing surfaces for toolbar icons.
//!
//! [`SquareCanvas`] is the small subset of a 2D canvas the icon renderer
//! needs. [`RasterCanvas`] implements it over an in-memory RGBA buffer;
//! hosts with a real canvas can supply their own through [`CanvasFactory`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::bitmap::Bitmap;
use crate::error_handling::RenderError;

/// Raw RGBA pixels of a rendered icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Measured extent of a string of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    /// Distance the ink extends below the baseline.
    pub descent: f64,
}

/// Filter applied to subsequent draw operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasFilter {
    None,
    Blur(f32),
}

/// A square 2D drawing surface.
pub trait SquareCanvas: Send {
    fn size(&self) -> u32;

    /// Whether [`SquareCanvas::set_filter`] has any effect.
    fn supports_filter(&self) -> bool;

    fn set_filter(&mut self, filter: CanvasFilter);

    fn clear_rect(&mut self, x: u32, y: u32, width: u32, height: u32);

    /// Draws a bitmap with its top-left corner at (`x`, `y`).
    fn draw_image(&mut self, bitmap: &Bitmap, x: i64, y: i64);

    /// Sets the font as a CSS font shorthand, e.g. `24px serif`.
    fn set_font(&mut self, font: &str);

    fn set_fill_style(&mut self, rgba: [u8; 4]);

    fn measure_text(&self, text: &str) -> TextMetrics;

    /// Draws `text` with its baseline starting at (`x`, `y`).
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    fn image_data(&self) -> ImageData;
}

/// Creates fresh canvases.
pub trait CanvasFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RenderError::CanvasUnavailable`] when no canvas can be made.
    fn create(&self, size: u32) -> Result<Box<dyn SquareCanvas>, RenderError>;
}

/// Color sprites for characters the raster canvas cannot draw from outlines.
#[derive(Debug, Clone, Default)]
pub struct GlyphSet {
    sprites: HashMap<char, RgbaImage>,
}

impl GlyphSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, glyph: char, sprite: RgbaImage) {
        self.sprites.insert(glyph, sprite);
    }

    pub fn get(&self, glyph: char) -> Option<&RgbaImage> {
        self.sprites.get(&glyph)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Loads every `<codepoint-hex>.png` in `dir`, e.g. `274c.png` for ❌.
    ///
    /// Files with other names are skipped. A missing directory yields an
    /// empty set.
    pub fn load_dir(dir: &Path) -> Result<Self, RenderError> {
        let mut set = Self::new();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No glyph directory at {}", dir.display());
                return Ok(set);
            }
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let path = entry?.path();
            let Some(glyph) = glyph_for_file(&path) else {
                continue;
            };
            let sprite = image::open(&path).map_err(|e| RenderError::Decode {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            set.insert(glyph, sprite.to_rgba8());
        }
        log::debug!("Loaded {} glyph sprites from {}", set.len(), dir.display());
        Ok(set)
    }
}

fn glyph_for_file(path: &Path) -> Option<char> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    u32::from_str_radix(stem, 16).ok().and_then(char::from_u32)
}

const DESCENDERS: &[char] = &['g', 'j', 'p', 'q', 'y', ','];

// Approximate metrics of a generic sans-serif, in ems of the current font size.
const ASCENT_EM: f64 = 0.8;
const DESCENT_EM: f64 = 0.2;
const SPACE_EM: f64 = 0.25;
const NARROW_EM: f64 = 0.5;

/// Software canvas over an RGBA buffer.
///
/// Text uses a fixed-advance model rather than real font metrics. All sizes
/// are in ems of the current font size:
///
/// - a sprite glyph advances by its width scaled to 1em tall
/// - a space advances 0.25em
/// - other ASCII advances 0.5em
/// - anything else advances 1em
///
/// Sprites are drawn 1em tall with their top 0.8em above the baseline.
/// Measured descent is 0.2em when the text contains one of `g j p q y ,`
/// and zero otherwise. Characters without a sprite are drawn as solid boxes
/// in the fill color, 0.5em tall (plus the descent for descender characters).
pub struct RasterCanvas {
    image: RgbaImage,
    filter: CanvasFilter,
    filter_support: bool,
    font_px: f64,
    fill: Rgba<u8>,
    glyphs: Arc<GlyphSet>,
}

impl RasterCanvas {
    pub fn new(size: u32, glyphs: Arc<GlyphSet>) -> Self {
        Self {
            image: RgbaImage::new(size, size),
            filter: CanvasFilter::None,
            filter_support: true,
            font_px: 10.0,
            fill: Rgba([0, 0, 0, 255]),
            glyphs,
        }
    }

    /// Disables filters, for hosts whose canvas lacks them.
    pub fn without_filters(mut self) -> Self {
        self.filter_support = false;
        self
    }

    fn advance(&self, c: char) -> f64 {
        if let Some(sprite) = self.glyphs.get(c) {
            return sprite.width() as f64 * self.font_px / sprite.height().max(1) as f64;
        }
        if c == ' ' {
            self.font_px * SPACE_EM
        } else if c.is_ascii() {
            self.font_px * NARROW_EM
        } else {
            self.font_px
        }
    }

    fn fill_box(&mut self, x: f64, top: f64, width: f64, height: f64) {
        let size = self.image.width() as f64;
        let x0 = x.max(0.0).round() as u32;
        let y0 = top.max(0.0).round() as u32;
        let x1 = (x + width).min(size).round().max(0.0) as u32;
        let y1 = (top + height).min(size).round().max(0.0) as u32;
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, self.fill);
            }
        }
    }
}

impl SquareCanvas for RasterCanvas {
    fn size(&self) -> u32 {
        self.image.width()
    }

    fn supports_filter(&self) -> bool {
        self.filter_support
    }

    fn set_filter(&mut self, filter: CanvasFilter) {
        if self.filter_support {
            self.filter = filter;
        }
    }

    fn clear_rect(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let size = self.image.width();
        for py in y.min(size)..y.saturating_add(height).min(size) {
            for px in x.min(size)..x.saturating_add(width).min(size) {
                self.image.put_pixel(px, py, Rgba([0, 0, 0, 0]));
            }
        }
    }

    fn draw_image(&mut self, bitmap: &Bitmap, x: i64, y: i64) {
        match self.filter {
            CanvasFilter::Blur(sigma) if sigma > 0.0 => {
                let blurred = imageops::blur(bitmap.as_image(), sigma);
                imageops::overlay(&mut self.image, &blurred, x, y);
            }
            _ => imageops::overlay(&mut self.image, bitmap.as_image(), x, y),
        }
    }

    fn set_font(&mut self, font: &str) {
        match parse_font_px(font) {
            Some(px) => self.font_px = px,
            None => log::debug!("Unsupported font {font:?}, keeping {}px", self.font_px),
        }
    }

    fn set_fill_style(&mut self, rgba: [u8; 4]) {
        self.fill = Rgba(rgba);
    }

    fn measure_text(&self, text: &str) -> TextMetrics {
        let width = text.chars().map(|c| self.advance(c)).sum();
        let descent = if text.chars().any(|c| DESCENDERS.contains(&c)) {
            self.font_px * DESCENT_EM
        } else {
            0.0
        };
        TextMetrics { width, descent }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let glyphs = Arc::clone(&self.glyphs);
        let mut pen = x;
        for c in text.chars() {
            let advance = self.advance(c);
            if let Some(sprite) = glyphs.get(c) {
                let w = advance.round().max(1.0) as u32;
                let h = self.font_px.round().max(1.0) as u32;
                let scaled = imageops::resize(sprite, w, h, FilterType::Triangle);
                let top = y - self.font_px * ASCENT_EM;
                imageops::overlay(&mut self.image, &scaled, pen.round() as i64, top.round() as i64);
            } else if !c.is_whitespace() {
                let below = if DESCENDERS.contains(&c) {
                    self.font_px * DESCENT_EM
                } else {
                    0.0
                };
                let height = self.font_px * NARROW_EM + below;
                self.fill_box(pen, y - self.font_px * NARROW_EM, advance * 0.8, height);
            }
            pen += advance;
        }
    }

    fn image_data(&self) -> ImageData {
        ImageData {
            width: self.image.width(),
            height: self.image.height(),
            data: self.image.as_raw().clone(),
        }
    }
}

fn parse_font_px(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px"))
        .and_then(|px| px.parse::<f64>().ok())
        .filter(|px| *px > 0.0)
}

/// Factory for [`RasterCanvas`] instances sharing one glyph set.
#[derive(Debug, Clone)]
pub struct RasterCanvasFactory {
    glyphs: Arc<GlyphSet>,
    filter_support: bool,
}

impl RasterCanvasFactory {
    pub fn new(glyphs: GlyphSet, filter_support: bool) -> Self {
        Self {
            glyphs: Arc::new(glyphs),
            filter_support,
        }
    }
}

impl CanvasFactory for RasterCanvasFactory {
    fn create(&self, size: u32) -> Result<Box<dyn SquareCanvas>, RenderError> {
        if size == 0 {
            return Err(RenderError::CanvasUnavailable {
                size,
                reason: "zero-sized canvas".into(),
            });
        }
        let canvas = RasterCanvas::new(size, Arc::clone(&self.glyphs));
        Ok(if self.filter_support {
            Box::new(canvas)
        } else {
            Box::new(canvas.without_filters())
        })
    }
}

impl std::fmt::Debug for RasterCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterCanvas")
            .field("size", &self.image.width())
            .field("filter", &self.filter)
            .field("font_px", &self.font_px)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> Bitmap {
        Bitmap::new(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn test_parse_font_px() {
        assert_eq!(parse_font_px("24px serif"), Some(24.0));
        assert_eq!(parse_font_px("bold 12.5px sans-serif"), Some(12.5));
        assert_eq!(parse_font_px("serif"), None);
    }

    #[test]
    fn test_glyph_file_names() {
        assert_eq!(glyph_for_file(Path::new("img/glyphs/274c.png")), Some('❌'));
        assert_eq!(glyph_for_file(Path::new("img/glyphs/23f3.png")), Some('⏳'));
        assert_eq!(glyph_for_file(Path::new("img/glyphs/readme.txt")), None);
        assert_eq!(glyph_for_file(Path::new("img/glyphs/nothex.png")), None);
    }

    #[test]
    fn test_draw_image_places_pixels() {
        let mut canvas = RasterCanvas::new(8, Arc::new(GlyphSet::new()));
        canvas.draw_image(&solid(2, 2, [255, 0, 0, 255]), 3, 5);
        let data = canvas.image_data();
        let at = |x: usize, y: usize| &data.data[(y * 8 + x) * 4..(y * 8 + x) * 4 + 4];
        assert_eq!(at(3, 5), &[255, 0, 0, 255]);
        assert_eq!(at(4, 6), &[255, 0, 0, 255]);
        assert_eq!(at(2, 5), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_clear_rect_is_clipped() {
        let mut canvas = RasterCanvas::new(4, Arc::new(GlyphSet::new()));
        canvas.draw_image(&solid(4, 4, [1, 2, 3, 255]), 0, 0);
        canvas.clear_rect(2, 2, 100, 100);
        let data = canvas.image_data();
        assert_eq!(&data.data[0..4], &[1, 2, 3, 255]);
        assert_eq!(&data.data[(3 * 4 + 3) * 4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_filter_ignored_without_support() {
        let mut canvas = RasterCanvas::new(4, Arc::new(GlyphSet::new())).without_filters();
        canvas.set_filter(CanvasFilter::Blur(2.0));
        assert_eq!(canvas.filter, CanvasFilter::None);
        assert!(!canvas.supports_filter());
    }

    #[test]
    fn test_measure_text_uses_sprite_aspect() {
        let mut glyphs = GlyphSet::new();
        glyphs.insert('❌', RgbaImage::new(72, 72));
        let mut canvas = RasterCanvas::new(64, Arc::new(glyphs));
        canvas.set_font("24px serif");

        let plain = canvas.measure_text("❌");
        assert_eq!(plain, TextMetrics { width: 24.0, descent: 0.0 });

        let padded = canvas.measure_text("❌ q");
        assert_eq!(padded.width, 24.0 + 6.0 + 12.0);
        assert!(padded.descent > 0.0);
    }

    #[test]
    fn test_measure_text_without_sprites() {
        let mut canvas = RasterCanvas::new(64, Arc::new(GlyphSet::new()));
        canvas.set_font("20px sans-serif");

        assert_eq!(canvas.measure_text(" ").width, 5.0);
        assert_eq!(canvas.measure_text("ab").width, 20.0);
        assert_eq!(canvas.measure_text("é").width, 20.0);
        assert_eq!(canvas.measure_text("ab").descent, 0.0);
        assert!((canvas.measure_text("y").descent - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_factory_rejects_zero_size() {
        let factory = RasterCanvasFactory::new(GlyphSet::new(), true);
        assert!(matches!(
            factory.create(0),
            Err(RenderError::CanvasUnavailable { size: 0, .. })
        ));
        assert_eq!(factory.create(64).unwrap().size(), 64);
    }
}
