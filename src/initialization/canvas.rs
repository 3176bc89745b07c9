//! Raster canvas initialization.

use crate::config::{Config, GLYPHS_DIR};
use crate::error_handling::InitializationError;
use crate::icon::{GlyphSet, RasterCanvasFactory};

/// Builds the canvas factory, loading glyph sprites from
/// `<assets_dir>/img/glyphs`.
///
/// # Errors
///
/// Returns `InitializationError::GlyphError` if a sprite cannot be decoded.
pub fn init_canvas_factory(config: &Config) -> Result<RasterCanvasFactory, InitializationError> {
    let glyphs = GlyphSet::load_dir(&config.assets_dir.join(GLYPHS_DIR))?;
    if glyphs.is_empty() {
        log::debug!("No glyph sprites found, status glyphs will render as boxes");
    }
    Ok(RasterCanvasFactory::new(glyphs, config.canvas_filter))
}
