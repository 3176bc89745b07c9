//! Toolbar icon composition.
//!
//! Every icon is drawn onto a fresh square canvas: the base image is scaled
//! with nearest-neighbor filtering and centered, then optionally blurred or
//! decorated with a glyph in the bottom-right corner, and finally pushed to
//! the tab's page action.

use std::sync::Arc;

use super::bitmap::{AssetSource, BitmapDecoder, Resize};
use super::canvas::{CanvasFactory, CanvasFilter, SquareCanvas};
use crate::config::{
    CANVAS_SIZE, DEFAULT_BLUR_RADIUS, FLAGS_SEGMENT, FLAG_SCALE, GLYPH_DESCENDER_PAD, GLYPH_FONT,
};
use crate::error_handling::RenderError;
use crate::platform::{ActionApi, TabId};

/// Where a scaled image lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Scale factor for an asset: flags are upscaled 4×, everything else is
/// fitted to the canvas width.
pub fn scale_for(path: &str, width: u32) -> f64 {
    if path.split('/').any(|segment| segment == FLAGS_SEGMENT) {
        FLAG_SCALE
    } else {
        CANVAS_SIZE as f64 / width as f64
    }
}

/// Scales `width`×`height` by `scale` and centers it in a `canvas`-sized square.
pub fn placement(width: u32, height: u32, scale: f64, canvas: u32) -> Placement {
    let width = (width as f64 * scale).round() as u32;
    let height = (height as f64 * scale).round() as u32;
    let offset = |d: u32| (canvas.saturating_sub(d) as f64 / 2.0).round() as u32;
    Placement {
        x: offset(width),
        y: offset(height),
        width,
        height,
    }
}

/// Draws page action icons.
#[derive(Clone)]
pub struct IconRenderer {
    assets: Arc<dyn AssetSource>,
    decoder: Arc<dyn BitmapDecoder>,
    canvases: Arc<dyn CanvasFactory>,
    action: Arc<dyn ActionApi>,
}

impl IconRenderer {
    pub fn new(
        assets: Arc<dyn AssetSource>,
        decoder: Arc<dyn BitmapDecoder>,
        canvases: Arc<dyn CanvasFactory>,
        action: Arc<dyn ActionApi>,
    ) -> Self {
        Self {
            assets,
            decoder,
            canvases,
            action,
        }
    }

    /// Starts a drawing on a fresh, empty canvas.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::CanvasUnavailable`] if no canvas can be made.
    pub fn begin(&self) -> Result<IconDrawing<'_>, RenderError> {
        Ok(IconDrawing {
            renderer: self,
            canvas: self.canvases.create(CANVAS_SIZE)?,
        })
    }
}

/// An icon being drawn. Consumed by [`IconDrawing::commit_to_tab_icon`].
pub struct IconDrawing<'r> {
    renderer: &'r IconRenderer,
    canvas: Box<dyn SquareCanvas>,
}

impl IconDrawing<'_> {
    /// Clears the canvas and draws the asset at `path` scaled and centered.
    pub async fn draw_upscaled(&mut self, path: &str) -> Result<Placement, RenderError> {
        let bytes = self.renderer.assets.fetch(path).await?;
        let natural = self
            .renderer
            .decoder
            .decode(&bytes, None)
            .map_err(|e| with_path(e, path))?;
        if natural.width() == 0 || natural.height() == 0 {
            return Err(RenderError::Decode {
                path: path.to_string(),
                reason: "image has no pixels".into(),
            });
        }

        let size = self.canvas.size();
        let at = placement(
            natural.width(),
            natural.height(),
            scale_for(path, natural.width()),
            size,
        );
        drop(natural);

        let resize = Resize {
            width: at.width.max(1),
            height: at.height.max(1),
        };
        let scaled = self
            .renderer
            .decoder
            .decode(&bytes, Some(resize))
            .map_err(|e| with_path(e, path))?;

        self.canvas.clear_rect(0, 0, size, size);
        self.canvas.draw_image(&scaled, at.x as i64, at.y as i64);
        log::trace!("Drew {path} at {at:?}");
        Ok(at)
    }

    /// Draws `glyph` anchored to the bottom-right corner in black.
    ///
    /// On canvases without filter support the glyph is drawn with a trailing
    /// descender so the baseline sits high enough to keep emoji unclipped.
    /// The padding itself falls outside the canvas.
    pub fn add_glyph(&mut self, glyph: &str) {
        self.canvas.set_font(GLYPH_FONT);
        self.canvas.set_fill_style([0, 0, 0, 255]);

        let metrics = self.canvas.measure_text(glyph);
        let (text, descent) = if self.canvas.supports_filter() {
            (glyph.to_string(), metrics.descent)
        } else {
            let padded = format!("{glyph}{GLYPH_DESCENDER_PAD}");
            let descent = self.canvas.measure_text(&padded).descent;
            (padded, descent)
        };

        let size = self.canvas.size() as f64;
        self.canvas
            .fill_text(&text, size - metrics.width, size - descent);
    }

    /// Sets a blur filter for subsequent draws; no-op without filter support.
    pub fn blur(&mut self, radius: Option<f32>) {
        if self.canvas.supports_filter() {
            self.canvas
                .set_filter(CanvasFilter::Blur(radius.unwrap_or(DEFAULT_BLUR_RADIUS)));
        }
    }

    pub fn supports_filter(&self) -> bool {
        self.canvas.supports_filter()
    }

    pub async fn draw_upscaled_with_glyph(
        &mut self,
        path: &str,
        glyph: &str,
    ) -> Result<Placement, RenderError> {
        let at = self.draw_upscaled(path).await?;
        self.add_glyph(glyph);
        Ok(at)
    }

    pub async fn draw_upscaled_with_blur(&mut self, path: &str) -> Result<Placement, RenderError> {
        self.blur(None);
        self.draw_upscaled(path).await
    }

    /// Pushes the full canvas to the tab's page action icon.
    pub async fn commit_to_tab_icon(self, tab_id: TabId) -> Result<(), RenderError> {
        let image = self.canvas.image_data();
        self.renderer.action.set_icon_image(tab_id, image).await?;
        Ok(())
    }
}

fn with_path(err: RenderError, path: &str) -> RenderError {
    match err {
        RenderError::Decode { reason, .. } => RenderError::Decode {
            path: path.to_string(),
            reason,
        },
        other => other,
    }
}
