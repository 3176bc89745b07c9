//! Page action icon rendering.
//!
//! This module provides:
//! - Asset loading and nearest-neighbor decoding ([`AssetSource`], [`BitmapDecoder`])
//! - The [`SquareCanvas`] drawing surface and the software [`RasterCanvas`]
//! - [`IconRenderer`], which composes and commits toolbar icons

mod bitmap;
mod canvas;
mod renderer;

// Re-export public API
pub use bitmap::{
    encode_png, AssetSource, Bitmap, BitmapDecoder, DirAssets, ImageDecoder, MemoryAssets, Resize,
};
pub use canvas::{
    CanvasFactory, CanvasFilter, GlyphSet, ImageData, RasterCanvas, RasterCanvasFactory,
    SquareCanvas, TextMetrics,
};
pub use renderer::{placement, scale_for, IconDrawing, IconRenderer, Placement};
