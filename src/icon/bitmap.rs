//! Icon assets and bitmap decoding.
//!
//! Assets are addressed by extension-style absolute paths (`/img/flags/ua.png`).
//! Decoding optionally resizes with nearest-neighbor filtering so small flag
//! assets stay crisp when upscaled.

use std::collections::HashMap;
use std::path::PathBuf;

use futures::future::BoxFuture;
use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::error_handling::RenderError;

/// A decoded RGBA bitmap. Dropping it releases its pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Target size of a decode-time resize. Always nearest-neighbor, which keeps
/// hard pixel edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
}

/// Source of icon asset bytes.
pub trait AssetSource: Send + Sync {
    /// Fetches the bytes of the asset at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::AssetNotFound`] if nothing exists at `path`.
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, RenderError>>;
}

/// Decodes image bytes into bitmaps.
pub trait BitmapDecoder: Send + Sync {
    /// Decodes `bytes`, resized when `resize` is given.
    fn decode(&self, bytes: &[u8], resize: Option<Resize>) -> Result<Bitmap, RenderError>;
}

/// Assets read from a directory; `/img/x.png` maps to `<root>/img/x.png`.
///
/// Paths with `..` segments never leave the root: they are reported as missing.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirAssets {
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, RenderError>> {
        Box::pin(async move {
            let relative = path.trim_start_matches('/');
            if relative.split(['/', '\\']).any(|segment| segment == "..") {
                return Err(RenderError::AssetNotFound(path.to_string()));
            }
            let file = self.root.join(relative);
            match tokio::fs::read(&file).await {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(RenderError::AssetNotFound(path.to_string()))
                }
                Err(e) => Err(e.into()),
            }
        })
    }
}

/// Assets held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(path.into(), bytes);
    }
}

impl AssetSource for MemoryAssets {
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, RenderError>> {
        let result = self
            .assets
            .get(path)
            .cloned()
            .ok_or_else(|| RenderError::AssetNotFound(path.to_string()));
        Box::pin(async move { result })
    }
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl BitmapDecoder for ImageDecoder {
    fn decode(&self, bytes: &[u8], resize: Option<Resize>) -> Result<Bitmap, RenderError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| RenderError::Decode {
            path: String::from("<memory>"),
            reason: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        let image = match resize {
            Some(r) if (r.width, r.height) != rgba.dimensions() => {
                imageops::resize(&rgba, r.width, r.height, FilterType::Nearest)
            }
            _ => rgba,
        };
        Ok(Bitmap::new(image))
    }
}

/// Encodes a bitmap-sized RGBA buffer as PNG.
pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, RenderError> {
    let image = RgbaImage::from_raw(width, height, rgba.to_vec()).ok_or_else(|| {
        RenderError::Decode {
            path: String::from("<canvas>"),
            reason: format!("{} bytes do not form a {width}x{height} image", rgba.len()),
        }
    })?;
    let mut out = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| RenderError::Decode {
            path: String::from("<canvas>"),
            reason: e.to_string(),
        })?;
    Ok(out.into_inner())
}
