//! Pure Rust image codec using the `image` crate.
//!
//! Identify reads dimensions from the file header without a full decode.
//! Raster preparation decodes, flattens any alpha channel onto white,
//! downscales with Lanczos3 when the target is smaller than the source, and
//! re-encodes as baseline JPEG — the payload a PDF image XObject embeds
//! directly via the DCTDecode filter.

use super::codec::{CodecError, Dimensions, ImageCodec, Raster};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbImage};
use std::path::Path;

/// JPEG quality for embedded rasters. Contact-sheet cells are small, so a
/// high quality setting costs little.
const EMBED_JPEG_QUALITY: u8 = 90;

/// Extensions with decoders compiled in (see the `image` features in
/// Cargo.toml).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

/// Pure Rust codec backed by the `image` crate.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, CodecError> {
    ImageReader::open(path)
        .map_err(CodecError::Io)?
        .decode()
        .map_err(|e| CodecError::Decode(format!("Failed to decode {}: {}", path.display(), e)))
}

/// Flatten to 8-bit RGB, compositing any alpha channel onto white.
///
/// PDF DCTDecode images carry no alpha; white matches the paper the sheet
/// is printed on.
fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let mut rgb = RgbImage::new(rgba.width(), rgba.height());
        for (out, px) in rgb.pixels_mut().zip(rgba.pixels()) {
            let a = px[3] as u32;
            for c in 0..3 {
                out[c] = ((px[c] as u32 * a + 255 * (255 - a)) / 255) as u8;
            }
        }
        rgb
    } else {
        img.to_rgb8()
    }
}

/// Encode an RGB raster as baseline JPEG into memory.
fn encode_jpeg(rgb: &RgbImage) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, EMBED_JPEG_QUALITY)
        .encode_image(rgb)
        .map_err(|e| CodecError::Decode(format!("JPEG encode failed: {}", e)))?;
    Ok(bytes)
}

impl ImageCodec for RustCodec {
    fn identify(&self, path: &Path) -> Result<Dimensions, CodecError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            CodecError::Decode(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn scaled_raster(&self, path: &Path, width: u32, height: u32) -> Result<Raster, CodecError> {
        let img = load_image(path)?;

        // Shrink only. The layout already clamps scale at 1, so a target at
        // or above the intrinsic size means "embed as-is".
        let scaled = if width < img.width() || height < img.height() {
            img.resize(width.max(1), height.max(1), FilterType::Lanczos3)
        } else {
            img
        };

        let rgb = flatten_to_rgb(scaled);
        let (w, h) = (rgb.width(), rgb.height());
        let jpeg = encode_jpeg(&rgb)?;
        Ok(Raster {
            width: w,
            height: h,
            jpeg,
        })
    }
}
