//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait defines the two operations the pipeline needs
//! from an image library: identify (intrinsic dimensions, called once per
//! image during scan) and scaled_raster (the final embed-ready payload,
//! called once per image during render).
//!
//! The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec) — pure Rust, statically
//! linked. Tests substitute a recording mock so scan and compose logic can
//! be exercised without decoding a single pixel.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// An embed-ready raster: JPEG bytes plus the pixel size they decode to.
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

/// Trait for image codecs.
///
/// Both operations take a path so callers stay free of any image-library
/// types; the codec owns decode, alpha handling, and re-encoding.
pub trait ImageCodec {
    /// Intrinsic pixel dimensions, without a full decode where possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, CodecError>;

    /// Decode, scale down to fit within `width`x`height` pixels (never
    /// enlarging), and re-encode as an embed-ready JPEG raster.
    fn scaled_raster(&self, path: &Path, width: u32, height: u32) -> Result<Raster, CodecError>;
}
