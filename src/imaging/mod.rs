//! Image decoding — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Scale for embedding** | Lanczos3 downscale, shrink only |
//! | **Alpha flattening** | composite onto white |
//! | **Encode for PDF** | `image::codecs::jpeg::JpegEncoder` (DCTDecode payload) |
//!
//! The module is split into:
//! - **Codec**: [`ImageCodec`] trait + shared types
//! - **RustCodec**: the `image`-crate implementation

pub mod codec;
pub mod rust_codec;

pub use codec::{CodecError, Dimensions, ImageCodec, Raster};
pub use rust_codec::RustCodec;
