//! Directory scanning and manifest generation.
//!
//! Stage 1 of the proofsheet pipeline. Lists a single directory of raster
//! images, probes each one's intrinsic dimensions through the codec, and
//! produces the manifest the layout stage consumes.
//!
//! ## Ordering
//!
//! Entries are natural-sorted by filename ([`crate::naming::natural_cmp`]),
//! so `img2.png` lands in the cell before `img10.png`. This ordering is the
//! only contract the layout engine depends on from its input.
//!
//! ## Skipped images
//!
//! A file the codec cannot read is recorded under `skipped` with the codec's
//! error text and produces no entry at all — it never occupies a grid slot,
//! so the images after it shift up to fill the gap. One bad download does
//! not leave a hole in the sheet, at the cost of shifting the alignment of
//! everything behind it.

use crate::config::{self, SheetConfig};
use crate::imaging::ImageCodec;
use crate::naming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// Directory the images were read from.
    pub source: String,
    /// Readable images in layout order.
    pub entries: Vec<ImageEntry>,
    /// Files with an image extension the codec could not read.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedImage>,
    /// Sheet config loaded from the source directory.
    pub config: SheetConfig,
}

/// One source image, dimensions already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Full path, handed to the renderer for the final embed.
    pub path: String,
    /// Filename only; the natural-sort key.
    pub filename: String,
    /// Caption text: filename with the extension stripped.
    pub label: String,
    /// Intrinsic pixel width.
    pub width: u32,
    /// Intrinsic pixel height.
    pub height: u32,
}

/// A file that looked like an image but could not be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedImage {
    pub path: String,
    pub reason: String,
}

/// Extensions accepted by the scanner, matching the decoders compiled into
/// the codec.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

/// Scan `source` into a manifest: list, natural-sort, probe dimensions.
pub fn scan(source: &Path, codec: &impl ImageCodec) -> Result<Manifest, ScanError> {
    if !source.is_dir() {
        return Err(ScanError::NotADirectory(source.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(source)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_image(p))
        .collect();

    // Sort before probing so skipped files keep their position in the
    // diagnostics too.
    files.sort_by(|a, b| {
        naming::natural_cmp(
            &a.file_name().unwrap_or_default().to_string_lossy(),
            &b.file_name().unwrap_or_default().to_string_lossy(),
        )
    });

    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    for path in &files {
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        match codec.identify(path) {
            Ok(dims) => entries.push(ImageEntry {
                path: path.to_string_lossy().to_string(),
                label: naming::label_for(path),
                filename,
                width: dims.width,
                height: dims.height,
            }),
            Err(err) => {
                skipped.push(SkippedImage {
                    path: path.to_string_lossy().to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let config = config::load_config(source)?;

    Ok(Manifest {
        source: source.to_string_lossy().to_string(),
        entries,
        skipped,
        config,
    })
}

fn is_image(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}
