//! Sheet configuration module.
//!
//! Handles loading and validating `sheet.toml`. Configuration resolves in
//! three layers: stock defaults, then an optional `sheet.toml` in the source
//! directory, then CLI flags on top.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! images_per_row = 4       # Grid columns per page
//! images_per_column = 5    # Grid rows per page
//! image_padding = 10.0     # Breathing room inside each cell (points)
//! page_width = 595.276     # Page width in points (default: A4)
//! page_height = 841.89     # Page height in points (default: A4)
//! margin = 20.0            # Margin around the grid (points)
//! print_titles = true      # Caption each image with its filename stem
//! ```
//!
//! Config files are sparse — override just the values you want. Unknown keys
//! are rejected to catch typos early.
//!
//! ## Validation
//!
//! Geometry is checked before any layout runs: the grid must have at least
//! one cell, every cell must have positive size after the margin is taken
//! out, and the padded fit box inside each cell must stay positive. A config
//! that fails validation aborts the run with no partial output.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// ISO A4 in PostScript points.
pub const A4_WIDTH: f64 = 595.276;
pub const A4_HEIGHT: f64 = 841.89;

/// Filename of the per-directory config file.
pub const CONFIG_FILE: &str = "sheet.toml";

/// Grid and page geometry for one contact sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Grid columns per page.
    pub images_per_row: u32,
    /// Grid rows per page.
    pub images_per_column: u32,
    /// Breathing room inside each cell, in points.
    pub image_padding: f64,
    /// Page width in points.
    pub page_width: f64,
    /// Page height in points.
    pub page_height: f64,
    /// Margin around the grid, in points.
    pub margin: f64,
    /// Caption each image with its filename stem.
    pub print_titles: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            images_per_row: 4,
            images_per_column: 5,
            image_padding: 10.0,
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: 20.0,
            print_titles: true,
        }
    }
}

impl SheetConfig {
    /// Size of one grid cell, `(width, height)` in points.
    ///
    /// Only meaningful for a validated config; a degenerate one yields
    /// non-positive values.
    pub fn cell_size(&self) -> (f64, f64) {
        (
            (self.page_width - 2.0 * self.margin) / self.images_per_row as f64,
            (self.page_height - 2.0 * self.margin) / self.images_per_column as f64,
        )
    }

    /// Images that fit on one full page.
    pub fn images_per_page(&self) -> usize {
        self.images_per_row as usize * self.images_per_column as usize
    }

    /// Reject degenerate geometry before any layout is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images_per_row == 0 || self.images_per_column == 0 {
            return Err(ConfigError::Validation(
                "images_per_row and images_per_column must be at least 1".into(),
            ));
        }
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "page size must be positive, got {}x{}",
                self.page_width, self.page_height
            )));
        }
        if self.margin < 0.0 {
            return Err(ConfigError::Validation(format!(
                "margin must be non-negative, got {}",
                self.margin
            )));
        }
        if self.image_padding < 0.0 {
            return Err(ConfigError::Validation(format!(
                "image_padding must be non-negative, got {}",
                self.image_padding
            )));
        }

        let (cell_w, cell_h) = self.cell_size();
        if cell_w <= 0.0 || cell_h <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "margin {} leaves no room for the grid on a {}x{} page",
                self.margin, self.page_width, self.page_height
            )));
        }
        if self.image_padding >= cell_w || self.image_padding >= cell_h {
            return Err(ConfigError::Validation(format!(
                "image_padding {} exceeds the {:.1}x{:.1} cell",
                self.image_padding, cell_w, cell_h
            )));
        }
        Ok(())
    }
}

/// Load the sheet config for a source directory.
///
/// Reads `<dir>/sheet.toml` when present; stock defaults otherwise. The
/// result is not validated here — callers validate after CLI overrides have
/// been applied.
pub fn load_config(dir: &Path) -> Result<SheetConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(SheetConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: SheetConfig = toml::from_str(&content)?;
    Ok(config)
}

/// A fully documented `sheet.toml` with stock defaults, for `gen-config`.
pub fn stock_config_toml() -> String {
    format!(
        "\
# proofsheet configuration
#
# Place this file in the image directory as `{CONFIG_FILE}`. All options are
# optional; the values below are the defaults. CLI flags override this file.

# Grid shape: columns x rows of images per page.
images_per_row = 4
images_per_column = 5

# Breathing room inside each cell, in points. Images shrink to fit the cell
# minus this padding, keeping their aspect ratio; they are never enlarged.
image_padding = 10.0

# Page size in points. Default is ISO A4 ({A4_WIDTH} x {A4_HEIGHT}).
# US Letter would be 612.0 x 792.0.
page_width = {A4_WIDTH}
page_height = {A4_HEIGHT}

# Margin around the whole grid, in points.
margin = 20.0

# Caption each image with its filename (extension stripped).
print_titles = true
"
    )
}
