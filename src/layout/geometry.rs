//! Pure calculation functions for cell geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Coordinates follow PDF conventions: origin at the bottom-left of the
//! page, y increasing upward. A cell's anchor is its bottom-left corner.

use crate::config::SheetConfig;

/// Scale factor that fits an image into a `fit_w` x `fit_h` box while
/// preserving aspect ratio, shrinking only.
///
/// # Examples
/// ```
/// # use proofsheet::layout::geometry::fit_scale;
/// // 200x100 into an 80x80 box: width is the binding constraint
/// assert_eq!(fit_scale(200, 100, 80.0, 80.0), 0.4);
///
/// // already smaller than the box: keep intrinsic size
/// assert_eq!(fit_scale(40, 30, 80.0, 80.0), 1.0);
/// ```
pub fn fit_scale(width: u32, height: u32, fit_w: f64, fit_h: f64) -> f64 {
    let sx = fit_w / width as f64;
    let sy = fit_h / height as f64;
    sx.min(sy).min(1.0)
}

/// Offset that centers a span of `inner` inside a span of `outer`.
pub fn centered_offset(outer: f64, inner: f64) -> f64 {
    (outer - inner) / 2.0
}

/// Bottom-left anchor of the cell at zero-based `(col, row)`.
///
/// Rows count downward from the top of the drawable area, so row 0 is the
/// topmost band of cells.
pub fn cell_anchor(config: &SheetConfig, col: u32, row: u32) -> (f64, f64) {
    let (cell_w, cell_h) = config.cell_size();
    let x = config.margin + col as f64 * cell_w;
    let y = (config.page_height - config.margin - cell_h) - row as f64 * cell_h;
    (x, y)
}

/// One grid guide segment in page coordinates.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Cell-boundary guide lines for one page, derived purely from the config.
///
/// Vertical lines sit between columns (none at the page edges); horizontal
/// lines include both the top and bottom boundary of the grid, so a page
/// always carries `images_per_row - 1` vertical and `images_per_column + 1`
/// horizontal segments.
pub fn grid_segments(config: &SheetConfig) -> Vec<Segment> {
    let (cell_w, cell_h) = config.cell_size();
    let mut segments = Vec::new();

    for col in 1..config.images_per_row {
        let x = config.margin + col as f64 * cell_w;
        segments.push(Segment {
            x1: x,
            y1: config.page_height - config.margin,
            x2: x,
            y2: config.margin,
        });
    }

    for row in 0..=config.images_per_column {
        let y = (config.page_height - config.margin) - row as f64 * cell_h;
        segments.push(Segment {
            x1: config.margin,
            y1: y,
            x2: config.page_width - config.margin,
            y2: y,
        });
    }

    segments
}
