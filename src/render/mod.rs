//! Page renderer trait and shared types.
//!
//! The [`PageRenderer`] trait is the sink the instruction stream drains
//! into: place an image, draw a centered caption, draw a guide line, start a
//! new page, write the finished document. The layout engine never sees this
//! trait — [`crate::compose`] walks the instruction stream and calls the
//! sink, so layout logic stays testable without a PDF writer in sight.
//!
//! The production implementation is [`PdfRenderer`](pdf::PdfRenderer).

pub mod pdf;

use crate::imaging::CodecError;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Embed failed: {0}")]
    Embed(#[from] CodecError),
}

impl RenderError {
    /// Whether the error spoils only one image rather than the document.
    ///
    /// Embed failures are recoverable: the cell is left blank and the run
    /// continues. IO and PDF-structure errors abort.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RenderError::Embed(_))
    }
}

/// Drawing-instruction sink producing the final paginated document.
///
/// Calls arrive in drawing order. The first page is implicit; `new_page`
/// closes the current page and starts the next. `finish` closes the last
/// page and writes the document — callers never invoke it when nothing was
/// drawn.
pub trait PageRenderer {
    /// Embed the image at `path`, bottom-left corner `(x, y)`, drawn at
    /// `width` x `height` points.
    fn place_image(
        &mut self,
        path: &Path,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError>;

    /// Draw `text` horizontally centered on `center_x` with its baseline at
    /// `baseline_y`.
    fn draw_text_centered(
        &mut self,
        center_x: f64,
        baseline_y: f64,
        text: &str,
        size: f64,
    ) -> Result<(), RenderError>;

    /// Draw a line segment, dashed when `dashed` is set.
    fn draw_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        dashed: bool,
    ) -> Result<(), RenderError>;

    /// Close the current page and start the next one.
    fn new_page(&mut self) -> Result<(), RenderError>;

    /// Close the last page and write the document to `output`.
    fn finish(&mut self, output: &Path) -> Result<(), RenderError>;
}
