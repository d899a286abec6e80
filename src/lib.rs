//! # Proofsheet
//!
//! Turn a directory of images into a paginated contact-sheet PDF: a fixed
//! grid of cells per page, each image shrunk to fit its cell and centered,
//! optionally captioned with its filename, with dotted guide lines marking
//! the cell boundaries for cutting or review.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Proofsheet processes images through three independent stages, each
//! producing a JSON artifact the next stage consumes:
//!
//! ```text
//! 1. Scan     <dir>     →  manifest.json   (directory → ordered entries + dims)
//! 2. Plan     manifest  →  plan.json       (pure layout → instruction stream)
//! 3. Render   plan      →  sheet.pdf       (instruction stream → PDF)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: each intermediate is human-readable JSON you can
//!   inspect — every placement's page, position, and size is right there.
//! - **Testability**: the plan stage is a pure function from entries to
//!   instructions, so unit tests exercise the layout math without touching
//!   the filesystem or a PDF writer.
//! - **Determinism**: identical inputs produce byte-identical plans; the
//!   only ordering contract is the natural filename sort from the scan.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — lists the directory, probes dimensions, produces the manifest |
//! | [`layout`] | Stage 2 — the core: turns entries + config into the drawing-instruction stream |
//! | [`compose`] | Stage 3 — drains the instruction stream into a page renderer |
//! | [`render`] | `PageRenderer` trait + the `lopdf` PDF backend |
//! | [`imaging`] | `ImageCodec` trait + the `image`-crate codec (identify, scale, JPEG) |
//! | [`config`] | `sheet.toml` loading, validation, stock config generation |
//! | [`naming`] | Natural filename ordering and caption labels |
//! | [`output`] | CLI output formatting — pure formatters per stage |
//!
//! # Design Decisions
//!
//! ## Natural Ordering
//!
//! Downloaded image sets almost always number their files without zero
//! padding, so a lexicographic directory listing interleaves them
//! (`img1, img10, img11, ... img2`). The scanner orders by natural
//! comparison instead — digit runs compare by value — which matches both
//! human expectation and the upstream page order the images came from.
//!
//! ## Shrink-Only Scaling
//!
//! Cells are small; blowing a tiny raster up to fill one would only
//! advertise its compression artifacts. Images scale down to the padded
//! cell, never up, and keep their aspect ratio exactly.
//!
//! ## Built-In Helvetica, No Font Files
//!
//! Captions use the PDF standard 14 Helvetica. Nothing is embedded, so the
//! binary ships no font assets and the output stays tiny. The cost is
//! metric-free centering (an average-width approximation), which at caption
//! sizes is off by at most a point or two.
//!
//! ## JPEG XObjects via DCTDecode
//!
//! The codec hands the renderer ready-to-embed JPEG bytes and the renderer
//! stores them as-is with a `DCTDecode` filter — no raw-pixel streams to
//! deflate, no recompression pass, and the embedded raster is pre-scaled to
//! its cell so a 500-image sheet stays a reasonably sized file.

pub mod compose;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
