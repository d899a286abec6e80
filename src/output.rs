//! CLI output formatting for all pipeline stages.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ## Scan
//!
//! ```text
//! Images (3)
//! 001 img1 (640x480)
//!     Source: img1.png
//! ...
//! Skipped (1)
//!     broken.png: Decode failed: ...
//! ```
//!
//! ## Plan
//!
//! ```text
//! Plan: 23 images over 2 pages (4x5 grid)
//!     Page 1: 20 images
//!     Page 2: 3 images
//! ```
//!
//! ## Render
//!
//! ```text
//! Wrote sheet.pdf: 2 pages, 23 images, 23 captions
//! ```

use crate::compose::Summary;
use crate::layout::{self, Instruction};
use crate::scan::Manifest;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// The diagnostic for a source directory with nothing to lay out.
pub fn no_images_line(source: &Path) -> String {
    format!("No images found in {}", source.display())
}

pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    if manifest.entries.is_empty() {
        lines.push(no_images_line(Path::new(&manifest.source)));
    } else {
        lines.push(format!("Images ({})", manifest.entries.len()));
        for (i, entry) in manifest.entries.iter().enumerate() {
            lines.push(format!(
                "{} {} ({}x{})",
                format_index(i + 1),
                entry.label,
                entry.width,
                entry.height
            ));
            lines.push(format!("    Source: {}", entry.filename));
        }
    }

    if !manifest.skipped.is_empty() {
        lines.push(format!("Skipped ({})", manifest.skipped.len()));
        for skipped in &manifest.skipped {
            let name = Path::new(&skipped.path)
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| skipped.path.clone());
            lines.push(format!("    {}: {}", name, skipped.reason));
        }
    }

    lines
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

pub fn format_plan_output(plan: &[Instruction], per_row: u32, per_column: u32) -> Vec<String> {
    let pages = layout::page_count(plan);
    let placements: Vec<usize> = plan
        .iter()
        .filter_map(|i| match i {
            Instruction::PlaceImage(p) => Some(p.page),
            _ => None,
        })
        .collect();

    if placements.is_empty() {
        return vec!["Plan: nothing to lay out".to_string()];
    }

    let mut lines = vec![format!(
        "Plan: {} images over {} page{} ({}x{} grid)",
        placements.len(),
        pages,
        if pages == 1 { "" } else { "s" },
        per_row,
        per_column,
    )];
    for page in 0..pages {
        let on_page = placements.iter().filter(|&&p| p == page).count();
        lines.push(format!("    Page {}: {} images", page + 1, on_page));
    }
    lines
}

pub fn print_plan_output(plan: &[Instruction], per_row: u32, per_column: u32) {
    for line in format_plan_output(plan, per_row, per_column) {
        println!("{}", line);
    }
}

pub fn format_render_output(summary: &Summary, output: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Wrote {}: {} page{}, {} image{}, {} caption{}",
        output.display(),
        summary.pages,
        if summary.pages == 1 { "" } else { "s" },
        summary.placed,
        if summary.placed == 1 { "" } else { "s" },
        summary.captions,
        if summary.captions == 1 { "" } else { "s" },
    )];
    for (path, reason) in &summary.failed_embeds {
        lines.push(format!("    Skipped {}: {}", path, reason));
    }
    lines
}

pub fn print_render_output(summary: &Summary, output: &Path) {
    for line in format_render_output(summary, output) {
        println!("{}", line);
    }
}
