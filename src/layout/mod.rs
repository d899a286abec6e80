//! Grid layout engine.
//!
//! Stage 2 of the proofsheet pipeline, and the only part with real logic in
//! it: transform a natural-sorted list of image entries plus a
//! [`SheetConfig`] into an ordered stream of drawing instructions for a page
//! renderer.
//!
//! ## The instruction stream
//!
//! Instructions come out in drawing order, one pass, no restarts:
//!
//! ```text
//! PlaceImage(img1) DrawCaption(img1) PlaceImage(img2) ... DrawGrid(page 0)
//! PageBreak PlaceImage(img21) ... DrawGrid(page 1)
//! ```
//!
//! Every image lands in the next free cell, scaled to fit the cell minus
//! padding (shrink only, aspect preserved) and centered. When a page fills
//! and more images remain, the page's guide lines are emitted followed by a
//! page break. A partially-filled final page still gets its full guide-line
//! set; a page that fills exactly on the last image gets them exactly once.
//! Whether lines have been emitted for the current page is tracked with an
//! explicit flag rather than recomputed from the image index, so the two
//! emission sites cannot double-fire.
//!
//! The engine does no I/O and holds no state beyond its cursor; identical
//! inputs produce identical streams.

pub mod geometry;

use crate::config::SheetConfig;
use crate::scan::ImageEntry;
use geometry::{Segment, cell_anchor, centered_offset, fit_scale, grid_segments};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::iter::Peekable;

/// Caption font size in points.
pub const CAPTION_SIZE: f64 = 8.0;
/// Distance from the image's bottom edge down to the caption baseline.
pub const CAPTION_GAP: f64 = 15.0;

/// Computed position and size for one image within its cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Zero-based page the image lands on.
    pub page: usize,
    /// Source file, carried through for the renderer's embed request.
    pub path: String,
    /// Caption text (filename stem).
    pub label: String,
    /// Bottom-left corner of the scaled image on the page.
    pub x: f64,
    pub y: f64,
    /// Scaled draw size, aspect ratio preserved, never above intrinsic.
    pub width: f64,
    pub height: f64,
    /// Bottom-left anchor of the grid cell, the caption's reference point.
    pub cell_x: f64,
    pub cell_y: f64,
}

/// A caption centered under one placed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub page: usize,
    pub text: String,
    /// Horizontal center of the cell.
    pub center_x: f64,
    /// Text baseline, a fixed gap below the image's bottom edge.
    pub baseline_y: f64,
    pub size: f64,
}

/// Cell-boundary guide lines for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLines {
    pub page: usize,
    pub segments: Vec<Segment>,
    /// Cosmetic style flag; the geometry is identical either way.
    pub dashed: bool,
}

/// One drawing instruction for the page renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    PlaceImage(Placement),
    DrawCaption(Caption),
    DrawGrid(GridLines),
    PageBreak,
}

/// Serialized artifact of the plan stage: the instruction stream plus the
/// config that produced it (the render stage needs the page size, and
/// keeping them together makes a plan self-contained).
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanFile {
    pub config: SheetConfig,
    pub instructions: Vec<Instruction>,
}

/// Lazily yields the instruction stream for `entries` laid out under
/// `config`.
///
/// The config must have passed [`SheetConfig::validate`]; geometry is not
/// re-checked here.
pub fn instructions<'a>(
    entries: &'a [ImageEntry],
    config: &'a SheetConfig,
) -> InstructionStream<'a> {
    let (cell_w, cell_h) = config.cell_size();
    InstructionStream {
        entries: entries.iter().peekable(),
        config,
        cell_w,
        cell_h,
        col: 0,
        row: 0,
        page: 0,
        placed_on_page: false,
        lines_emitted: false,
        queue: VecDeque::new(),
        done: false,
    }
}

/// Collect the full instruction stream, for the `plan` stage and tests.
pub fn plan(entries: &[ImageEntry], config: &SheetConfig) -> Vec<Instruction> {
    instructions(entries, config).collect()
}

/// Number of pages a plan draws on: page breaks plus one, zero when nothing
/// is placed.
pub fn page_count(plan: &[Instruction]) -> usize {
    if !plan
        .iter()
        .any(|i| matches!(i, Instruction::PlaceImage(_)))
    {
        return 0;
    }
    1 + plan
        .iter()
        .filter(|i| matches!(i, Instruction::PageBreak))
        .count()
}

/// Iterator over the instruction stream. See the module docs for the
/// emission order.
pub struct InstructionStream<'a> {
    entries: Peekable<std::slice::Iter<'a, ImageEntry>>,
    config: &'a SheetConfig,
    cell_w: f64,
    cell_h: f64,
    col: u32,
    row: u32,
    page: usize,
    placed_on_page: bool,
    lines_emitted: bool,
    queue: VecDeque<Instruction>,
    done: bool,
}

impl InstructionStream<'_> {
    fn place(&mut self, entry: &ImageEntry) {
        let fit_w = self.cell_w - self.config.image_padding;
        let fit_h = self.cell_h - self.config.image_padding;
        let scale = fit_scale(entry.width, entry.height, fit_w, fit_h);
        let draw_w = entry.width as f64 * scale;
        let draw_h = entry.height as f64 * scale;

        let x_offset = centered_offset(self.cell_w, draw_w);
        let y_offset = centered_offset(self.cell_h, draw_h);
        let (cell_x, cell_y) = cell_anchor(self.config, self.col, self.row);

        self.queue.push_back(Instruction::PlaceImage(Placement {
            page: self.page,
            path: entry.path.clone(),
            label: entry.label.clone(),
            x: cell_x + x_offset,
            y: cell_y + y_offset,
            width: draw_w,
            height: draw_h,
            cell_x,
            cell_y,
        }));

        if self.config.print_titles {
            self.queue.push_back(Instruction::DrawCaption(Caption {
                page: self.page,
                text: entry.label.clone(),
                center_x: cell_x + self.cell_w / 2.0,
                baseline_y: cell_y + y_offset - CAPTION_GAP,
                size: CAPTION_SIZE,
            }));
        }

        self.placed_on_page = true;
    }

    fn advance_cursor(&mut self) {
        self.col += 1;
        if self.col == self.config.images_per_row {
            self.col = 0;
            self.row += 1;
        }

        // Page filled. Close it out only if more images are coming; a page
        // that fills on the last image gets its guide lines from the
        // end-of-stream branch instead.
        if self.row == self.config.images_per_column && self.entries.peek().is_some() {
            self.queue.push_back(Instruction::DrawGrid(GridLines {
                page: self.page,
                segments: grid_segments(self.config),
                dashed: true,
            }));
            self.queue.push_back(Instruction::PageBreak);
            self.row = 0;
            self.page += 1;
            self.placed_on_page = false;
            self.lines_emitted = false;
        }
    }

    fn finish_stream(&mut self) {
        self.done = true;
        if self.placed_on_page && !self.lines_emitted {
            self.lines_emitted = true;
            self.queue.push_back(Instruction::DrawGrid(GridLines {
                page: self.page,
                segments: grid_segments(self.config),
                dashed: true,
            }));
        }
    }
}

impl Iterator for InstructionStream<'_> {
    type Item = Instruction;

    fn next(&mut self) -> Option<Instruction> {
        loop {
            if let Some(instruction) = self.queue.pop_front() {
                return Some(instruction);
            }
            if self.done {
                return None;
            }
            match self.entries.next() {
                Some(entry) => {
                    self.place(entry);
                    self.advance_cursor();
                }
                None => self.finish_stream(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SheetConfig {
        SheetConfig {
            images_per_row: 4,
            images_per_column: 5,
            image_padding: 10.0,
            page_width: 595.0,
            page_height: 842.0,
            margin: 20.0,
            print_titles: true,
        }
    }

    fn entries(n: usize) -> Vec<ImageEntry> {
        (1..=n)
            .map(|i| ImageEntry {
                path: format!("/shots/img{i}.png"),
                filename: format!("img{i}.png"),
                label: format!("img{i}"),
                width: 640,
                height: 480,
            })
            .collect()
    }

    fn placements(plan: &[Instruction]) -> Vec<&Placement> {
        plan.iter()
            .filter_map(|i| match i {
                Instruction::PlaceImage(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    fn breaks(plan: &[Instruction]) -> usize {
        plan.iter()
            .filter(|i| matches!(i, Instruction::PageBreak))
            .count()
    }

    fn grids(plan: &[Instruction]) -> Vec<&GridLines> {
        plan.iter()
            .filter_map(|i| match i {
                Instruction::DrawGrid(g) => Some(g),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_input_yields_no_instructions() {
        let plan = plan(&[], &test_config());
        assert!(plan.is_empty());
        assert_eq!(page_count(&plan), 0);
    }

    #[test]
    fn page_breaks_match_ceiling_division() {
        let config = test_config();
        let per_page = config.images_per_page();
        for n in [1, 5, 19, 20, 21, 40, 41, 100] {
            let plan = plan(&entries(n), &config);
            let expected = n.div_ceil(per_page) - 1;
            assert_eq!(breaks(&plan), expected, "n = {n}");
            assert_eq!(page_count(&plan), expected + 1, "n = {n}");
        }
    }

    #[test]
    fn one_grid_per_page_even_when_last_page_fills_exactly() {
        let config = test_config();
        for n in [20, 40] {
            let plan = plan(&entries(n), &config);
            let grids = grids(&plan);
            assert_eq!(grids.len(), n / config.images_per_page(), "n = {n}");
            for (page, grid) in grids.iter().enumerate() {
                assert_eq!(grid.page, page);
            }
        }
    }

    #[test]
    fn partial_final_page_still_gets_grid_lines() {
        let config = test_config();
        let plan = plan(&entries(23), &config);
        let grids = grids(&plan);
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[1].page, 1);
        // full horizontal set even though the last row is incomplete
        let horizontal = grids[1]
            .segments
            .iter()
            .filter(|s| s.y1 == s.y2)
            .count();
        assert_eq!(horizontal, config.images_per_column as usize + 1);
    }

    #[test]
    fn twenty_three_images_split_twenty_and_three() {
        let config = test_config();
        let plan = plan(&entries(23), &config);
        let placements = placements(&plan);
        assert_eq!(placements.len(), 23);
        assert_eq!(placements.iter().filter(|p| p.page == 0).count(), 20);
        assert_eq!(placements.iter().filter(|p| p.page == 1).count(), 3);
        assert_eq!(page_count(&plan), 2);
    }

    #[test]
    fn grid_lines_are_dashed() {
        let plan = plan(&entries(3), &test_config());
        assert!(grids(&plan).iter().all(|g| g.dashed));
    }

    #[test]
    fn images_fill_rows_before_columns() {
        let config = test_config();
        let plan = plan(&entries(6), &config);
        let placements = placements(&plan);
        let (cell_w, cell_h) = config.cell_size();

        // first four across the top row
        for (i, p) in placements[..4].iter().enumerate() {
            assert_eq!(p.cell_x, config.margin + i as f64 * cell_w);
            assert_eq!(p.cell_y, config.page_height - config.margin - cell_h);
        }
        // fifth wraps to the second row, first column
        assert_eq!(placements[4].cell_x, config.margin);
        let second_row_y = config.page_height - config.margin - 2.0 * cell_h;
        assert!((placements[4].cell_y - second_row_y).abs() < 1e-9);
    }

    #[test]
    fn large_images_shrink_to_padded_cell() {
        let config = test_config();
        let (cell_w, cell_h) = config.cell_size();
        let entry = ImageEntry {
            path: "/shots/huge.png".into(),
            filename: "huge.png".into(),
            label: "huge".into(),
            width: 4000,
            height: 3000,
        };
        let plan = plan(std::slice::from_ref(&entry), &config);
        let p = placements(&plan)[0];
        assert!(p.width <= cell_w - config.image_padding + 1e-9);
        assert!(p.height <= cell_h - config.image_padding + 1e-9);
        let aspect = p.width / p.height;
        assert!((aspect - 4000.0 / 3000.0).abs() < 1e-9);
    }

    #[test]
    fn small_images_keep_intrinsic_size_and_center() {
        let config = test_config();
        let (cell_w, cell_h) = config.cell_size();
        let entry = ImageEntry {
            path: "/shots/tiny.png".into(),
            filename: "tiny.png".into(),
            label: "tiny".into(),
            width: 50,
            height: 40,
        };
        let plan = plan(std::slice::from_ref(&entry), &config);
        let p = placements(&plan)[0];
        assert_eq!(p.width, 50.0);
        assert_eq!(p.height, 40.0);
        // centered: equal slack on both sides of the cell
        assert!((p.x - p.cell_x - (cell_w - 50.0) / 2.0).abs() < 1e-9);
        assert!((p.y - p.cell_y - (cell_h - 40.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn aspect_ratio_preserved_for_every_placement() {
        let config = test_config();
        let mut entries = entries(8);
        entries[2].width = 300;
        entries[2].height = 900;
        entries[5].width = 2000;
        entries[5].height = 500;
        let plan = plan(&entries, &config);
        for (p, e) in placements(&plan).iter().zip(&entries) {
            let drawn = p.width / p.height;
            let intrinsic = e.width as f64 / e.height as f64;
            assert!((drawn - intrinsic).abs() < 1e-9, "{}", e.filename);
        }
    }

    #[test]
    fn captions_follow_their_placement() {
        let config = test_config();
        let plan = plan(&entries(2), &config);
        let (cell_w, _) = config.cell_size();
        match (&plan[0], &plan[1]) {
            (Instruction::PlaceImage(p), Instruction::DrawCaption(c)) => {
                assert_eq!(c.text, p.label);
                assert_eq!(c.center_x, p.cell_x + cell_w / 2.0);
                assert_eq!(c.baseline_y, p.y - CAPTION_GAP);
                assert_eq!(c.size, CAPTION_SIZE);
            }
            other => panic!("unexpected stream head: {other:?}"),
        }
    }

    #[test]
    fn no_captions_when_titles_disabled() {
        let config = SheetConfig {
            print_titles: false,
            ..test_config()
        };
        let plan = plan(&entries(5), &config);
        assert!(
            !plan
                .iter()
                .any(|i| matches!(i, Instruction::DrawCaption(_)))
        );
    }

    #[test]
    fn identical_inputs_yield_identical_streams() {
        let config = test_config();
        let entries = entries(23);
        assert_eq!(plan(&entries, &config), plan(&entries, &config));
    }

    #[test]
    fn grid_precedes_break_between_pages() {
        let config = test_config();
        let plan = plan(&entries(21), &config);
        let grid_pos = plan
            .iter()
            .position(|i| matches!(i, Instruction::DrawGrid(_)))
            .unwrap();
        assert!(matches!(plan[grid_pos + 1], Instruction::PageBreak));
    }

    #[test]
    fn single_cell_grid_paginates_every_image() {
        let config = SheetConfig {
            images_per_row: 1,
            images_per_column: 1,
            image_padding: 10.0,
            ..test_config()
        };
        let plan = plan(&entries(3), &config);
        assert_eq!(breaks(&plan), 2);
        assert_eq!(grids(&plan).len(), 3);
    }
}
