//! Driving the instruction stream into a page renderer.
//!
//! Stage 3 of the proofsheet pipeline. [`compose`] walks the drawing
//! instructions produced by [`crate::layout`] and calls the
//! [`PageRenderer`] sink, then finishes the document.
//!
//! An embed failure (the source file vanished or rotted between scan and
//! render) is contained to its own cell: the placement is dropped, its
//! caption is suppressed, the failure lands in the summary, and the run
//! continues. Everything else aborts the render.

use crate::layout::Instruction;
use crate::render::{PageRenderer, RenderError};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// What a render run did, for the CLI summary.
#[derive(Debug, Default)]
pub struct Summary {
    /// Pages written to the document.
    pub pages: usize,
    /// Images embedded successfully.
    pub placed: usize,
    /// Captions drawn.
    pub captions: usize,
    /// Per-image embed failures, `(path, reason)`.
    pub failed_embeds: Vec<(String, String)>,
}

/// Drain `instructions` into `renderer` and write the document to `output`.
///
/// With no instructions there is nothing to draw: the renderer is left
/// untouched and no file is written.
pub fn compose<I>(
    instructions: I,
    renderer: &mut dyn PageRenderer,
    output: &Path,
) -> Result<Summary, ComposeError>
where
    I: IntoIterator<Item = Instruction>,
{
    let mut summary = Summary::default();
    let mut drew_anything = false;
    // Set when the preceding placement failed to embed, so its caption is
    // suppressed too.
    let mut skip_caption = false;

    for instruction in instructions {
        match instruction {
            Instruction::PlaceImage(placement) => {
                skip_caption = false;
                drew_anything = true;
                match renderer.place_image(
                    Path::new(&placement.path),
                    placement.x,
                    placement.y,
                    placement.width,
                    placement.height,
                ) {
                    Ok(()) => summary.placed += 1,
                    Err(err) if err.is_recoverable() => {
                        summary
                            .failed_embeds
                            .push((placement.path.clone(), err.to_string()));
                        skip_caption = true;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Instruction::DrawCaption(caption) => {
                if skip_caption {
                    skip_caption = false;
                    continue;
                }
                renderer.draw_text_centered(
                    caption.center_x,
                    caption.baseline_y,
                    &caption.text,
                    caption.size,
                )?;
                summary.captions += 1;
            }
            Instruction::DrawGrid(grid) => {
                skip_caption = false;
                drew_anything = true;
                for s in &grid.segments {
                    renderer.draw_line(s.x1, s.y1, s.x2, s.y2, grid.dashed)?;
                }
            }
            Instruction::PageBreak => {
                skip_caption = false;
                summary.pages += 1;
                renderer.new_page()?;
            }
        }
    }

    if drew_anything {
        summary.pages += 1; // the implicit final page
        renderer.finish(output)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetConfig;
    use crate::layout;
    use crate::render::tests::{RecordedOp, RecordingRenderer};
    use crate::scan::ImageEntry;
    use std::path::PathBuf;

    fn test_config() -> SheetConfig {
        SheetConfig {
            images_per_row: 2,
            images_per_column: 2,
            image_padding: 5.0,
            page_width: 200.0,
            page_height: 200.0,
            margin: 10.0,
            print_titles: true,
        }
    }

    fn entries(n: usize) -> Vec<ImageEntry> {
        (1..=n)
            .map(|i| ImageEntry {
                path: format!("/shots/img{i}.png"),
                filename: format!("img{i}.png"),
                label: format!("img{i}"),
                width: 100,
                height: 80,
            })
            .collect()
    }

    #[test]
    fn empty_stream_touches_nothing() {
        let mut renderer = RecordingRenderer::new();
        let summary = compose(vec![], &mut renderer, Path::new("out.pdf")).unwrap();

        assert_eq!(summary.pages, 0);
        assert_eq!(summary.placed, 0);
        assert!(renderer.ops.is_empty());
    }

    #[test]
    fn full_run_places_captions_grids_and_finishes() {
        let config = test_config();
        let plan = layout::plan(&entries(5), &config);
        let mut renderer = RecordingRenderer::new();
        let out = PathBuf::from("sheet.pdf");
        let summary = compose(plan, &mut renderer, &out).unwrap();

        assert_eq!(summary.pages, 2); // 5 images on a 2x2 grid
        assert_eq!(summary.placed, 5);
        assert_eq!(summary.captions, 5);
        assert!(summary.failed_embeds.is_empty());
        assert_eq!(renderer.new_page_count(), 1);
        assert_eq!(*renderer.ops.last().unwrap(), RecordedOp::Finish(out));
    }

    #[test]
    fn grid_lines_reach_the_renderer_dashed() {
        let config = test_config();
        let plan = layout::plan(&entries(1), &config);
        let mut renderer = RecordingRenderer::new();
        compose(plan, &mut renderer, Path::new("out.pdf")).unwrap();

        let lines: Vec<_> = renderer
            .ops
            .iter()
            .filter(|op| matches!(op, RecordedOp::Line { .. }))
            .collect();
        // 2x2 grid: 1 vertical + 3 horizontal
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|op| matches!(
            op,
            RecordedOp::Line { dashed: true, .. }
        )));
    }

    #[test]
    fn embed_failure_skips_cell_and_caption_but_continues() {
        let config = test_config();
        let plan = layout::plan(&entries(3), &config);
        let mut renderer = RecordingRenderer::failing_on("img2.png");
        let summary = compose(plan, &mut renderer, Path::new("out.pdf")).unwrap();

        assert_eq!(summary.placed, 2);
        assert_eq!(summary.captions, 2);
        assert_eq!(summary.failed_embeds.len(), 1);
        assert!(summary.failed_embeds[0].0.ends_with("img2.png"));
        // the failed image's caption never reached the renderer
        let texts: Vec<&str> = renderer
            .ops
            .iter()
            .filter_map(|op| match op {
                RecordedOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["img1", "img3"]);
        // the document still finished
        assert!(matches!(
            renderer.ops.last().unwrap(),
            RecordedOp::Finish(_)
        ));
    }

    #[test]
    fn instruction_order_is_preserved() {
        let config = test_config();
        let plan = layout::plan(&entries(4), &config);
        let mut renderer = RecordingRenderer::new();
        compose(plan, &mut renderer, Path::new("out.pdf")).unwrap();

        // exactly-filled single page: images+captions, then grid, then finish
        let kinds: Vec<&str> = renderer
            .ops
            .iter()
            .map(|op| match op {
                RecordedOp::Image { .. } => "image",
                RecordedOp::Text { .. } => "text",
                RecordedOp::Line { .. } => "line",
                RecordedOp::NewPage => "break",
                RecordedOp::Finish(_) => "finish",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "image", "text", "image", "text", "image", "text", "image", "text", "line",
                "line", "line", "line", "finish",
            ]
        );
    }
}
