//! PDF backend built on `lopdf`.
//!
//! Pages are assembled as raw content streams: images become DCTDecode
//! XObjects (the codec hands over ready-to-embed JPEG bytes), captions are
//! set in the built-in Helvetica so no font file ships with the binary, and
//! guide lines use a `[1 3] 0` dash pattern reset to solid after each
//! stroke.
//!
//! Helvetica's metrics are not embedded either, so centered text uses an
//! approximate average glyph width. At caption sizes the error is a point or
//! two, invisible against a grid cell.

use super::{PageRenderer, RenderError};
use crate::imaging::ImageCodec;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;

/// Approximate character width ratio for Helvetica.
const HELVETICA_CHAR_WIDTH_RATIO: f64 = 0.5;

/// Stroke width for grid guide lines (points).
const GRID_LINE_WIDTH: f64 = 0.5;

/// Dash pattern for guide lines: 1pt on, 3pt off.
const DASH_ON: i64 = 1;
const DASH_OFF: i64 = 3;

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

/// [`PageRenderer`] writing a PDF through `lopdf`.
///
/// The codec is owned here because the embed request is a rendering detail:
/// the instruction stream carries only the source path and target size.
pub struct PdfRenderer<C> {
    codec: C,
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_width: f64,
    page_height: f64,
    /// Content operations of the page being assembled.
    ops: Vec<Operation>,
    /// XObject name → id for the page being assembled.
    page_images: Vec<(String, ObjectId)>,
    page_ids: Vec<ObjectId>,
    image_counter: usize,
}

impl<C: ImageCodec> PdfRenderer<C> {
    pub fn new(page_width: f64, page_height: f64, codec: C) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        Self {
            codec,
            doc,
            pages_id,
            font_id,
            page_width,
            page_height,
            ops: Vec::new(),
            page_images: Vec::new(),
            page_ids: Vec::new(),
            image_counter: 0,
        }
    }

    /// Turn the accumulated operations into a finished page object.
    fn flush_page(&mut self) -> Result<(), RenderError> {
        let content = Content {
            operations: std::mem::take(&mut self.ops),
        };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

        let mut xobjects = Dictionary::new();
        for (name, id) in self.page_images.drain(..) {
            xobjects.set(name, id);
        }
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                real(self.page_width),
                real(self.page_height),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => self.font_id },
                "XObject" => xobjects,
            },
        });
        self.page_ids.push(page_id);
        Ok(())
    }
}

impl<C: ImageCodec> PageRenderer for PdfRenderer<C> {
    fn place_image(
        &mut self,
        path: &Path,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError> {
        // Target size in pixels matches the draw size in points: ~72 dpi on
        // paper, plenty for a contact-sheet cell.
        let raster = self
            .codec
            .scaled_raster(path, width.round().max(1.0) as u32, height.round().max(1.0) as u32)?;

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => raster.width as i64,
                "Height" => raster.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            raster.jpeg,
        )
        .with_compression(false);
        let image_id = self.doc.add_object(stream);

        let name = format!("Im{}", self.image_counter);
        self.image_counter += 1;

        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![real(width), real(0.0), real(0.0), real(height), real(x), real(y)],
        ));
        self.ops.push(Operation::new(
            "Do",
            vec![Object::Name(name.clone().into_bytes())],
        ));
        self.ops.push(Operation::new("Q", vec![]));
        self.page_images.push((name, image_id));
        Ok(())
    }

    fn draw_text_centered(
        &mut self,
        center_x: f64,
        baseline_y: f64,
        text: &str,
        size: f64,
    ) -> Result<(), RenderError> {
        let text_width = text.chars().count() as f64 * size * HELVETICA_CHAR_WIDTH_RATIO;
        let x = center_x - text_width / 2.0;

        self.ops.push(Operation::new("BT", vec![]));
        self.ops
            .push(Operation::new("Tf", vec!["F1".into(), real(size)]));
        self.ops
            .push(Operation::new("Td", vec![real(x), real(baseline_y)]));
        self.ops
            .push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.ops.push(Operation::new("ET", vec![]));
        Ok(())
    }

    fn draw_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        dashed: bool,
    ) -> Result<(), RenderError> {
        if dashed {
            self.ops.push(Operation::new(
                "d",
                vec![vec![DASH_ON.into(), DASH_OFF.into()].into(), 0.into()],
            ));
        }
        self.ops
            .push(Operation::new("w", vec![real(GRID_LINE_WIDTH)]));
        self.ops.push(Operation::new("m", vec![real(x1), real(y1)]));
        self.ops.push(Operation::new("l", vec![real(x2), real(y2)]));
        self.ops.push(Operation::new("S", vec![]));
        if dashed {
            // back to solid for whatever draws next
            self.ops.push(Operation::new(
                "d",
                vec![Vec::<Object>::new().into(), 0.into()],
            ));
        }
        Ok(())
    }

    fn new_page(&mut self) -> Result<(), RenderError> {
        self.flush_page()
    }

    fn finish(&mut self, output: &Path) -> Result<(), RenderError> {
        self.flush_page()?;

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let count = self.page_ids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();
        self.doc
            .save(output)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustCodec;
    use image::RgbImage;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, image::Rgb([90, 120, 150]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn finished_document_loads_with_expected_page_count() {
        let tmp = TempDir::new().unwrap();
        let img = tmp.path().join("cell.png");
        write_png(&img, 64, 48);
        let out = tmp.path().join("out.pdf");

        let mut renderer = PdfRenderer::new(200.0, 300.0, RustCodec::new());
        renderer.place_image(&img, 10.0, 200.0, 64.0, 48.0).unwrap();
        renderer
            .draw_text_centered(100.0, 190.0, "cell", 8.0)
            .unwrap();
        renderer.draw_line(20.0, 20.0, 180.0, 20.0, true).unwrap();
        renderer.new_page().unwrap();
        renderer.draw_line(20.0, 280.0, 180.0, 280.0, false).unwrap();
        renderer.finish(&out).unwrap();

        let doc = Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn missing_image_is_a_recoverable_embed_error() {
        let mut renderer = PdfRenderer::new(200.0, 300.0, RustCodec::new());
        let err = renderer
            .place_image(Path::new("/nonexistent.png"), 0.0, 0.0, 10.0, 10.0)
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn media_box_carries_the_configured_page_size() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("size.pdf");

        let mut renderer = PdfRenderer::new(595.0, 842.0, RustCodec::new());
        renderer.draw_line(0.0, 0.0, 1.0, 1.0, false).unwrap();
        renderer.finish(&out).unwrap();

        let doc = Document::load(&out).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_float().unwrap(), 595.0);
        assert_eq!(media_box[3].as_float().unwrap(), 842.0);
    }
}
