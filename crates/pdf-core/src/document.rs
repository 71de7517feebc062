//! PDF Document wrapper

use crate::font::{encode_text_hex, BuiltinFont, FontWeight};
use crate::image::{
    calculate_scaled_dimensions, generate_image_operators, ImageScaleMode, ImageXObject,
};
use crate::text::{
    align_offset, generate_line_operators, generate_text_operators, split_text_to_size,
    TextRenderContext,
};
use crate::{mm_to_pt, pt_to_mm, Align, PageSize, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Red color
    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// A text draw call, in millimetres from the top-left corner
///
/// `y` is the baseline. `x` is the anchor the alignment applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub align: Align,
    pub font: BuiltinFont,
    pub font_size: f32,
    pub color: Color,
}

/// A stroked line segment, in millimetres from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct LineOp {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
    pub color: Color,
}

/// An image placed with its top-left corner at (`x`, `y`)
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOp {
    /// Index into the document's deduplicated image list
    pub image: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    Line(LineOp),
    Image(ImageOp),
}

/// Single-page PDF canvas
///
/// Drawing calls are validated and recorded in order; nothing is encoded
/// until [`PdfDocument::to_bytes`] or [`PdfDocument::save`].
#[derive(Debug, Clone)]
pub struct PdfDocument {
    page_size: PageSize,
    /// Current font weight
    current_weight: FontWeight,
    /// Current font size in points
    current_font_size: f32,
    /// Current text color
    current_text_color: Color,
    /// Current stroke color
    current_draw_color: Color,
    /// Current line width in millimetres
    current_line_width: f64,
    /// Embedded images, deduplicated by content hash
    images: Vec<ImageXObject>,
    image_hashes: HashMap<u64, usize>,
    /// Recorded drawing operations
    ops: Vec<DrawOp>,
}

impl PdfDocument {
    /// Create an empty document with one blank page
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            current_weight: FontWeight::default(),
            current_font_size: 12.0,
            current_text_color: Color::default(),
            current_draw_color: Color::default(),
            current_line_width: 0.2,
            images: Vec::new(),
            image_hashes: HashMap::new(),
            ops: Vec::new(),
        }
    }

    /// Create an empty US Letter portrait document
    pub fn letter_portrait() -> Self {
        Self::new(PageSize::LETTER_PORTRAIT)
    }

    /// Page dimensions in millimetres
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Set the font size in points
    pub fn set_font_size(&mut self, size: f32) {
        self.current_font_size = size;
    }

    /// Current font size in points
    pub fn font_size(&self) -> f32 {
        self.current_font_size
    }

    /// Set the font weight (keeps the current size)
    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.current_weight = weight;
    }

    /// Font selected by the current weight
    pub fn current_font(&self) -> BuiltinFont {
        BuiltinFont::from_weight(self.current_weight)
    }

    /// Set the text color for subsequent text
    ///
    /// # Example
    /// ```ignore
    /// doc.set_text_color(Color::red());
    /// doc.set_text_color(Color::from_rgb(0, 51, 102));
    /// ```
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Current text color
    pub fn text_color(&self) -> Color {
        self.current_text_color
    }

    /// Set the stroke color for subsequent lines
    pub fn set_draw_color(&mut self, color: Color) {
        self.current_draw_color = color;
    }

    /// Set the stroke width in millimetres for subsequent lines
    pub fn set_line_width(&mut self, width: f64) {
        self.current_line_width = width;
    }

    /// Insert text at a position
    ///
    /// # Arguments
    /// * `text` - Text to insert (characters outside WinAnsi print as `?`)
    /// * `x` - Anchor X in millimetres
    /// * `y` - Baseline Y in millimetres (from top)
    /// * `align` - Which side of the text sits on the anchor
    pub fn insert_text(&mut self, text: &str, x: f64, y: f64, align: Align) -> Result<()> {
        check_finite(&[x, y], "text position")?;

        // Skip empty text - nothing to render
        if text.is_empty() {
            return Ok(());
        }

        self.ops.push(DrawOp::Text(TextOp {
            text: text.to_string(),
            x,
            y,
            align,
            font: self.current_font(),
            font_size: self.current_font_size,
            color: self.current_text_color,
        }));

        Ok(())
    }

    /// Width of `text` in millimetres with the current font and size
    pub fn get_text_width(&self, text: &str) -> f64 {
        pt_to_mm(
            self.current_font()
                .text_width_points(text, self.current_font_size),
        )
    }

    /// Split text into lines no wider than `max_width` millimetres
    ///
    /// Uses the current font and size for measurement.
    pub fn split_text_to_size(&self, text: &str, max_width: f64) -> Vec<String> {
        split_text_to_size(text, max_width, |s| self.get_text_width(s))
    }

    /// Draw a line segment between two points (millimetres, from top)
    pub fn insert_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        check_finite(&[x1, y1, x2, y2], "line endpoints")?;

        self.ops.push(DrawOp::Line(LineOp {
            x1,
            y1,
            x2,
            y2,
            width: self.current_line_width,
            color: self.current_draw_color,
        }));

        Ok(())
    }

    /// Insert an image stretched to a box
    ///
    /// # Arguments
    /// * `data` - Image file bytes (JPEG or PNG)
    /// * `x` - Left edge in millimetres
    /// * `y` - Top edge in millimetres (from top)
    /// * `width` - Box width in millimetres
    /// * `height` - Box height in millimetres
    pub fn insert_image(
        &mut self,
        data: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.insert_image_scaled(data, x, y, width, height, ImageScaleMode::Stretch)
    }

    /// Insert an image into a box with a scaling mode
    ///
    /// The image is decoded here, so a corrupt image fails this call and
    /// leaves the document untouched.
    pub fn insert_image_scaled(
        &mut self,
        data: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<()> {
        check_finite(&[x, y, width, height], "image box")?;

        let index = self.get_or_create_image(data)?;
        let image = &self.images[index];
        let (actual_width, actual_height) =
            calculate_scaled_dimensions(image.width, image.height, width, height, mode);

        self.ops.push(DrawOp::Image(ImageOp {
            image: index,
            x,
            y,
            width: actual_width,
            height: actual_height,
        }));

        Ok(())
    }

    /// Decode an image once per distinct content
    fn get_or_create_image(&mut self, data: &[u8]) -> Result<usize> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if let Some(&index) = self.image_hashes.get(&data_hash) {
            return Ok(index);
        }

        let xobject = ImageXObject::from_bytes(data)?;
        self.images.push(xobject);
        let index = self.images.len() - 1;
        self.image_hashes.insert(data_hash, index);

        Ok(index)
    }

    /// All recorded operations in drawing order
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Recorded text operations in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &TextOp> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(text) => Some(text),
            _ => None,
        })
    }

    /// Number of distinct embedded images
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize the document to PDF bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.build_document();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Assemble the lopdf object graph: catalog, one page, resources, content
    fn build_document(&self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut resources = Dictionary::new();

        let mut fonts = Dictionary::new();
        let mut has_fonts = false;
        for font in [BuiltinFont::Helvetica, BuiltinFont::HelveticaBold] {
            if self.texts().any(|op| op.font == font) {
                let font_id = doc.add_object(font.to_pdf_dictionary());
                fonts.set(font.resource_name(), Object::Reference(font_id));
                has_fonts = true;
            }
        }
        if has_fonts {
            resources.set("Font", Object::Dictionary(fonts));
        }

        if !self.images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (index, image) in self.images.iter().enumerate() {
                let image_id = doc.add_object(image.to_pdf_stream());
                xobjects.set(image_resource_name(index), Object::Reference(image_id));
            }
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let content_id = doc.add_object(Stream::new(Dictionary::new(), self.content_stream()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.page_size.width_pt() as f32),
                Object::Real(self.page_size.height_pt() as f32),
            ],
            "Resources" => resources,
            "Contents" => content_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc
    }

    /// Encode the recorded operations as a content stream
    ///
    /// Converts millimetres from the top-left corner into PDF points from the
    /// bottom-left corner.
    fn content_stream(&self) -> Vec<u8> {
        let page_height = self.page_size.height_pt();
        let mut content = Vec::new();

        for op in &self.ops {
            match op {
                DrawOp::Text(text) => {
                    let width = text.font.text_width_points(&text.text, text.font_size);
                    let x = mm_to_pt(text.x) + align_offset(width, text.align);
                    let y = page_height - mm_to_pt(text.y);
                    let ctx = TextRenderContext {
                        font_name: text.font.resource_name().to_string(),
                        font_size: text.font_size,
                        color: text.color,
                    };
                    content.extend(generate_text_operators(
                        &encode_text_hex(&text.text),
                        x,
                        y,
                        &ctx,
                    ));
                }
                DrawOp::Line(line) => {
                    content.extend(generate_line_operators(
                        mm_to_pt(line.x1),
                        page_height - mm_to_pt(line.y1),
                        mm_to_pt(line.x2),
                        page_height - mm_to_pt(line.y2),
                        mm_to_pt(line.width),
                        line.color,
                    ));
                }
                DrawOp::Image(image) => {
                    let height = mm_to_pt(image.height);
                    content.extend(generate_image_operators(
                        &image_resource_name(image.image),
                        mm_to_pt(image.x),
                        page_height - mm_to_pt(image.y) - height,
                        mm_to_pt(image.width),
                        height,
                    ));
                }
            }
        }

        content
    }
}

fn image_resource_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

fn check_finite(values: &[f64], what: &str) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PdfError::InvalidCoordinate(format!(
            "{what} is not finite: {values:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_document_is_empty() {
        let doc = PdfDocument::letter_portrait();
        assert_eq!(doc.page_size(), PageSize::LETTER_PORTRAIT);
        assert!(doc.ops().is_empty());
        assert_eq!(doc.image_count(), 0);
    }

    #[test]
    fn test_insert_text_records_state() {
        let mut doc = PdfDocument::letter_portrait();
        doc.set_font_size(10.0);
        doc.set_font_weight(FontWeight::Bold);
        doc.set_text_color(Color::red());
        doc.insert_text("1001", 170.0, 32.0, Align::Left).unwrap();

        assert_eq!(
            doc.ops(),
            &[DrawOp::Text(TextOp {
                text: "1001".to_string(),
                x: 170.0,
                y: 32.0,
                align: Align::Left,
                font: BuiltinFont::HelveticaBold,
                font_size: 10.0,
                color: Color::red(),
            })]
        );
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let mut doc = PdfDocument::letter_portrait();
        doc.insert_text("", 10.0, 10.0, Align::Left).unwrap();
        assert!(doc.ops().is_empty());
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let mut doc = PdfDocument::letter_portrait();
        let err = doc
            .insert_text("x", f64::NAN, 10.0, Align::Left)
            .unwrap_err();
        assert!(matches!(err, PdfError::InvalidCoordinate(_)));
        assert!(doc.insert_line(0.0, 0.0, f64::INFINITY, 0.0).is_err());
        assert!(doc.ops().is_empty());
    }

    #[test]
    fn test_text_width_in_millimetres() {
        let mut doc = PdfDocument::letter_portrait();
        doc.set_font_size(10.0);
        // 23.34pt
        assert!((doc.get_text_width("BIEN") - 8.2338).abs() < 0.001);
    }

    #[test]
    fn test_split_uses_current_font() {
        let mut doc = PdfDocument::letter_portrait();
        doc.set_font_size(10.0);
        let text = "uno dos tres cuatro cinco seis siete ocho nueve diez";
        let narrow = doc.split_text_to_size(text, 30.0);
        let wide = doc.split_text_to_size(text, 500.0);
        assert!(narrow.len() > 1);
        assert_eq!(wide.len(), 1);
        for line in &narrow {
            assert!(doc.get_text_width(line) <= 30.0);
        }
    }

    #[test]
    fn test_corrupt_image_leaves_document_untouched() {
        let mut doc = PdfDocument::letter_portrait();
        let result = doc.insert_image(b"definitely not an image", 10.0, 10.0, 20.0, 20.0);
        assert!(matches!(result, Err(PdfError::ImageError(_))));
        assert!(doc.ops().is_empty());
        assert_eq!(doc.image_count(), 0);
    }

    #[test]
    fn test_content_stream_flips_y_axis() {
        let mut doc = PdfDocument::letter_portrait();
        doc.set_font_size(12.0);
        doc.insert_text("A", 0.0, 0.0, Align::Left).unwrap();
        let content = String::from_utf8(doc.content_stream()).unwrap();
        assert!(content.contains("0 792 Td"));
    }

    #[test]
    fn test_to_bytes_produces_pdf() {
        let mut doc = PdfDocument::letter_portrait();
        doc.insert_text("Hola", 15.0, 40.0, Align::Left).unwrap();
        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }
}
