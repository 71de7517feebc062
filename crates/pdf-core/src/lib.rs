//! PDF Core - Single-page PDF drawing primitives
//!
//! This crate provides functionality for:
//! - Creating a blank page in a fixed physical format (millimetre units)
//! - Drawing text with the built-in Helvetica fonts
//! - Drawing lines and embedding images (JPEG, PNG)
//! - Measuring and splitting text to a maximum width
//! - Serializing the page to PDF bytes
//!
//! Every drawing call is recorded as a [`DrawOp`] so the document can be
//! inspected before it is serialized.
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, Color, FontWeight, PageSize, PdfDocument};
//!
//! let mut doc = PdfDocument::new(PageSize::LETTER_PORTRAIT);
//! doc.set_font_weight(FontWeight::Bold);
//! doc.set_font_size(10.0);
//! doc.insert_text("No:", 160.0, 32.0, Align::Left)?;
//! doc.set_text_color(Color::red());
//! doc.insert_text("1001", 170.0, 32.0, Align::Left)?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod image;
mod text;

pub use document::{Color, DrawOp, ImageOp, LineOp, PdfDocument, TextOp};
pub use font::{BuiltinFont, FontWeight};
pub use image::{calculate_scaled_dimensions, detect_format, ImageFormat, ImageScaleMode};
pub use text::{generate_line_operators, generate_text_operators, split_text_to_size};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Page dimensions in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// US Letter, portrait (8.5 x 11 in)
    pub const LETTER_PORTRAIT: PageSize = PageSize {
        width: 215.9,
        height: 279.4,
    };

    /// Width in PDF points
    pub fn width_pt(&self) -> f64 {
        mm_to_pt(self.width)
    }

    /// Height in PDF points
    pub fn height_pt(&self) -> f64 {
        mm_to_pt(self.height)
    }
}

/// Convert millimetres to PDF points (1/72 in)
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * 72.0 / 25.4
}

/// Convert PDF points to millimetres
pub fn pt_to_mm(pt: f64) -> f64 {
    pt * 25.4 / 72.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_letter_in_points() {
        let page = PageSize::LETTER_PORTRAIT;
        assert!((page.width_pt() - 612.0).abs() < 0.01);
        assert!((page.height_pt() - 792.0).abs() < 0.01);
    }

    #[test]
    fn test_unit_conversion_roundtrip() {
        let mm = 123.45;
        assert!((pt_to_mm(mm_to_pt(mm)) - mm).abs() < 1e-9);
    }
}
