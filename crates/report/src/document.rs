//! Finished report documents and their warnings

use pdf_core::{DrawOp, PageSize, PdfDocument, PdfError, TextOp};
use std::fmt;
use thiserror::Error;

/// Where an image was supposed to appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    LeftLogo,
    RightLogo,
    MotorPhoto,
    SerialPhoto,
    /// The request for the inspection's photo list
    ImageList,
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageSlot::LeftLogo => "left logo",
            ImageSlot::RightLogo => "right logo",
            ImageSlot::MotorPhoto => "motor photo",
            ImageSlot::SerialPhoto => "serial photo",
            ImageSlot::ImageList => "image list",
        };
        f.write_str(name)
    }
}

/// A problem that did not stop the report from being built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportWarning {
    #[error("Image unavailable for {slot}: {reason}")]
    ImageFetchFailed { slot: ImageSlot, reason: String },
}

impl ReportWarning {
    pub(crate) fn image(slot: ImageSlot, reason: impl ToString) -> Self {
        ReportWarning::ImageFetchFailed {
            slot,
            reason: reason.to_string(),
        }
    }
}

/// A laid-out, single-page report
///
/// Read-only once built: drawing happens inside the renderer only.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pdf: PdfDocument,
    warnings: Vec<ReportWarning>,
    basename: String,
}

impl RenderedDocument {
    pub(crate) fn new(pdf: PdfDocument, warnings: Vec<ReportWarning>, basename: String) -> Self {
        Self {
            pdf,
            warnings,
            basename,
        }
    }

    /// Page dimensions in millimetres
    pub fn page_size(&self) -> PageSize {
        self.pdf.page_size()
    }

    /// Drawing operations in the order they were issued
    pub fn ops(&self) -> &[DrawOp] {
        self.pdf.ops()
    }

    /// Text operations in the order they were issued
    pub fn texts(&self) -> impl Iterator<Item = &TextOp> + '_ {
        self.pdf.texts()
    }

    /// First text operation with exactly this content
    pub fn find_text(&self, text: &str) -> Option<&TextOp> {
        self.texts().find(|op| op.text == text)
    }

    /// Non-fatal problems met while building
    pub fn warnings(&self) -> &[ReportWarning] {
        &self.warnings
    }

    /// Suggested file name, without extension
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Serialize to PDF bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, PdfError> {
        self.pdf.to_bytes()
    }
}

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuiltReport {
    pub document: RenderedDocument,
    pub warnings: Vec<ReportWarning>,
}

impl From<RenderedDocument> for BuiltReport {
    fn from(document: RenderedDocument) -> Self {
        let warnings = document.warnings().to_vec();
        Self { document, warnings }
    }
}
