//! Report - Revista Vehicular inspection report generator
//!
//! This crate provides:
//! - The fixed US Letter layout of the inspection form
//! - The physical-mechanical checklist table
//! - Report building from an [`InspectionRecordService`] or from a record
//!   already in hand
//! - Saving finished reports to disk
//!
//! # Example
//!
//! ```ignore
//! use report::{DocumentSaver, FileSaver, ReportAssets, ReportBuilder, ReportConfig};
//!
//! let config = ReportConfig::from_file("report.json")?;
//! let builder = ReportBuilder::new(service, ReportAssets::load(&config), config.clone());
//! let report = builder.build_inspection_report("1001").await?;
//! let outcome = FileSaver::from_config(&config).save(&report.document, report.document.basename());
//! ```

mod builder;
mod checklist;
mod config;
mod document;
mod layout;
mod renderer;
mod saver;

pub use builder::ReportBuilder;
pub use checklist::{checklist_entries, checklist_rows, ChecklistItem, CHECKLIST, CHECKLIST_COLUMNS};
pub use config::{Asset, ReportAssets, ReportConfig};
pub use document::{BuiltReport, ImageSlot, RenderedDocument, ReportWarning};
pub use layout::{Cursor, LayoutConstants};
pub use renderer::{report_basename, ReportRenderer};
pub use saver::{DocumentSaver, FileSaver, SaveOutcome};

pub use inspection::{InspectionImage, InspectionRecord, InspectionRecordService};

use inspection::ServiceError;
use pdf_core::PdfError;
use thiserror::Error;

/// Errors that stop a report from being built
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Inspection identifier is required")]
    MissingIdentifier,

    #[error("Inspection record not found: {0}")]
    RecordNotFound(String),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Failed to render report: {0}")]
    RenderFailed(#[from] PdfError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
