//! Inspection - Revista Vehicular records and their presentation rules
//!
//! This crate provides:
//! - The [`InspectionRecord`] and [`InspectionImage`] data model, deserialized
//!   from the backend's PascalCase JSON
//! - Value formatting for checklist flags, plain text and dates
//! - The [`InspectionRecordService`] seam and its HTTP implementation
//!   (feature `http`)
//! - Service configuration from defaults or the environment
//!
//! # Example
//!
//! ```ignore
//! use inspection::{format_inspection_flag, HttpInspectionService, ServiceConfig};
//!
//! let service = HttpInspectionService::new(ServiceConfig::from_env())?;
//! if let Some(record) = service.get_record("1001").await? {
//!     let paint = format_inspection_flag(record.pintura_carroceria_ver.as_ref());
//! }
//! ```

#[cfg(feature = "http")]
mod client;
mod config;
mod format;
mod record;
mod service;

#[cfg(feature = "http")]
pub use client::HttpInspectionService;
pub use config::ServiceConfig;
pub use format::{
    format_date, format_inspection_date, format_inspection_flag, format_text, InspectionFlag,
    NOT_AVAILABLE,
};
pub use record::{FieldValue, ImageKind, InspectionImage, InspectionRecord};
pub use service::{parse_images_payload, parse_record_payload, InspectionRecordService};

use thiserror::Error;

/// Errors that can occur while fetching or decoding inspection data
#[derive(Debug, Error)]
pub enum ServiceError {
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for inspection service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServiceError::InvalidPayload("expected a JSON object".to_string());
        assert_eq!(err.to_string(), "Invalid payload: expected a JSON object");

        let err = ServiceError::Config("bad url".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad url");
    }

    #[test]
    fn test_decode_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ServiceError = json_err.into();
        assert!(matches!(err, ServiceError::Decode(_)));
    }
}
