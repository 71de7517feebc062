//! Report configuration and static assets

use crate::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Report settings
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Logo printed in the top-left corner
    pub left_logo: Option<PathBuf>,
    /// Logo printed in the top-right corner
    pub right_logo: Option<PathBuf>,
    /// Footer text: postal address, city and phone
    pub footer_lines: Vec<String>,
    /// Directory the file saver writes into
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            left_logo: None,
            right_logo: None,
            footer_lines: vec![
                "Domicilio de la oficina, Col. Centro, C.P. 00000".to_string(),
                "Chihuahua, Chih.".to_string(),
                "Tel. (000) 000 0000".to_string(),
            ],
            output_dir: PathBuf::from("."),
        }
    }
}

impl ReportConfig {
    /// Parse configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ReportError::Config(e.to_string()))
    }

    /// Read configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}

/// Image bytes for a fixed report slot
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Asset {
    /// No file configured for this slot
    #[default]
    NotConfigured,
    Loaded(Vec<u8>),
    /// A file was configured but could not be read
    Unavailable(String),
}

impl Asset {
    fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Asset::NotConfigured;
        };

        match std::fs::read(path) {
            Ok(bytes) => Asset::Loaded(bytes),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read logo");
                Asset::Unavailable(format!("{}: {e}", path.display()))
            }
        }
    }
}

/// Logos drawn in the report header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportAssets {
    pub left_logo: Asset,
    pub right_logo: Asset,
}

impl ReportAssets {
    /// Read the configured logos
    ///
    /// Never fails: unreadable files are kept as [`Asset::Unavailable`] and
    /// reported as warnings when the report is built.
    pub fn load(config: &ReportConfig) -> Self {
        Self {
            left_logo: Asset::load(config.left_logo.as_deref()),
            right_logo: Asset::load(config.right_logo.as_deref()),
        }
    }

    /// Use logo bytes already in memory
    pub fn from_bytes(left_logo: Option<Vec<u8>>, right_logo: Option<Vec<u8>>) -> Self {
        let asset = |bytes: Option<Vec<u8>>| bytes.map(Asset::Loaded).unwrap_or_default();
        Self {
            left_logo: asset(left_logo),
            right_logo: asset(right_logo),
        }
    }
}
