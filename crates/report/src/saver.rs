//! Persisting finished reports

use crate::config::ReportConfig;
use crate::document::RenderedDocument;
use std::path::PathBuf;
use tracing::{error, info};

/// What happened to a save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to this path
    Saved(PathBuf),
    /// Handed to the browser as a download
    Downloaded,
    /// Not saved; the reason has already been logged
    Failed(String),
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, SaveOutcome::Failed(_))
    }
}

/// Destination for finished reports
///
/// Saving never returns an error: failures are logged and reported as
/// [`SaveOutcome::Failed`].
pub trait DocumentSaver {
    /// Save `document` as `<basename>.pdf`
    fn save(&self, document: &RenderedDocument, basename: &str) -> SaveOutcome;
}

/// Writes reports into a directory
#[derive(Debug, Clone)]
pub struct FileSaver {
    output_dir: PathBuf,
}

impl FileSaver {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.output_dir.clone())
    }

    /// Path a report with this basename is written to
    pub fn path_for(&self, basename: &str) -> PathBuf {
        let name: String = basename
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.output_dir.join(format!("{name}.pdf"))
    }
}

impl DocumentSaver for FileSaver {
    fn save(&self, document: &RenderedDocument, basename: &str) -> SaveOutcome {
        let path = self.path_for(basename);

        let bytes = match document.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to serialize report");
                return SaveOutcome::Failed(e.to_string());
            }
        };

        if let Err(e) = std::fs::create_dir_all(&self.output_dir) {
            error!(dir = %self.output_dir.display(), error = %e, "failed to create output directory");
            return SaveOutcome::Failed(e.to_string());
        }

        match std::fs::write(&path, &bytes) {
            Ok(()) => {
                info!(path = %path.display(), bytes = bytes.len(), "report saved");
                SaveOutcome::Saved(path)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to write report");
                SaveOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ReportAssets, ReportRenderer};
    use inspection::InspectionRecord;

    fn document() -> RenderedDocument {
        ReportRenderer::new(ReportAssets::default(), ReportConfig::default())
            .render(&InspectionRecord::default(), &[])
            .unwrap()
            .document
    }

    #[test]
    fn test_path_for_appends_extension() {
        let saver = FileSaver::new("/tmp/reports");
        assert_eq!(
            saver.path_for("revista_vehicular_1"),
            PathBuf::from("/tmp/reports/revista_vehicular_1.pdf")
        );
        assert_eq!(
            saver.path_for("../x"),
            PathBuf::from("/tmp/reports/.._x.pdf")
        );
    }

    #[test]
    fn test_save_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let saver = FileSaver::new(dir.path().join("nested"));

        let outcome = saver.save(&document(), "reporte");
        let expected = dir.path().join("nested").join("reporte.pdf");
        assert_eq!(outcome, SaveOutcome::Saved(expected.clone()));

        let bytes = std::fs::read(expected).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_save_failure_is_an_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        // A regular file where the output directory should be
        let saver = FileSaver::new(&blocker);
        let outcome = saver.save(&document(), "reporte");
        assert!(matches!(outcome, SaveOutcome::Failed(_)));
        assert!(!outcome.is_success());
    }
}
