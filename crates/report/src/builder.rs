//! Fetch-then-render orchestration

use crate::config::{ReportAssets, ReportConfig};
use crate::document::{BuiltReport, ImageSlot, ReportWarning};
use crate::renderer::ReportRenderer;
use crate::{ReportError, Result};
use inspection::{InspectionImage, InspectionRecord, InspectionRecordService};
use tracing::{debug, info, warn};

/// Builds inspection reports from a record service
///
/// # Example
///
/// ```ignore
/// use report::{ReportAssets, ReportBuilder, ReportConfig};
/// use inspection::{HttpInspectionService, ServiceConfig};
///
/// let config = ReportConfig::default();
/// let service = HttpInspectionService::new(ServiceConfig::from_env())?;
/// let builder = ReportBuilder::new(service, ReportAssets::load(&config), config);
/// let report = builder.build_inspection_report("1001").await?;
/// ```
#[derive(Debug)]
pub struct ReportBuilder<S> {
    service: S,
    renderer: ReportRenderer,
}

impl<S: InspectionRecordService> ReportBuilder<S> {
    pub fn new(service: S, assets: ReportAssets, config: ReportConfig) -> Self {
        Self {
            service,
            renderer: ReportRenderer::new(assets, config),
        }
    }

    /// Underlying record service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Fetch an inspection and its photos, then lay out the report
    ///
    /// # Errors
    /// - [`ReportError::MissingIdentifier`] for a blank id, before any request
    /// - [`ReportError::RecordNotFound`] when the service has no such record
    /// - [`ReportError::Service`] when the record request fails
    /// - [`ReportError::RenderFailed`] when drawing fails
    ///
    /// A failed photo request only adds a warning.
    pub async fn build_inspection_report(&self, id: &str) -> Result<BuiltReport> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ReportError::MissingIdentifier);
        }

        debug!(id, "fetching inspection record");
        let record = self
            .service
            .get_record(id)
            .await?
            .ok_or_else(|| ReportError::RecordNotFound(id.to_string()))?;

        debug!(id, "fetching inspection images");
        let mut warnings = Vec::new();
        let images = match self.service.get_images(id).await {
            Ok(images) => images,
            Err(e) => {
                warn!(id, error = %e, "continuing without inspection photos");
                warnings.push(ReportWarning::image(ImageSlot::ImageList, e));
                Vec::new()
            }
        };

        let report = self
            .renderer
            .render_with_warnings(&record, &images, warnings)?;
        info!(
            id,
            warnings = report.warnings.len(),
            "inspection report built"
        );

        Ok(report)
    }

    /// Lay out a report from data already in hand
    pub fn render(
        &self,
        record: &InspectionRecord,
        images: &[InspectionImage],
    ) -> Result<BuiltReport> {
        self.renderer.render(record, images)
    }
}
