//! WASM bindings for the Revista Vehicular report
//!
//! The host page fetches the inspection record and its photos itself (it
//! already holds the session); this crate lays out the report and triggers
//! the browser download.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { ReportGenerator } from 'stch-revista-wasm';
//!
//! await init();
//!
//! const generator = ReportGenerator.fromConfig(JSON.stringify({
//!   footer_lines: ["Av. Ejemplo 100", "Chihuahua, Chih.", "Tel. 614 000 0000"],
//! }));
//! generator.setLogos(leftLogoBytes, rightLogoBytes);
//!
//! const report = generator.renderInspectionReport(id, record, images);
//! console.log(report.warnings);
//! report.download();
//! ```

use inspection::{parse_images_payload, parse_record_payload, InspectionImage};
use report::{
    DocumentSaver, RenderedDocument, ReportAssets, ReportConfig, ReportError, ReportRenderer,
    SaveOutcome,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Report generator configured once per page
#[wasm_bindgen]
pub struct ReportGenerator {
    config: ReportConfig,
    assets: ReportAssets,
}

#[wasm_bindgen]
impl ReportGenerator {
    /// Create a generator with the default footer and no logos
    #[wasm_bindgen(constructor)]
    pub fn new() -> ReportGenerator {
        ReportGenerator {
            config: ReportConfig::default(),
            assets: ReportAssets::default(),
        }
    }

    /// Create a generator from report configuration JSON
    ///
    /// Logo paths in the configuration are ignored; use `setLogos`.
    ///
    /// @param json - Configuration JSON string
    /// @returns ReportGenerator instance
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<ReportGenerator, JsValue> {
        let config = ReportConfig::from_json(json).map_err(js_error)?;
        Ok(ReportGenerator {
            config,
            assets: ReportAssets::default(),
        })
    }

    /// Set the header logos
    ///
    /// @param left - Left logo bytes (Uint8Array, PNG or JPEG) or undefined
    /// @param right - Right logo bytes (Uint8Array, PNG or JPEG) or undefined
    #[wasm_bindgen(js_name = setLogos)]
    pub fn set_logos(&mut self, left: Option<Vec<u8>>, right: Option<Vec<u8>>) {
        self.assets = ReportAssets::from_bytes(left, right);
    }

    /// Lay out the report for a record fetched by the host page
    ///
    /// @param id - Inspection identifier; null or blank is rejected
    /// @param record - Inspection record object (or the raw response body)
    /// @param images - Array of inspection photos, or null
    /// @returns RenderedReport
    #[wasm_bindgen(js_name = renderInspectionReport)]
    pub fn render_inspection_report(
        &self,
        id: Option<String>,
        record: JsValue,
        images: JsValue,
    ) -> Result<RenderedReport, JsValue> {
        let record: serde_json::Value = serde_wasm_bindgen::from_value(record)?;
        let images: serde_json::Value = if images.is_null() || images.is_undefined() {
            serde_json::Value::Null
        } else {
            serde_wasm_bindgen::from_value(images)?
        };

        let document = self
            .render_values(id.as_deref(), &record, &images)
            .map_err(js_error)?;
        Ok(RenderedReport { document })
    }
}

impl ReportGenerator {
    fn render_values(
        &self,
        id: Option<&str>,
        record: &serde_json::Value,
        images: &serde_json::Value,
    ) -> report::Result<RenderedDocument> {
        let renderer = ReportRenderer::new(self.assets.clone(), self.config.clone());
        render_report(&renderer, id, record, images)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate the host's data and render it
fn render_report(
    renderer: &ReportRenderer,
    id: Option<&str>,
    record: &serde_json::Value,
    images: &serde_json::Value,
) -> report::Result<RenderedDocument> {
    let id = id.map(str::trim).filter(|id| !id.is_empty());
    let Some(id) = id else {
        return Err(ReportError::MissingIdentifier);
    };

    let record = parse_record_payload(&record.to_string())?
        .ok_or_else(|| ReportError::RecordNotFound(id.to_string()))?;
    let images: Vec<InspectionImage> = parse_images_payload(&images.to_string())?;

    let report = renderer.render(&record, &images)?;
    Ok(report.document)
}

/// A laid-out report ready to download
#[wasm_bindgen]
pub struct RenderedReport {
    document: RenderedDocument,
}

#[wasm_bindgen]
impl RenderedReport {
    /// PDF bytes (Uint8Array)
    pub fn bytes(&self) -> Result<Vec<u8>, JsValue> {
        self.document.to_bytes().map_err(js_error)
    }

    /// Suggested file name without extension
    #[wasm_bindgen(getter)]
    pub fn basename(&self) -> String {
        self.document.basename().to_string()
    }

    /// Non-fatal problems, e.g. photos that could not be decoded
    #[wasm_bindgen(getter)]
    pub fn warnings(&self) -> Vec<JsValue> {
        self.document
            .warnings()
            .iter()
            .map(|w| JsValue::from_str(&w.to_string()))
            .collect()
    }

    /// Download as `<basename>.pdf`, or under another basename
    ///
    /// @returns true when the download was started
    pub fn download(&self, basename: Option<String>) -> bool {
        let basename = basename.unwrap_or_else(|| self.document.basename().to_string());
        BrowserSaver.save(&self.document, &basename).is_success()
    }
}

/// Saves reports as browser downloads
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSaver;

impl DocumentSaver for BrowserSaver {
    fn save(&self, document: &RenderedDocument, basename: &str) -> SaveOutcome {
        let result = document
            .to_bytes()
            .map_err(js_error)
            .and_then(|bytes| download_pdf(&bytes, basename));

        match result {
            Ok(()) => SaveOutcome::Downloaded,
            Err(e) => {
                let reason = e.as_string().unwrap_or_else(|| format!("{e:?}"));
                tracing::error!(%reason, basename, "failed to download report");
                SaveOutcome::Failed(reason)
            }
        }
    }
}

/// File name offered to the browser
fn download_name(basename: &str) -> String {
    format!("{basename}.pdf")
}

/// Trigger a browser download of PDF bytes
///
/// @param bytes - PDF bytes (Uint8Array)
/// @param basename - File name without extension
#[wasm_bindgen(js_name = downloadPdf)]
pub fn download_pdf(bytes: &[u8], basename: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("No document body available"))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("application/pdf");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("Failed to create download link"))?;
    anchor.set_href(&url);
    anchor.set_download(&download_name(basename));

    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    web_sys::Url::revoke_object_url(&url)?;

    Ok(())
}
