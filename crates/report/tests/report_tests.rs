//! Integration tests for report building
//!
//! The record service is replaced by an in-memory fake that counts calls.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use inspection::{FieldValue, InspectionImage, InspectionRecord, ServiceError};
use pdf_core::{Align, DrawOp, TextOp};
use pretty_assertions::assert_eq;
use report::{
    checklist_entries, DocumentSaver, FileSaver, ImageSlot, InspectionRecordService,
    LayoutConstants, ReportAssets, ReportBuilder, ReportConfig, ReportError, ReportWarning,
    SaveOutcome, CHECKLIST,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory record service
#[derive(Default)]
struct FakeService {
    record: Option<InspectionRecord>,
    /// `None` makes the image request fail
    images: Option<Vec<InspectionImage>>,
    fail_record: bool,
    record_calls: AtomicUsize,
    image_calls: AtomicUsize,
}

impl FakeService {
    fn with_record(record: InspectionRecord) -> Self {
        Self {
            record: Some(record),
            images: Some(Vec::new()),
            ..Default::default()
        }
    }

    fn calls(&self) -> (usize, usize) {
        (
            self.record_calls.load(Ordering::SeqCst),
            self.image_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl InspectionRecordService for FakeService {
    async fn get_record(&self, _id: &str) -> inspection::Result<Option<InspectionRecord>> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_record {
            return Err(ServiceError::InvalidPayload("connection reset".to_string()));
        }
        Ok(self.record.clone())
    }

    async fn get_images(&self, _id: &str) -> inspection::Result<Vec<InspectionImage>> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.images
            .clone()
            .ok_or_else(|| ServiceError::InvalidPayload("image service down".to_string()))
    }
}

fn builder(service: FakeService) -> ReportBuilder<FakeService> {
    ReportBuilder::new(service, ReportAssets::default(), ReportConfig::default())
}

/// The record used for the end-to-end checks
fn fixture_record() -> InspectionRecord {
    serde_json::from_value(json!({
        "IdRevistaVehicular": 55,
        "Folio": 1001,
        "Propietario": "MARÍA LÓPEZ",
        "Inspector": "JUAN PÉREZ",
        "Marca": "NISSAN",
        "PinturaCarroceriaVer": 1,
        "ClaxonVer": 2,
        "EstinguidorVer": 3,
        "LuzBajaVer": true,
        "Observaciones": "Sin observaciones",
        "Aprobado": 1,
        "Puntuacion": 95,
        "Clasificacion": "A"
    }))
    .expect("Failed to build fixture record")
}

/// Base64 PNG photo of the given type
fn photo(type_code: i64) -> InspectionImage {
    use image::{DynamicImage, ImageBuffer, Rgb};

    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(12, 10, Rgb([40, 80, 120]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("Failed to encode PNG");

    InspectionImage {
        id_tipo_imagen: Some(FieldValue::Integer(type_code)),
        mime_type: Some("image/png".to_string()),
        imagen: Some(format!("data:image/png;base64,{}", STANDARD.encode(bytes))),
    }
}

fn texts(report: &report::BuiltReport) -> Vec<&TextOp> {
    report.document.texts().collect()
}

fn image_count(report: &report::BuiltReport) -> usize {
    report
        .document
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Image(_)))
        .count()
}

fn warning_slots(report: &report::BuiltReport) -> Vec<ImageSlot> {
    report
        .warnings
        .iter()
        .map(|w| match w {
            ReportWarning::ImageFetchFailed { slot, .. } => *slot,
        })
        .collect()
}

#[tokio::test]
async fn test_blank_identifier_makes_no_requests() {
    let builder = builder(FakeService::with_record(fixture_record()));

    for id in ["", "   ", "\t\n"] {
        let result = builder.build_inspection_report(id).await;
        assert!(matches!(result, Err(ReportError::MissingIdentifier)));
    }
    assert_eq!(builder.service().calls(), (0, 0));
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let builder = builder(FakeService {
        images: Some(Vec::new()),
        ..Default::default()
    });

    let result = builder.build_inspection_report("42").await;
    match result {
        Err(ReportError::RecordNotFound(id)) => assert_eq!(id, "42"),
        other => panic!("expected RecordNotFound, got {other:?}"),
    }
    assert_eq!(builder.service().calls(), (1, 0));
}

#[tokio::test]
async fn test_record_request_failure_propagates() {
    let builder = builder(FakeService {
        fail_record: true,
        ..Default::default()
    });

    let result = builder.build_inspection_report("42").await;
    assert!(matches!(result, Err(ReportError::Service(_))));
    assert_eq!(builder.service().calls(), (1, 0));
}

#[tokio::test]
async fn test_image_request_failure_is_a_warning() {
    let builder = builder(FakeService {
        record: Some(fixture_record()),
        images: None,
        ..Default::default()
    });

    let report = builder
        .build_inspection_report("55")
        .await
        .expect("report should still be built");

    assert_eq!(warning_slots(&report), vec![ImageSlot::ImageList]);
    assert_eq!(report.document.warnings(), report.warnings.as_slice());
    assert_eq!(image_count(&report), 0);
    assert!(report.document.find_text("APROBADO: BIEN").is_some());
    assert_eq!(builder.service().calls(), (1, 1));
}

#[tokio::test]
async fn test_photos_are_drawn_beside_vehicle_block() {
    let mut service = FakeService::with_record(fixture_record());
    service.images = Some(vec![photo(1), photo(2), photo(9)]);
    let builder = builder(service);

    let report = builder
        .build_inspection_report("55")
        .await
        .expect("Failed to build report");

    assert!(report.warnings.is_empty());
    assert_eq!(image_count(&report), 2);
    assert!(report.document.find_text("MOTOR").is_some());
    assert!(report.document.find_text("SERIE").is_some());

    let layout = LayoutConstants::LETTER;
    let xs: Vec<f64> = report
        .document
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Image(image) => Some(image.x),
            _ => None,
        })
        .collect();
    assert_eq!(xs, vec![layout.motor_photo_x, layout.serial_photo_x]);
}

#[tokio::test]
async fn test_undecodable_photo_is_a_warning() {
    let mut service = FakeService::with_record(fixture_record());
    let mut broken = photo(2);
    broken.imagen = Some("%%% not base64 %%%".to_string());
    service.images = Some(vec![photo(1), broken]);
    let builder = builder(service);

    let report = builder
        .build_inspection_report("55")
        .await
        .expect("Failed to build report");

    assert_eq!(warning_slots(&report), vec![ImageSlot::SerialPhoto]);
    assert_eq!(image_count(&report), 1);
    assert!(report.document.find_text("SERIE").is_none());
}

#[tokio::test]
async fn test_null_photo_payload_only_skips_that_photo() {
    let mut service = FakeService::with_record(fixture_record());
    service.images = Some(
        inspection::parse_images_payload(
            &json!([
                { "IdTipoImagen": 1, "Imagen": null },
                { "IdTipoImagen": 2, "Imagen": photo(2).imagen },
            ])
            .to_string(),
        )
        .expect("Failed to parse image list"),
    );
    let builder = builder(service);

    let report = builder
        .build_inspection_report("55")
        .await
        .expect("Failed to build report");

    assert_eq!(warning_slots(&report), vec![ImageSlot::MotorPhoto]);
    assert_eq!(image_count(&report), 1);
    assert!(report.document.find_text("MOTOR").is_none());
    assert!(report.document.find_text("SERIE").is_some());
}

#[test]
fn test_longer_observations_move_approval_lower() {
    let builder = builder(FakeService::default());

    let mut short = fixture_record();
    short.observaciones = Some(FieldValue::from("Sin observaciones"));
    let mut long = fixture_record();
    long.observaciones = Some(FieldValue::from(
        "El vehículo presenta desgaste en la pintura del cofre y de la puerta trasera \
         izquierda, un faro con la mica estrellada, el espejo lateral derecho flojo y la \
         llanta de refacción con presión baja; se recomienda su atención antes de la \
         siguiente revista vehicular programada para el próximo año.",
    ));

    let short_report = builder.render(&short, &[]).expect("short report");
    let long_report = builder.render(&long, &[]).expect("long report");

    let short_y = short_report.document.find_text("APROBADO: BIEN").expect("approval").y;
    let long_y = long_report.document.find_text("APROBADO: BIEN").expect("approval").y;
    assert!(long_y > short_y, "{long_y} should be below {short_y}");
}

#[test]
fn test_score_line_is_pinned_for_short_layout() {
    let report = builder(FakeService::default())
        .render(&fixture_record(), &[])
        .expect("Failed to render");

    let score = report.document.find_text("PUNTUACIÓN:").expect("score label");
    assert!((score.y - 238.4).abs() < 1e-6, "score line at {}", score.y);

    let clasificacion = report.document.find_text("CLASIFICACIÓN:").expect("class label");
    assert_eq!(clasificacion.y, score.y);
    assert!(report.document.find_text("95").is_some());
}

#[test]
fn test_score_line_follows_tall_layout() {
    let mut record = fixture_record();
    record.observaciones = Some(FieldValue::Text("renglón\n".repeat(20)));

    let report = builder(FakeService::default())
        .render(&record, &[])
        .expect("Failed to render");

    let layout = LayoutConstants::LETTER;
    let role_y = report.document.find_text("INTERESADO").expect("role caption").y;
    let score_y = report.document.find_text("PUNTUACIÓN:").expect("score label").y;

    assert!(score_y > 238.4);
    assert!((score_y - (role_y + layout.signature_buffer)).abs() < 1e-6);
}

#[test]
fn test_checklist_in_canonical_order() {
    let mut record = fixture_record();
    // Give every item a visible value
    record.estado_llantas_ver = Some(FieldValue::Integer(2));
    record.cinturon_seguridad_ver = Some(FieldValue::Integer(1));

    let report = builder(FakeService::default())
        .render(&record, &[])
        .expect("Failed to render");
    let ops = texts(&report);

    let mut last_index = None;
    for (label, value) in checklist_entries(&record) {
        let index = ops
            .iter()
            .position(|op| op.text == label)
            .unwrap_or_else(|| panic!("label {label} not drawn"));
        if let Some(last) = last_index {
            assert!(index > last, "{label} drawn out of order");
        }
        last_index = Some(index);

        if !value.is_empty() {
            assert_eq!(ops[index + 1].text, value, "value of {label}");
            assert_eq!(ops[index + 1].y, ops[index].y);
        }
    }

    // Eight rows of three share baselines
    let layout = LayoutConstants::LETTER;
    let first = report.document.find_text(CHECKLIST[0].label).expect("first");
    let last = report.document.find_text(CHECKLIST[23].label).expect("last");
    assert!((last.y - first.y - 7.0 * layout.row_height).abs() < 1e-9);
}

#[tokio::test]
async fn test_end_to_end_fixture() {
    let builder = builder(FakeService::with_record(fixture_record()));
    let report = builder
        .build_inspection_report("55")
        .await
        .expect("Failed to build report");
    let ops = texts(&report);

    let label = report.document.find_text("No:").expect("folio label");
    let folio = report.document.find_text("1001").expect("folio value");
    assert_eq!(label.y, folio.y);

    let paint = ops
        .iter()
        .position(|op| op.text == "Pintura y Carrocería")
        .expect("paint label");
    assert_eq!(ops[paint + 1].text, "BIEN");
    let horn = ops.iter().position(|op| op.text == "Claxon").expect("horn label");
    assert_eq!(ops[horn + 1].text, "MAL");

    let approval = report.document.find_text("APROBADO: BIEN").expect("approval");
    assert_eq!(approval.align, Align::Center);
    assert!((approval.x - 215.9 / 2.0).abs() < 1e-9);

    let dir = tempfile::tempdir().expect("temp dir");
    let saver = FileSaver::new(dir.path());
    let outcome = saver.save(&report.document, report.document.basename());
    let path = match outcome {
        SaveOutcome::Saved(path) => path,
        other => panic!("expected a saved file, got {other:?}"),
    };
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("revista_vehicular_55.pdf")
    );

    let bytes = std::fs::read(&path).expect("saved file");
    assert!(!bytes.is_empty());
    let pdf = lopdf::Document::load_mem(&bytes).expect("saved file is a PDF");
    assert_eq!(pdf.get_pages().len(), 1);
}

#[tokio::test]
async fn test_concurrent_builds_are_independent() {
    let builder = builder(FakeService::with_record(fixture_record()));

    let (first, second) = tokio::join!(
        builder.build_inspection_report("55"),
        builder.build_inspection_report("55")
    );
    let first = first.expect("first build");
    let second = second.expect("second build");

    assert_eq!(first.document.ops(), second.document.ops());
    assert_eq!(builder.service().calls(), (2, 2));
}

#[test]
fn test_every_checklist_label_is_drawn_once() {
    let report = builder(FakeService::default())
        .render(&InspectionRecord::default(), &[])
        .expect("Failed to render");

    for item in CHECKLIST.iter() {
        let count = report.document.texts().filter(|t| t.text == item.label).count();
        assert_eq!(count, 1, "{}", item.label);
    }
}
