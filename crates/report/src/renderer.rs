//! Report layout and drawing

use crate::checklist::checklist_rows;
use crate::config::{Asset, ReportAssets, ReportConfig};
use crate::document::{BuiltReport, ImageSlot, RenderedDocument, ReportWarning};
use crate::layout::{Cursor, LayoutConstants};
use crate::Result;
use inspection::{
    format_date, format_inspection_date, format_inspection_flag, format_text, ImageKind,
    InspectionImage, InspectionRecord,
};
use pdf_core::{Align, Color, FontWeight, ImageScaleMode, PdfDocument};
use tracing::{debug, warn};

const TITLE: &str = "REVISTA VEHICULAR";
const SUBTITLE: &str = "CONSTANCIA DE INSPECCIÓN FÍSICO-MECÁNICA";
const DISCLAIMER: &str = "Los que suscriben manifiestan bajo protesta de decir verdad que los \
datos asentados en la presente constancia son verídicos y que el vehículo descrito fue \
inspeccionado físicamente en la fecha indicada.";

/// Draws inspection records onto a fresh page
///
/// Holds no per-report state, so one renderer can serve any number of
/// reports.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    layout: LayoutConstants,
    assets: ReportAssets,
    config: ReportConfig,
}

/// A labelled value in the field grid
struct Field {
    x: f64,
    label: &'static str,
    value: String,
}

impl Field {
    fn new(x: f64, label: &'static str, value: String) -> Self {
        Self { x, label, value }
    }
}

impl ReportRenderer {
    pub fn new(assets: ReportAssets, config: ReportConfig) -> Self {
        Self {
            layout: LayoutConstants::LETTER,
            assets,
            config,
        }
    }

    /// Layout in use
    pub fn layout(&self) -> &LayoutConstants {
        &self.layout
    }

    /// Render a record and its photos
    pub fn render(
        &self,
        record: &InspectionRecord,
        images: &[InspectionImage],
    ) -> Result<BuiltReport> {
        self.render_with_warnings(record, images, Vec::new())
    }

    /// Render, appending to warnings already collected by the caller
    pub(crate) fn render_with_warnings(
        &self,
        record: &InspectionRecord,
        images: &[InspectionImage],
        mut warnings: Vec<ReportWarning>,
    ) -> Result<BuiltReport> {
        debug!("creating letter page");
        let mut doc = PdfDocument::new(self.layout.page);

        self.draw_logos(&mut doc, &mut warnings)?;
        self.draw_title(&mut doc, record)?;

        let cursor = Cursor::at(self.layout.content_start_y);
        let cursor = self.draw_header_fields(&mut doc, cursor, record)?;
        let cursor = self.draw_vehicle(&mut doc, cursor, record, images, &mut warnings)?;
        let cursor = self.draw_checklist(&mut doc, cursor, record)?;
        let cursor = self.draw_insurance(&mut doc, cursor, record)?;
        let cursor = self.draw_ponderation(&mut doc, cursor, record)?;
        let cursor = self.draw_observations(&mut doc, cursor, record)?;
        let cursor = self.draw_approval(&mut doc, cursor, record)?;
        let cursor = self.draw_disclaimer(&mut doc, cursor)?;
        let cursor = self.draw_signatures(&mut doc, cursor, record)?;
        self.draw_score(&mut doc, cursor, record)?;
        self.draw_footer(&mut doc)?;

        let document = RenderedDocument::new(doc, warnings, report_basename(record));
        Ok(BuiltReport::from(document))
    }

    fn set_font(&self, doc: &mut PdfDocument, weight: FontWeight, size: f32) {
        doc.set_font_weight(weight);
        doc.set_font_size(size);
    }

    /// Draw one image asset into a fixed box, recording a warning on failure
    #[allow(clippy::too_many_arguments)]
    fn draw_image(
        &self,
        doc: &mut PdfDocument,
        warnings: &mut Vec<ReportWarning>,
        slot: ImageSlot,
        bytes: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> bool {
        match doc.insert_image_scaled(bytes, x, y, width, height, ImageScaleMode::FitBox) {
            Ok(()) => true,
            Err(e) => {
                warn!(%slot, error = %e, "skipping undecodable image");
                warnings.push(ReportWarning::image(slot, e));
                false
            }
        }
    }

    fn draw_logos(&self, doc: &mut PdfDocument, warnings: &mut Vec<ReportWarning>) -> Result<()> {
        let l = &self.layout;
        let slots = [
            (ImageSlot::LeftLogo, &self.assets.left_logo, l.left_logo_x),
            (ImageSlot::RightLogo, &self.assets.right_logo, l.right_logo_x),
        ];

        for (slot, asset, x) in slots {
            match asset {
                Asset::NotConfigured => debug!(%slot, "no logo configured"),
                Asset::Unavailable(reason) => {
                    warn!(%slot, %reason, "logo unavailable");
                    warnings.push(ReportWarning::image(slot, reason));
                }
                Asset::Loaded(bytes) => {
                    self.draw_image(
                        doc,
                        warnings,
                        slot,
                        bytes,
                        x,
                        l.logo_y,
                        l.logo_width,
                        l.logo_height,
                    );
                }
            }
        }

        Ok(())
    }

    /// Title, subtitle and the red folio number
    fn draw_title(&self, doc: &mut PdfDocument, record: &InspectionRecord) -> Result<()> {
        let l = &self.layout;

        self.set_font(doc, FontWeight::Bold, l.title_font_size);
        doc.insert_text(TITLE, l.center_x(), l.title_y, Align::Center)?;
        self.set_font(doc, FontWeight::Bold, l.subtitle_font_size);
        doc.insert_text(SUBTITLE, l.center_x(), l.subtitle_y, Align::Center)?;

        self.set_font(doc, FontWeight::Bold, l.subtitle_font_size);
        doc.insert_text("No:", l.folio_label_x, l.folio_y, Align::Left)?;
        doc.set_text_color(Color::red());
        doc.insert_text(
            &format_text(record.folio.as_ref()),
            l.folio_value_x,
            l.folio_y,
            Align::Left,
        )?;
        doc.set_text_color(Color::black());

        Ok(())
    }

    /// One row of labelled values at a shared baseline
    fn draw_row(&self, doc: &mut PdfDocument, cursor: Cursor, fields: &[Field]) -> Result<Cursor> {
        for field in fields {
            self.set_font(doc, FontWeight::Bold, self.layout.body_font_size);
            doc.insert_text(field.label, field.x, cursor.y, Align::Left)?;
            let value_x = field.x + doc.get_text_width(field.label) + self.layout.label_gap;

            self.set_font(doc, FontWeight::Regular, self.layout.body_font_size);
            doc.insert_text(&field.value, value_x, cursor.y, Align::Left)?;
        }

        Ok(cursor.advance(self.layout.row_height))
    }

    fn draw_section_title(
        &self,
        doc: &mut PdfDocument,
        cursor: Cursor,
        title: &str,
    ) -> Result<Cursor> {
        self.set_font(doc, FontWeight::Bold, self.layout.section_font_size);
        doc.insert_text(title, self.layout.margin, cursor.y, Align::Left)?;
        Ok(cursor.advance(self.layout.row_height))
    }

    fn draw_header_fields(
        &self,
        doc: &mut PdfDocument,
        cursor: Cursor,
        record: &InspectionRecord,
    ) -> Result<Cursor> {
        debug!("drawing header fields");
        let [c1, c2, c3, c4] = self.layout.columns;

        let cursor = self.draw_row(
            doc,
            cursor,
            &[
                Field::new(c1, "FECHA:", format_inspection_date(record)),
                Field::new(c2, "No. REVISTA:", format_text(record.id_revista_vehicular.as_ref())),
                Field::new(c4, "MUNICIPIO:", format_text(record.municipio.as_ref())),
            ],
        )?;
        let cursor = self.draw_row(
            doc,
            cursor,
            &[
                Field::new(c1, "PROPIETARIO:", format_text(record.propietario.as_ref())),
                Field::new(c3, "CONCESIÓN:", format_text(record.id_concesion.as_ref())),
            ],
        )?;
        self.draw_row(
            doc,
            cursor,
            &[
                Field::new(c1, "TRÁMITE:", format_text(record.tramite.as_ref())),
                Field::new(c3, "MODALIDAD:", format_text(record.modalidad.as_ref())),
            ],
        )
    }

    fn draw_vehicle(
        &self,
        doc: &mut PdfDocument,
        cursor: Cursor,
        record: &InspectionRecord,
        images: &[InspectionImage],
        warnings: &mut Vec<ReportWarning>,
    ) -> Result<Cursor> {
        debug!("drawing vehicle block");
        let [c1, c2, _, _] = self.layout.columns;

        let cursor = self.draw_section_title(doc, cursor, "CARACTERÍSTICAS DEL VEHÍCULO")?;
        let block_top = cursor.y;

        let rows = [
            [
                Field::new(c1, "MARCA:", format_text(record.marca.as_ref())),
                Field::new(c2, "SUBMARCA:", format_text(record.sub_marca.as_ref())),
            ],
            [
                Field::new(c1, "MODELO:", format_text(record.modelo.as_ref())),
                Field::new(c2, "TIPO:", format_text(record.tipo_vehiculo.as_ref())),
            ],
            [
                Field::new(c1, "PLACA ASIGNADA:", format_text(record.placa_asignada.as_ref())),
                Field::new(c2, "PLACA ANTERIOR:", format_text(record.placa_anterior.as_ref())),
            ],
            [
                Field::new(c1, "No. MOTOR:", format_text(record.numero_motor.as_ref())),
                Field::new(c2, "No. SERIE:", format_text(record.numero_serie.as_ref())),
            ],
        ];

        let mut cursor = cursor;
        for row in &rows {
            cursor = self.draw_row(doc, cursor, row)?;
        }

        self.draw_photos(doc, block_top, images, warnings)?;

        Ok(cursor)
    }

    /// Motor and serial photos beside the vehicle block
    fn draw_photos(
        &self,
        doc: &mut PdfDocument,
        block_top: f64,
        images: &[InspectionImage],
        warnings: &mut Vec<ReportWarning>,
    ) -> Result<()> {
        let l = &self.layout;
        let top = block_top + l.photo_top_offset;
        let photos = [
            (ImageKind::Motor, ImageSlot::MotorPhoto, l.motor_photo_x, "MOTOR"),
            (ImageKind::Serial, ImageSlot::SerialPhoto, l.serial_photo_x, "SERIE"),
        ];

        for (kind, slot, x, caption) in photos {
            let Some(image) = images.iter().find(|i| i.kind() == Some(kind)) else {
                continue;
            };

            let drawn = match image.decode() {
                Ok(bytes) => {
                    self.draw_image(doc, warnings, slot, &bytes, x, top, l.photo_width, l.photo_height)
                }
                Err(e) => {
                    warn!(%slot, error = %e, "skipping photo with invalid payload");
                    warnings.push(ReportWarning::image(slot, e));
                    false
                }
            };

            if drawn {
                self.set_font(doc, FontWeight::Regular, l.small_font_size);
                doc.insert_text(
                    caption,
                    x + l.photo_width / 2.0,
                    top + l.photo_height + l.photo_caption_gap,
                    Align::Center,
                )?;
            }
        }

        Ok(())
    }

    fn draw_checklist(
        &self,
        doc: &mut PdfDocument,
        cursor: Cursor,
        record: &InspectionRecord,
    ) -> Result<Cursor> {
        debug!("drawing checklist");
        let l = &self.layout;
        let mut cursor = self.draw_section_title(doc, cursor, "INSPECCIÓN FÍSICO-MECÁNICA")?;

        for row in checklist_rows() {
            for (column, item) in row.iter().enumerate() {
                let x = l.checklist_columns[column];

                self.set_font(doc, FontWeight::Regular, l.body_font_size);
                doc.insert_text(item.label, x, cursor.y, Align::Left)?;

                self.set_font(doc, FontWeight::Bold, l.body_font_size);
                doc.insert_text(
                    item.format(record),
                    x + l.checklist_value_offsets[column],
                    cursor.y,
                    Align::Left,
                )?;
            }
            cursor = cursor.advance(l.row_height);
        }

        Ok(cursor)
    }

    fn draw_insurance(
        &self,
        doc: &mut PdfDocument,
        cursor: Cursor,
        record: &InspectionRecord,
    ) -> Result<Cursor> {
        debug!("drawing insurance block");
        let [c1, _, c3, _] = self.layout.columns;

        let cursor = self.draw_section_title(doc, cursor, "DATOS DEL SEGURO")?;
        let cursor = self.draw_row(
            doc,
            cursor,
            &[
                Field::new(c1, "ASEGURADORA:", format_text(record.aseguradora.as_ref())),
                Field::new(c3, "No. PÓLIZA:", format_text(record.numero_poliza.as_ref())),
            ],
        )?;
        self.draw_row(
            doc,
            cursor,
            &[Field::new(c1, "VIGENCIA:", format_date(record.vigencia_poliza.as_ref()))],
        )
    }

    fn draw_ponderation(
        &self,
        doc: &mut PdfDocument,
        cursor: Cursor,
        record: &InspectionRecord,
    ) -> Result<Cursor> {
        let [c1, _, c3, _] = self.layout.columns;

        let cursor = self.draw_section_title(doc, cursor, "PONDERACIÓN")?;
        self.draw_row(
            doc,
            cursor,
            &[
                Field::new(
                    c1,
                    "IMAGEN CROMÁTICA:",
                    format_inspection_flag(record.imagen_cromatica.as_ref()).to_string(),
                ),
                Field::new(c3, "No. OCUPANTES:", format_text(record.numero_ocupantes.as_ref())),
            ],
        )
    }

    /// Observations label and the wrapped text; the only variable-height block
    fn draw_observations(
        &self,
        doc: &mut PdfDocument,
        cursor: Cursor,
        record: &InspectionRecord,
    ) -> Result<Cursor> {
        let l = &self.layout;

        self.set_font(doc, FontWeight::Bold, l.body_font_size);
        doc.insert_text("OBSERVACIONES:", l.margin, cursor.y, Align::Left)?;
        let cursor = cursor.advance(l.row_height);

        self.set_font(doc, FontWeight::Regular, l.body_font_size);
        let text = format_text(record.observaciones.as_ref());
        let lines = doc.split_text_to_size(&text, l.content_width());
        for (i, line) in lines.iter().enumerate() {
            doc.insert_text(
                line,
                l.margin,
                cursor.y + i as f64 * l.observation_line_height,
                Align::Left,
            )?;
        }
        debug!(lines = lines.len(), "observations wrapped");

        Ok(cursor.advance_lines(lines.len(), l.observation_line_height))
    }

    fn draw_approval(
        &self,
        doc: &mut PdfDocument,
        cursor: Cursor,
        record: &InspectionRecord,
    ) -> Result<Cursor> {
        let l = &self.layout;
        let cursor = cursor.advance(l.approval_gap);

        self.set_font(doc, FontWeight::Bold, l.subtitle_font_size);
        let text = format!("APROBADO: {}", format_inspection_flag(record.aprobado.as_ref()));
        doc.insert_text(&text, l.center_x(), cursor.y, Align::Center)?;

        Ok(cursor.advance(l.row_height))
    }

    fn draw_disclaimer(&self, doc: &mut PdfDocument, cursor: Cursor) -> Result<Cursor> {
        let l = &self.layout;

        self.set_font(doc, FontWeight::Regular, l.small_font_size);
        let lines = doc.split_text_to_size(DISCLAIMER, l.content_width());
        for (i, line) in lines.iter().enumerate() {
            doc.insert_text(
                line,
                l.margin,
                cursor.y + i as f64 * l.disclaimer_line_height,
                Align::Left,
            )?;
        }

        Ok(cursor.advance_lines(lines.len(), l.disclaimer_line_height))
    }

    /// Inspector and owner signature lines; returns the cursor at the last caption
    fn draw_signatures(
        &self,
        doc: &mut PdfDocument,
        cursor: Cursor,
        record: &InspectionRecord,
    ) -> Result<Cursor> {
        debug!("drawing signature block");
        let l = &self.layout;
        let name_y = cursor.y + l.signature_gap;
        let rule_y = name_y + l.signature_line_height / 2.0;
        let caption_y = rule_y + l.signature_line_height;
        let role_y = caption_y + l.signature_line_height;

        let signers = [
            (l.signature_rules[0], format_text(record.inspector.as_ref()), "INSPECTOR"),
            (l.signature_rules[1], format_text(record.propietario.as_ref()), "INTERESADO"),
        ];

        doc.set_draw_color(Color::black());
        doc.set_line_width(0.3);
        for ((x1, x2), name, role) in signers {
            let center = (x1 + x2) / 2.0;

            self.set_font(doc, FontWeight::Regular, l.body_font_size);
            doc.insert_text(&name, center, name_y, Align::Center)?;
            doc.insert_line(x1, rule_y, x2, rule_y)?;

            self.set_font(doc, FontWeight::Regular, l.small_font_size);
            doc.insert_text("NOMBRE Y FIRMA", center, caption_y, Align::Center)?;

            self.set_font(doc, FontWeight::Bold, l.body_font_size);
            doc.insert_text(role, center, role_y, Align::Center)?;
        }

        Ok(Cursor::at(role_y))
    }

    fn draw_score(
        &self,
        doc: &mut PdfDocument,
        signature_end: Cursor,
        record: &InspectionRecord,
    ) -> Result<Cursor> {
        let [c1, _, c3, _] = self.layout.columns;
        let cursor = Cursor::at(self.layout.score_line_y(signature_end.y));

        self.draw_row(
            doc,
            cursor,
            &[
                Field::new(c1, "PUNTUACIÓN:", format_text(record.puntuacion.as_ref())),
                Field::new(c3, "CLASIFICACIÓN:", format_text(record.clasificacion.as_ref())),
            ],
        )
    }

    /// Footer anchored to the bottom edge, independent of the content above
    fn draw_footer(&self, doc: &mut PdfDocument) -> Result<()> {
        let l = &self.layout;
        self.set_font(doc, FontWeight::Regular, l.small_font_size);

        for (i, line) in self.config.footer_lines.iter().take(3).enumerate() {
            doc.insert_text(
                line,
                l.center_x(),
                l.footer_y() + i as f64 * l.footer_line_height,
                Align::Center,
            )?;
        }

        Ok(())
    }
}

/// File name for a record's report, without extension
pub fn report_basename(record: &InspectionRecord) -> String {
    let id = record
        .id()
        .or_else(|| record.folio.as_ref().map(|f| f.to_display_string()))
        .map(|id| {
            id.chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
                .collect::<String>()
        })
        .filter(|id| !id.is_empty());

    match id {
        Some(id) => format!("revista_vehicular_{id}"),
        None => "revista_vehicular".to_string(),
    }
}
