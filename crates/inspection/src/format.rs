//! Display formatting for inspection values

use crate::record::{FieldValue, InspectionRecord};
use chrono::NaiveDate;

/// Placeholder shown for values that are missing or not applicable
pub const NOT_AVAILABLE: &str = "N/A";

/// Outcome of a single checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionFlag {
    /// Not yet evaluated; rendered blank
    Unset,
    Pass,
    Fail,
    NotApplicable,
}

impl InspectionFlag {
    /// Translate a raw backend value into a flag
    ///
    /// `1`/`true` pass, `2` fails, `0`/`false` is unset. Everything else,
    /// including `3`, missing values and strings, is not applicable.
    pub fn from_value(value: Option<&FieldValue>) -> Self {
        match value {
            Some(FieldValue::Bool(true)) => InspectionFlag::Pass,
            Some(FieldValue::Bool(false)) => InspectionFlag::Unset,
            Some(other) => match other.as_code() {
                Some(0) => InspectionFlag::Unset,
                Some(1) => InspectionFlag::Pass,
                Some(2) => InspectionFlag::Fail,
                _ => InspectionFlag::NotApplicable,
            },
            None => InspectionFlag::NotApplicable,
        }
    }

    /// Label printed on the report
    pub fn label(&self) -> &'static str {
        match self {
            InspectionFlag::Unset => "",
            InspectionFlag::Pass => "BIEN",
            InspectionFlag::Fail => "MAL",
            InspectionFlag::NotApplicable => NOT_AVAILABLE,
        }
    }
}

/// Format a checklist value
///
/// # Examples
/// ```
/// use inspection::{format_inspection_flag, FieldValue};
/// assert_eq!(format_inspection_flag(Some(&FieldValue::Integer(1))), "BIEN");
/// assert_eq!(format_inspection_flag(Some(&FieldValue::Integer(2))), "MAL");
/// assert_eq!(format_inspection_flag(Some(&FieldValue::Bool(false))), "");
/// assert_eq!(format_inspection_flag(None), "N/A");
/// ```
pub fn format_inspection_flag(value: Option<&FieldValue>) -> &'static str {
    InspectionFlag::from_value(value).label()
}

/// Format a plain text field, using "N/A" for falsy values
///
/// # Examples
/// ```
/// use inspection::{format_text, FieldValue};
/// assert_eq!(format_text(Some(&FieldValue::from("NISSAN"))), "NISSAN");
/// assert_eq!(format_text(Some(&FieldValue::Integer(0))), "N/A");
/// assert_eq!(format_text(None), "N/A");
/// ```
pub fn format_text(value: Option<&FieldValue>) -> String {
    match value {
        Some(v) if !v.is_falsy() => v.to_display_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format a date field as `dd/mm/yyyy`
///
/// ISO-8601 dates and date-times are reformatted using their calendar date.
/// Other non-empty text is shown as-is.
///
/// # Examples
/// ```
/// use inspection::{format_date, FieldValue};
/// assert_eq!(format_date(Some(&FieldValue::from("2024-03-05"))), "05/03/2024");
/// assert_eq!(format_date(Some(&FieldValue::from("2024-03-05T10:30:00.000Z"))), "05/03/2024");
/// assert_eq!(format_date(None), "N/A");
/// ```
pub fn format_date(value: Option<&FieldValue>) -> String {
    let text = format_text(value);
    match parse_iso_date(&text) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => text,
    }
}

/// Inspection date from `Dia`/`Mes`/`Anio`, falling back to `FechaInspeccion`
pub fn format_inspection_date(record: &InspectionRecord) -> String {
    let parts = (
        date_part(record.dia.as_ref()),
        date_part(record.mes.as_ref()),
        date_part(record.anio.as_ref()),
    );

    match parts {
        (Some(day), Some(month), Some(year)) => {
            format!("{day:0>2}/{month:0>2}/{year}")
        }
        _ => format_date(record.fecha_inspeccion.as_ref()),
    }
}

fn date_part(value: Option<&FieldValue>) -> Option<String> {
    value
        .filter(|v| !v.is_falsy())
        .map(|v| v.to_display_string().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let date = text.get(..10)?;
    let rest = &text[10..];
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
