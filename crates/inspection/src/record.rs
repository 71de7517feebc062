//! Inspection record data model

use crate::{Result, ServiceError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// A loosely-typed field value as sent by the backend
///
/// The backend is not consistent about types: flags arrive as integers or
/// booleans, numbers sometimes arrive as strings. Anything that is not a
/// scalar is kept as-is in [`FieldValue::Other`] instead of failing the
/// whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    /// Integer code carried by this value
    ///
    /// Floats with no fractional part count as their integer. Strings are
    /// never coerced.
    pub fn as_code(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Whether the value counts as "nothing to show"
    pub fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Bool(b) => !b,
            FieldValue::Integer(n) => *n == 0,
            FieldValue::Float(f) => *f == 0.0 || f.is_nan(),
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Other(v) => v.is_null(),
        }
    }

    /// Render the value as display text
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Float(f) => match self.as_code() {
                Some(n) => n.to_string(),
                None => f.to_string(),
            },
            FieldValue::Text(s) => s.clone(),
            FieldValue::Other(v) => v.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// A Revista Vehicular inspection record
///
/// Every field is optional; absent fields are rendered with a placeholder by
/// the formatters and never fail a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InspectionRecord {
    // Identity
    pub id_revista_vehicular: Option<FieldValue>,
    pub id_concesion: Option<FieldValue>,
    pub folio: Option<FieldValue>,

    // Party and location
    pub propietario: Option<FieldValue>,
    pub inspector: Option<FieldValue>,
    pub municipio: Option<FieldValue>,
    pub tramite: Option<FieldValue>,
    pub modalidad: Option<FieldValue>,

    // Vehicle
    pub marca: Option<FieldValue>,
    pub sub_marca: Option<FieldValue>,
    pub modelo: Option<FieldValue>,
    pub tipo_vehiculo: Option<FieldValue>,
    pub placa_asignada: Option<FieldValue>,
    pub placa_anterior: Option<FieldValue>,
    pub numero_motor: Option<FieldValue>,
    pub numero_serie: Option<FieldValue>,

    // Checklist
    pub pintura_carroceria_ver: Option<FieldValue>,
    pub claxon_ver: Option<FieldValue>,
    pub estinguidor_ver: Option<FieldValue>,
    pub estado_llantas_ver: Option<FieldValue>,
    pub luz_baja_ver: Option<FieldValue>,
    pub herramienta_ver: Option<FieldValue>,
    pub defensas_ver: Option<FieldValue>,
    pub luz_alta_ver: Option<FieldValue>,
    pub sistema_frenado_ver: Option<FieldValue>,
    pub vidrios_ver: Option<FieldValue>,
    pub cuartos_ver: Option<FieldValue>,
    pub sistema_direccion_ver: Option<FieldValue>,
    pub limpiadores_ver: Option<FieldValue>,
    pub direccionales_ver: Option<FieldValue>,
    pub sistema_suspension_ver: Option<FieldValue>,
    pub espejos_ver: Option<FieldValue>,
    pub intermitentes_ver: Option<FieldValue>,
    pub interiores_ver: Option<FieldValue>,
    pub llanta_refaccion_ver: Option<FieldValue>,
    pub stop_ver: Option<FieldValue>,
    pub botiquin_ver: Option<FieldValue>,
    pub parabrisas_medallon_ver: Option<FieldValue>,
    pub timbre_ver: Option<FieldValue>,
    pub cinturon_seguridad_ver: Option<FieldValue>,

    // Insurance
    pub aseguradora: Option<FieldValue>,
    pub numero_poliza: Option<FieldValue>,
    pub vigencia_poliza: Option<FieldValue>,

    pub observaciones: Option<FieldValue>,

    // Outcome
    pub aprobado: Option<FieldValue>,
    pub puntuacion: Option<FieldValue>,
    pub clasificacion: Option<FieldValue>,

    // Inspection date, as parts or as a full date
    pub dia: Option<FieldValue>,
    pub mes: Option<FieldValue>,
    pub anio: Option<FieldValue>,
    pub fecha_inspeccion: Option<FieldValue>,

    pub imagen_cromatica: Option<FieldValue>,
    pub numero_ocupantes: Option<FieldValue>,
}

impl InspectionRecord {
    /// Parse a record from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Record identifier as text, if present and non-empty
    pub fn id(&self) -> Option<String> {
        self.id_revista_vehicular
            .as_ref()
            .filter(|v| !matches!(v, FieldValue::Text(s) if s.trim().is_empty()))
            .filter(|v| !matches!(v, FieldValue::Other(serde_json::Value::Null)))
            .map(FieldValue::to_display_string)
    }
}

/// What an inspection photo shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Engine number photo
    Motor,
    /// Serial (VIN) number photo
    Serial,
}

impl ImageKind {
    /// Map a backend image type code
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ImageKind::Motor),
            2 => Some(ImageKind::Serial),
            _ => None,
        }
    }
}

/// A photo attached to an inspection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InspectionImage {
    pub id_tipo_imagen: Option<FieldValue>,
    pub mime_type: Option<String>,
    /// Base64 payload, bare or as a `data:` URL; null when the photo is missing
    pub imagen: Option<String>,
}

impl InspectionImage {
    /// Photo kind, if the type code is one the report uses
    pub fn kind(&self) -> Option<ImageKind> {
        self.id_tipo_imagen
            .as_ref()
            .and_then(FieldValue::as_code)
            .and_then(ImageKind::from_code)
    }

    /// Decode the base64 payload into raw image bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        let imagen = self.imagen.as_deref().unwrap_or_default();
        let payload = match imagen.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => imagen,
        };
        let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

        if payload.is_empty() {
            return Err(ServiceError::InvalidPayload("empty image payload".to_string()));
        }

        STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| ServiceError::InvalidPayload(format!("invalid base64 image: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_field_value_shapes() {
        let record: InspectionRecord = serde_json::from_value(json!({
            "Folio": 1001,
            "Marca": "NISSAN",
            "PinturaCarroceriaVer": 1,
            "ClaxonVer": true,
            "Puntuacion": 9.5,
            "Observaciones": null,
            "Inspector": ["unexpected"]
        }))
        .unwrap();

        assert_eq!(record.folio, Some(FieldValue::Integer(1001)));
        assert_eq!(record.marca, Some(FieldValue::Text("NISSAN".to_string())));
        assert_eq!(record.pintura_carroceria_ver, Some(FieldValue::Integer(1)));
        assert_eq!(record.claxon_ver, Some(FieldValue::Bool(true)));
        assert_eq!(record.puntuacion, Some(FieldValue::Float(9.5)));
        assert_eq!(record.observaciones, None);
        assert!(matches!(record.inspector, Some(FieldValue::Other(_))));
        assert_eq!(record.modelo, None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let record = InspectionRecord::from_json(r#"{"Folio":"A-1","Extra":{"a":1}}"#).unwrap();
        assert_eq!(record.folio, Some(FieldValue::from("A-1")));
    }

    #[test]
    fn test_as_code() {
        assert_eq!(FieldValue::Integer(2).as_code(), Some(2));
        assert_eq!(FieldValue::Float(1.0).as_code(), Some(1));
        assert_eq!(FieldValue::Float(1.5).as_code(), None);
        assert_eq!(FieldValue::from("1").as_code(), None);
        assert_eq!(FieldValue::Bool(true).as_code(), None);
    }

    #[test]
    fn test_is_falsy() {
        assert!(FieldValue::Bool(false).is_falsy());
        assert!(FieldValue::Integer(0).is_falsy());
        assert!(FieldValue::Float(0.0).is_falsy());
        assert!(FieldValue::from("").is_falsy());
        assert!(FieldValue::Other(serde_json::Value::Null).is_falsy());
        assert!(!FieldValue::from("0").is_falsy());
        assert!(!FieldValue::Other(json!([])).is_falsy());
    }

    #[test]
    fn test_display_string() {
        assert_eq!(FieldValue::Float(2024.0).to_display_string(), "2024");
        assert_eq!(FieldValue::Float(9.5).to_display_string(), "9.5");
        assert_eq!(FieldValue::Integer(-3).to_display_string(), "-3");
    }

    #[test]
    fn test_record_id() {
        let mut record = InspectionRecord::default();
        assert_eq!(record.id(), None);

        record.id_revista_vehicular = Some(FieldValue::Integer(42));
        assert_eq!(record.id(), Some("42".to_string()));

        record.id_revista_vehicular = Some(FieldValue::from("  "));
        assert_eq!(record.id(), None);
    }

    #[test]
    fn test_image_kind() {
        let image: InspectionImage = serde_json::from_value(json!({
            "IdTipoImagen": 2,
            "MimeType": "image/png",
            "Imagen": "AAAA"
        }))
        .unwrap();
        assert_eq!(image.kind(), Some(ImageKind::Serial));
        assert_eq!(image.mime_type.as_deref(), Some("image/png"));

        let other = InspectionImage {
            id_tipo_imagen: Some(FieldValue::Integer(7)),
            ..Default::default()
        };
        assert_eq!(other.kind(), None);
    }

    #[test]
    fn test_decode_bare_and_data_url() {
        let bare = InspectionImage {
            imagen: Some("aGVsbG8=".to_string()),
            ..Default::default()
        };
        assert_eq!(bare.decode().unwrap(), b"hello".to_vec());

        let data_url = InspectionImage {
            imagen: Some("data:image/jpeg;base64,aGVs\nbG8=".to_string()),
            ..Default::default()
        };
        assert_eq!(data_url.decode().unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let image = InspectionImage {
            imagen: Some("***".to_string()),
            ..Default::default()
        };
        assert!(matches!(image.decode(), Err(ServiceError::InvalidPayload(_))));

        let empty = InspectionImage::default();
        assert!(matches!(empty.decode(), Err(ServiceError::InvalidPayload(_))));
    }
}
