//! Inspection record service seam

use crate::record::{InspectionImage, InspectionRecord};
use crate::{Result, ServiceError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Source of inspection records and their photos
///
/// `get_record` returns `Ok(None)` when the backend has no such record;
/// transport and decoding problems are errors.
#[async_trait]
pub trait InspectionRecordService: Send + Sync {
    /// Fetch one inspection record by identifier
    async fn get_record(&self, id: &str) -> Result<Option<InspectionRecord>>;

    /// Fetch the photos attached to an inspection
    async fn get_images(&self, id: &str) -> Result<Vec<InspectionImage>>;
}

#[async_trait]
impl<T: InspectionRecordService + ?Sized> InspectionRecordService for Arc<T> {
    async fn get_record(&self, id: &str) -> Result<Option<InspectionRecord>> {
        (**self).get_record(id).await
    }

    async fn get_images(&self, id: &str) -> Result<Vec<InspectionImage>> {
        (**self).get_images(id).await
    }
}

/// Interpret a record response body
///
/// An empty body, `null`, `{}` and `[]` all mean "not found". A JSON array
/// yields its first element.
pub fn parse_record_payload(body: &str) -> Result<Option<InspectionRecord>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }

    let value = match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => first,
            None => return Ok(None),
        },
        other => other,
    };

    match value {
        Value::Null => Ok(None),
        Value::Object(ref fields) if fields.is_empty() => Ok(None),
        Value::Object(_) => Ok(Some(serde_json::from_value(value)?)),
        other => Err(ServiceError::InvalidPayload(format!(
            "expected an inspection object, got {other}"
        ))),
    }
}

/// Interpret an image list response body
///
/// An empty body or `null` is an empty list; a single object is a list of one.
pub fn parse_images_payload(body: &str) -> Result<Vec<InspectionImage>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(body)? {
        Value::Null => Ok(Vec::new()),
        value @ Value::Array(_) => Ok(serde_json::from_value(value)?),
        value @ Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        other => Err(ServiceError::InvalidPayload(format!(
            "expected a list of images, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_not_found_shapes() {
        for body in ["", "   ", "null", "{}", "[]", "[null]", "[{}]"] {
            assert_eq!(parse_record_payload(body).unwrap(), None, "body: {body:?}");
        }
    }

    #[test]
    fn test_record_object() {
        let record = parse_record_payload(r#"{"Folio": 1001, "Marca": "NISSAN"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(record.folio, Some(FieldValue::Integer(1001)));
    }

    #[test]
    fn test_record_array_takes_first() {
        let record = parse_record_payload(r#"[{"Folio": 1}, {"Folio": 2}]"#)
            .unwrap()
            .unwrap();
        assert_eq!(record.folio, Some(FieldValue::Integer(1)));
    }

    #[test]
    fn test_record_invalid_payload() {
        assert!(matches!(
            parse_record_payload("42"),
            Err(ServiceError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_record_payload("{not json"),
            Err(ServiceError::Decode(_))
        ));
    }

    #[test]
    fn test_images_payload() {
        assert!(parse_images_payload("").unwrap().is_empty());
        assert!(parse_images_payload("null").unwrap().is_empty());
        assert!(parse_images_payload("[]").unwrap().is_empty());

        let images = parse_images_payload(
            r#"[{"IdTipoImagen": 1, "MimeType": "image/jpeg", "Imagen": "AAAA"},
                {"IdTipoImagen": 2, "MimeType": "image/png", "Imagen": "BBBB"}]"#,
        )
        .unwrap();
        assert_eq!(images.len(), 2);

        let single = parse_images_payload(r#"{"IdTipoImagen": 1, "Imagen": "AAAA"}"#).unwrap();
        assert_eq!(single.len(), 1);

        assert!(parse_images_payload("\"oops\"").is_err());
    }

    #[test]
    fn test_null_image_payload_keeps_the_list() {
        let images = parse_images_payload(
            r#"[{"IdTipoImagen": 1, "Imagen": null}, {"IdTipoImagen": 2, "Imagen": "AAAA"}]"#,
        )
        .unwrap();
        assert_eq!(images.len(), 2);

        assert_eq!(images[0].imagen, None);
        assert!(matches!(images[0].decode(), Err(ServiceError::InvalidPayload(_))));
        assert_eq!(images[1].decode().unwrap(), vec![0, 0, 0]);
    }
}
