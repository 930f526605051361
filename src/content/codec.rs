//! Serialized storage form for post content.
//!
//! A post's content is persisted as one JSON string embedding the `"type"`
//! discriminator and the variant's fields. Encoding is total because it only
//! accepts already-validated variants; decoding re-validates everything it
//! reads, so a row written by an older schema version either decodes cleanly
//! or fails loudly as corrupt.

use serde_json::{json, Map, Value};

use super::error::ContentError;
use super::model::ContentVariant;
use super::validate::validate_value;

/// Serialize a validated variant to its stored form. Absent optional fields
/// are omitted rather than written as nulls; the decoder accepts both.
pub fn encode(content: &ContentVariant) -> String {
    let mut fields = Map::new();
    fields.insert("type".into(), Value::from(content.kind().as_str()));

    match content {
        ContentVariant::Text { body, format } => {
            fields.insert("body".into(), Value::from(body.as_str()));
            fields.insert("format".into(), Value::from(format.as_str()));
        }
        ContentVariant::Image {
            url,
            caption,
            dimensions,
        } => {
            fields.insert("url".into(), Value::from(url.as_str()));
            if let Some(caption) = caption {
                fields.insert("caption".into(), Value::from(caption.as_str()));
            }
            if let Some(dimensions) = dimensions {
                fields.insert(
                    "dimensions".into(),
                    json!({
                        "width": dimensions.width(),
                        "height": dimensions.height(),
                    }),
                );
            }
        }
        ContentVariant::Link {
            url,
            title,
            description,
        } => {
            fields.insert("url".into(), Value::from(url.as_str()));
            fields.insert("title".into(), Value::from(title.as_str()));
            if let Some(description) = description {
                fields.insert("description".into(), Value::from(description.as_str()));
            }
        }
    }

    Value::Object(fields).to_string()
}

/// Parse a stored payload and re-validate it against the registry's rules.
///
/// Every failure mode (unparseable text, unrecognized discriminator, a shape
/// that no longer satisfies the rules) comes back as [`ContentError::Corrupt`];
/// a bad row is surfaced to the caller, never silently coerced to a default
/// variant.
pub fn decode(raw: &str) -> Result<ContentVariant, ContentError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| ContentError::Corrupt(format!("not valid JSON: {err}")))?;

    validate_value(&value).map_err(|err| match err {
        ContentError::Corrupt(_) => err,
        other => ContentError::Corrupt(other.to_string()),
    })
}
