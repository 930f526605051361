//! Validation of untyped content payloads.
//!
//! The decoder runs every stored payload through here before it reaches the
//! rest of the system, so rows written by an earlier, laxer schema version
//! are re-checked on read. Unknown keys are ignored; missing optional fields
//! fall back to their defaults.

use serde_json::{Map, Value};

use super::error::{ContentError, FieldError};
use super::model::{ContentKind, ContentVariant, ImageDimensions, TextFormat};

/// Validate an untyped JSON value into a content variant.
///
/// The target variant is determined by the `"type"` discriminator. Failures
/// list every offending field, not just the first.
pub fn validate_value(value: &Value) -> Result<ContentVariant, ContentError> {
    let Some(obj) = value.as_object() else {
        return Err(single_error("content", "expected an object"));
    };

    let kind = match obj.get("type") {
        Some(Value::String(s)) => ContentKind::parse(s)
            .ok_or_else(|| single_error("type", format!("unknown content kind \"{s}\"")))?,
        Some(_) => return Err(single_error("type", "expected a string")),
        None => return Err(single_error("type", "required field is missing")),
    };

    match kind {
        ContentKind::Text => validate_text(obj),
        ContentKind::Image => validate_image(obj),
        ContentKind::Link => validate_link(obj),
    }
}

fn validate_text(obj: &Map<String, Value>) -> Result<ContentVariant, ContentError> {
    let mut errors = Vec::new();

    let body = required_string(obj, "body", &mut errors);
    let format = match obj.get("format") {
        None | Some(Value::Null) => Some(TextFormat::default()),
        Some(Value::String(s)) => match TextFormat::parse(s) {
            Some(format) => Some(format),
            None => {
                errors.push(FieldError::new(
                    "format",
                    "expected \"markdown\" or \"plain\"",
                ));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new(
                "format",
                "expected \"markdown\" or \"plain\"",
            ));
            None
        }
    };

    match (body, format) {
        (Some(body), Some(format)) => Ok(ContentVariant::Text { body, format }),
        _ => Err(ContentError::validation(errors)),
    }
}

fn validate_image(obj: &Map<String, Value>) -> Result<ContentVariant, ContentError> {
    let mut errors = Vec::new();

    let url = required_string(obj, "url", &mut errors);
    let caption = optional_string(obj, "caption", &mut errors);
    let dimensions = match obj.get("dimensions") {
        None | Some(Value::Null) => Some(None),
        Some(value) => match validate_dimensions(value) {
            Ok(dimensions) => Some(Some(dimensions)),
            Err(mut nested) => {
                errors.append(&mut nested);
                None
            }
        },
    };

    match (url, caption, dimensions) {
        (Some(url), Some(caption), Some(dimensions)) => Ok(ContentVariant::Image {
            url,
            caption,
            dimensions,
        }),
        _ => Err(ContentError::validation(errors)),
    }
}

fn validate_link(obj: &Map<String, Value>) -> Result<ContentVariant, ContentError> {
    let mut errors = Vec::new();

    let url = required_string(obj, "url", &mut errors);
    let title = required_string(obj, "title", &mut errors);
    let description = optional_string(obj, "description", &mut errors);

    match (url, title, description) {
        (Some(url), Some(title), Some(description)) => Ok(ContentVariant::Link {
            url,
            title,
            description,
        }),
        _ => Err(ContentError::validation(errors)),
    }
}

/// Validate the nested dimensions object. Field errors are reported under
/// the `dimensions.` prefix so the caller can tell them apart from top-level
/// fields.
fn validate_dimensions(value: &Value) -> Result<ImageDimensions, Vec<FieldError>> {
    let Some(obj) = value.as_object() else {
        return Err(vec![FieldError::new("dimensions", "expected an object")]);
    };

    let mut errors = Vec::new();
    let width = required_dimension(obj, "width", &mut errors);
    let height = required_dimension(obj, "height", &mut errors);

    match (width, height) {
        (Some(width), Some(height)) => {
            ImageDimensions::new(width, height).map_err(|err| err.field_errors().to_vec())
        }
        _ => Err(errors),
    }
}

fn required_dimension(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<i32> {
    let name = format!("dimensions.{field}");
    match obj.get(field) {
        Some(Value::Number(n)) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
            Some(v) => Some(v),
            None => {
                errors.push(FieldError::new(name, "expected a 32-bit integer"));
                None
            }
        },
        None | Some(Value::Null) => {
            errors.push(FieldError::new(name, "required field is missing"));
            None
        }
        Some(_) => {
            errors.push(FieldError::new(name, "expected an integer"));
            None
        }
    }
}

fn required_string(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, "required field is missing"));
            None
        }
        Some(_) => {
            errors.push(FieldError::new(field, "expected a string"));
            None
        }
    }
}

/// Tri-state optional string: `Some(None)` when absent, `Some(Some(_))` when
/// present, `None` when present with the wrong type (error recorded).
fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(_) => {
            errors.push(FieldError::new(field, "expected a string"));
            None
        }
    }
}

fn single_error(field: &str, message: impl Into<String>) -> ContentError {
    ContentError::validation(vec![FieldError::new(field, message)])
}
