// SPDX-License-Identifier: MIT

//! Request validation helpers.
//!
//! Every operation has one static request schema (a `validator` derive
//! struct) validated at the boundary before any domain logic runs. All
//! violations are collected and returned in a single 400 response.

use crate::error::{AppError, FieldError};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Validate a request payload, mapping failures to the field-level 400 shape.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|errors| {
        let mut fields = Vec::new();
        collect_errors("", &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    })
}

/// Flatten nested `ValidationErrors` into dotted/indexed field paths.
fn collect_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    out.push(FieldError {
                        field: path.clone(),
                        message: describe(err),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_errors(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

fn describe(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}

/// Parse a canonical (UUID) identifier from a path or body field.
pub fn parse_id(field: &str, value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|_| {
        AppError::Validation(vec![FieldError {
            field: field.to_string(),
            message: "must be a valid UUID".to_string(),
        }])
    })
}

// ─── Custom field validators ─────────────────────────────────

/// "Beginner" | "Intermediate" | "Advanced" (shared by proficiency and
/// article difficulty).
pub fn validate_level(value: &str) -> Result<(), ValidationError> {
    match value {
        "Beginner" | "Intermediate" | "Advanced" => Ok(()),
        _ => Err(field_error(
            "level",
            "must be Beginner, Intermediate, or Advanced",
        )),
    }
}

/// "sample" | "custom"
pub fn validate_article_type(value: &str) -> Result<(), ValidationError> {
    match value {
        "sample" | "custom" => Ok(()),
        _ => Err(field_error("article_type", "must be sample or custom")),
    }
}

/// UUID-shaped string field.
pub fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| field_error("uuid", "must be a valid UUID"))
}

/// Uploader tag: the curator marker or a user UUID.
pub fn validate_uploader_tag(value: &str) -> Result<(), ValidationError> {
    if value == crate::models::CURATOR_TAG {
        return Ok(());
    }
    Uuid::parse_str(value).map(|_| ()).map_err(|_| {
        field_error("uploaded_by", "must be \"curator\" or a valid user UUID")
    })
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Form {
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(custom(function = validate_level))]
        level: String,
        #[validate(nested)]
        inner: Vec<Item>,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Item {
        #[validate(length(min = 1, message = "must not be empty"))]
        text: String,
    }

    #[test]
    fn test_all_violations_reported_at_once() {
        let form = Form {
            email: "not-an-email".to_string(),
            level: "Expert".to_string(),
            inner: vec![Item {
                text: String::new(),
            }],
        };

        let err = validate_payload(&form).unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };

        assert_eq!(fields.len(), 3);
        assert!(fields.iter().any(|f| f.field == "email"));
        assert!(fields.iter().any(|f| f.field == "level"));
        assert!(fields.iter().any(|f| f.field == "inner[0].text"));
    }

    #[test]
    fn test_valid_payload_passes() {
        let form = Form {
            email: "learner@example.com".to_string(),
            level: "Beginner".to_string(),
            inner: vec![Item {
                text: "ok".to_string(),
            }],
        };
        assert!(validate_payload(&form).is_ok());
    }

    #[test]
    fn test_uploader_tag() {
        assert!(validate_uploader_tag("curator").is_ok());
        assert!(validate_uploader_tag("f3b9c2d4-0000-4000-8000-0123456789ab").is_ok());
        assert!(validate_uploader_tag("someone-else").is_err());
    }

    #[test]
    fn test_parse_id_rejects_malformed() {
        assert!(parse_id("userId", "not-a-uuid").is_err());
        assert!(parse_id("userId", "f3b9c2d4-0000-4000-8000-0123456789ab").is_ok());
    }
}
