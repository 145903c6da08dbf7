//! Checks a decoded review API payload against the documented shape before
//! anything else looks at it.
//!
//! Two levels of strictness are supported through [`ValidationPolicy`]:
//! requiring the `current_date` cursor field at the top level, and
//! type-checking every known field of each homework record.

use serde_json::Value;

use review_common::error::SchemaError;
use review_common::types::{Homework, StatusResponse};

/// Expected JSON type of a homework record field.
#[derive(Debug, Clone, Copy)]
enum FieldType {
    String,
    Integer,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Integer => "an integer",
        }
    }
}

/// Known homework fields: (key, type, nullable).
const HOMEWORK_SCHEMA: [(&str, FieldType, bool); 6] = [
    ("homework_name", FieldType::String, false),
    ("status", FieldType::String, false),
    ("reviewer_comment", FieldType::String, true),
    ("date_updated", FieldType::String, true),
    ("lesson_name", FieldType::String, true),
    ("id", FieldType::Integer, true),
];

/// How strict validation should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Fail when the top-level `current_date` field is absent.
    pub require_cursor_field: bool,
    /// Type-check each present field of every homework record.
    pub validate_element_types: bool,
}

impl ValidationPolicy {
    pub fn strict() -> Self {
        Self {
            require_cursor_field: true,
            validate_element_types: true,
        }
    }

    /// Only checks that `homeworks` is a list of objects.
    pub fn lenient() -> Self {
        Self {
            require_cursor_field: false,
            validate_element_types: false,
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

/// Validate a decoded payload and extract the homework list.
pub fn validate(payload: &Value, policy: ValidationPolicy) -> Result<StatusResponse, SchemaError> {
    let root = payload.as_object().ok_or(SchemaError::RootNotObject)?;

    let homeworks = root
        .get("homeworks")
        .ok_or(SchemaError::MissingField("homeworks"))?
        .as_array()
        .ok_or(SchemaError::WrongType {
            field: "homeworks",
            expected: "an array",
        })?;

    let current_date = match root.get("current_date") {
        None if policy.require_cursor_field => {
            return Err(SchemaError::MissingField("current_date"));
        }
        None => None,
        Some(value) => Some(value.as_i64().ok_or(SchemaError::WrongType {
            field: "current_date",
            expected: "an integer",
        })?),
    };

    let homeworks = homeworks
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let fields = element
                .as_object()
                .ok_or(SchemaError::ElementNotObject { index })?;
            if policy.validate_element_types {
                check_fields(index, element)?;
            }
            Ok::<_, SchemaError>(Homework::new(fields.clone()))
        })
        .collect::<Result<Vec<_>, SchemaError>>()?;

    tracing::debug!(
        homeworks = homeworks.len(),
        current_date,
        "Review API response validated"
    );

    Ok(StatusResponse {
        homeworks,
        current_date,
    })
}

fn check_fields(index: usize, element: &Value) -> Result<(), SchemaError> {
    for (field, expected, nullable) in HOMEWORK_SCHEMA {
        match element.get(field) {
            None => {}
            Some(Value::Null) if nullable => {}
            Some(value) if expected.matches(value) => {}
            Some(_) => {
                return Err(SchemaError::WrongElementField {
                    index,
                    field,
                    expected: expected.describe(),
                });
            }
        }
    }
    Ok(())
}
