use thiserror::Error;

/// Startup configuration failures. Always fatal: the poll loop never starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Which required field of a homework record was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Status,
}

impl FieldKind {
    /// JSON key the field is stored under.
    pub fn key(self) -> &'static str {
        match self {
            FieldKind::Name => "homework_name",
            FieldKind::Status => "status",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Failures talking to the review API.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request to review API failed: {0}")]
    Transport(String),

    #[error("review API responded with HTTP {status}")]
    Status { status: u16 },

    #[error("review API body is not valid JSON: {0}")]
    Decode(String),
}

/// Payload shape mismatches reported by the response validator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("response root is not a JSON object")]
    RootNotObject,

    #[error("response is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("response field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("homeworks[{index}] is not a JSON object")]
    ElementNotObject { index: usize },

    #[error("homeworks[{index}].{field} must be {expected}")]
    WrongElementField {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
}

/// Every recoverable failure a poll cycle can raise.
///
/// The poll loop matches this exhaustively; none of these end the process.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("homework record has no `{0}` field")]
    MissingField(FieldKind),

    #[error("unknown homework status `{0}`")]
    UnknownStatus(String),
}

/// Discriminant of [`CycleError`], cheap to copy into outcomes and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleErrorKind {
    Remote,
    Schema,
    MissingField(FieldKind),
    UnknownStatus,
}

impl std::fmt::Display for CycleErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleErrorKind::Remote => write!(f, "remote"),
            CycleErrorKind::Schema => write!(f, "schema"),
            CycleErrorKind::MissingField(field) => write!(f, "missing_field:{}", field),
            CycleErrorKind::UnknownStatus => write!(f, "unknown_status"),
        }
    }
}

impl CycleError {
    pub fn kind(&self) -> CycleErrorKind {
        match self {
            CycleError::Remote(_) => CycleErrorKind::Remote,
            CycleError::Schema(_) => CycleErrorKind::Schema,
            CycleError::MissingField(field) => CycleErrorKind::MissingField(*field),
            CycleError::UnknownStatus(_) => CycleErrorKind::UnknownStatus,
        }
    }

    /// Short user-facing description, sent to the chat on failure.
    pub fn summary(&self) -> &'static str {
        match self {
            CycleError::Remote(_) => "Ошибка ответа API.",
            CycleError::Schema(_) => "Ответ API не соответствует документации.",
            CycleError::MissingField(FieldKind::Name) => {
                "Отсутствует ключ 'homework_name' в ответе API."
            }
            CycleError::MissingField(FieldKind::Status) => {
                "Отсутствует ключ 'status' в ответе API."
            }
            CycleError::UnknownStatus(_) => "Неизвестный статус домашней работы.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_lists_every_variable() {
        let err = ConfigError::Missing(vec!["SOURCE_API_TOKEN", "DESTINATION_ID"]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: SOURCE_API_TOKEN, DESTINATION_ID"
        );
    }

    #[test]
    fn test_kind_keeps_missing_field_distinct() {
        let name = CycleError::MissingField(FieldKind::Name);
        let status = CycleError::MissingField(FieldKind::Status);
        assert_ne!(name.kind(), status.kind());
        assert_eq!(status.kind().to_string(), "missing_field:status");
    }

    #[test]
    fn test_schema_error_converts_into_cycle_error() {
        let err: CycleError = SchemaError::MissingField("homeworks").into();
        assert_eq!(err.kind(), CycleErrorKind::Schema);
        assert_eq!(err.to_string(), "response is missing the `homeworks` field");
    }
}
