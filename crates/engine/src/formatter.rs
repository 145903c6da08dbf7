use review_common::error::{CycleError, FieldKind};
use review_common::types::Homework;

use crate::catalog;

/// Render the status-change notification for a homework record.
///
/// A present-but-non-string name or status is treated as missing.
pub fn format_status(homework: &Homework) -> Result<String, CycleError> {
    let name = homework
        .name()
        .ok_or(CycleError::MissingField(FieldKind::Name))?;
    let status = homework
        .status()
        .ok_or(CycleError::MissingField(FieldKind::Status))?;

    let verdict =
        catalog::verdict_for(status).ok_or_else(|| CycleError::UnknownStatus(status.to_string()))?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name, verdict
    ))
}

/// Render the user-visible message for a failed cycle.
pub fn format_failure(error: &CycleError) -> String {
    format!("Сбой в работе программы: {}", error.summary())
}
